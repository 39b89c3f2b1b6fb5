use super::producer::DEFAULT_FFMPEG;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Largest `--ttl` whose value in seconds still fits a `u64`.
pub const MAX_TTL_MINUTES: u64 = u64::MAX / 60;

/// Serves cached still thumbnails of camera feeds.
///
/// Cameras are looked up by name in the lookup table, a whitespace separated
/// list of `name uri` pairs.
#[derive(Clone, Parser, Debug)]
#[command(author, version, about, long_about)]
pub struct ThumbnailConfig {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8989")]
    pub listen: String,

    /// Path to the camera name -> feed uri table.
    #[arg(long, default_value = "./lookup")]
    pub lookup: PathBuf,

    /// Minutes a thumbnail stays valid. Also the background refresh period.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..=MAX_TTL_MINUTES))]
    pub ttl: u64,

    /// Decoder program used to grab a frame.
    #[arg(long, default_value = DEFAULT_FFMPEG)]
    pub ffmpeg: String,
}

impl ThumbnailConfig {
    pub fn cache_expiry(&self) -> Duration {
        Duration::from_secs(self.ttl.saturating_mul(60))
    }
}
