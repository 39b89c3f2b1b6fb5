// ThumbnailProducer trait and the ffmpeg backed implementation
use super::thumbnail_error::ThumbnailError;
use actix_web::http::Uri;
use actix_web::web::Bytes;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Turns a camera feed uri into a single encoded still image.
/// May take seconds and may fail; callers must not hold locks across it.
#[async_trait]
pub trait ThumbnailProducer: Send + Sync {
    async fn produce(&self, uri: &str) -> Result<Bytes, ThumbnailError>;
}

#[derive(Debug, Clone)]
pub struct FfmpegProducer {
    program: String,
}

impl FfmpegProducer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(uri: &str) -> [&str; 11] {
        [
            "-i",
            uri,
            "-vf",
            "thumbnail",
            "-frames:v",
            "1",
            "-f",
            "image2pipe",
            "-c:v",
            "png",
            "pipe:1",
        ]
    }
}

impl Default for FfmpegProducer {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG)
    }
}

#[async_trait]
impl ThumbnailProducer for FfmpegProducer {
    async fn produce(&self, uri: &str) -> Result<Bytes, ThumbnailError> {
        uri.parse::<Uri>()
            .map_err(|_| ThumbnailError::InvalidUri(uri.to_owned()))?;

        let start = std::time::Instant::now();
        let output = Command::new(&self.program)
            .args(Self::args(uri))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ThumbnailError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        log::debug!(
            "[Producer] {} took: {:.4}s",
            uri,
            start.elapsed().as_secs_f64()
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ThumbnailError::DecoderFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: last_line(&stderr).to_owned(),
            });
        }
        if output.stdout.is_empty() {
            return Err(ThumbnailError::EmptyOutput {
                program: self.program.clone(),
            });
        }
        Ok(Bytes::from(output.stdout))
    }
}

// ffmpeg prints its banner first, the reason is at the end
fn last_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim()
}
