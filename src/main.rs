// http服务入口
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;

mod handlers;
mod thumbnail;

use crate::handlers::thumb_handler;
use crate::thumbnail::{
    cache::ThumbnailCache,
    camera_lookup::CameraLookup,
    producer::{FfmpegProducer, ThumbnailProducer},
    refresher::ThumbnailRefresher,
    thumbnail_config::ThumbnailConfig,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ThumbnailConfig::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let lookup = CameraLookup::load(&config.lookup)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    log::info!(
        "Loaded {} cameras from {}, thumbnails valid for {} min",
        lookup.len(),
        config.lookup.display(),
        config.ttl
    );

    if lookup.is_empty() {
        log::warn!("Lookup table {} has no cameras", config.lookup.display());
    }

    let lookup = Arc::new(lookup);
    let cache = Arc::new(ThumbnailCache::new(config.cache_expiry()));
    let producer: Arc<dyn ThumbnailProducer> = Arc::new(FfmpegProducer::new(&config.ffmpeg));

    // sweeps now to warm the empty cache, then once per ttl
    let refresher = ThumbnailRefresher::new(
        cache.clone(),
        lookup.clone(),
        producer.clone(),
        cache.ttl(),
    )
    .spawn();

    log::info!("Listening on {}", config.listen);
    let result = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(lookup.clone()))
            .app_data(web::Data::from(cache.clone()))
            .app_data(web::Data::from(producer.clone()))
            .configure(thumb_handler::configure)
    })
    .bind(&config.listen)?
    .run()
    .await;

    refresher.abort();
    result
}
