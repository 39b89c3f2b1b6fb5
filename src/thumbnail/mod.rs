pub mod cache;
pub mod camera_lookup;
pub mod producer;
pub mod refresher;
pub mod thumbnail_config;
pub mod thumbnail_error;
