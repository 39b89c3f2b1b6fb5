// /cam/thumb/{name}, any method
use crate::thumbnail::cache::ThumbnailCache;
use crate::thumbnail::camera_lookup::CameraLookup;
use crate::thumbnail::producer::ThumbnailProducer;
use crate::thumbnail::thumbnail_error::ThumbnailError;
use actix_web::{web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/cam/thumb/{name:.*}").to(handle_thumbnail));
}

pub async fn handle_thumbnail(
    name: web::Path<String>,
    lookup: web::Data<CameraLookup>,
    cache: web::Data<ThumbnailCache>,
    producer: web::Data<dyn ThumbnailProducer>, // injected as a trait object
) -> Result<HttpResponse, ThumbnailError> {
    let name = name.into_inner();
    let uri = lookup.resolve(&name)?;

    let img = cache
        .get_or_produce(&name, || producer.produce(uri))
        .await
        .ok_or(ThumbnailError::InvalidFeed)?;

    Ok(HttpResponse::Ok().content_type("image/png").body(img))
}
