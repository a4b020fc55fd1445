use actix_web::{http::header::LOCATION, web, HttpRequest, HttpResponse, Responder};
use log::{debug, error, info};

use crate::{
    errors::AppError,
    models::{ShortenRequest, ShortenResponse},
    repositories::LinkRepository,
    services::{LinkService, LinkServiceTrait},
    types::Result,
};

pub type LinkServiceType = LinkService<LinkRepository>;

/// Create short link route handler
pub async fn shorten_handler(
    req: HttpRequest,
    dto: web::Json<ShortenRequest>,
    service: web::Data<LinkServiceType>,
) -> Result<impl Responder> {
    let record = service.shorten(dto.into_inner()).await?;

    // Compose the fully qualified short URL from the request's own
    // scheme and host, the way the caller reached us
    let conn = req.connection_info();
    let short_url = format!("{}://{}/{}", conn.scheme(), conn.host(), record.slug);

    info!("Shortened '{}' as '{}'", record.original_url, record.slug);

    Ok(HttpResponse::Ok().json(ShortenResponse {
        short_url,
        slug: record.slug,
    }))
}

/// List history route handler
pub async fn history_handler(service: web::Data<LinkServiceType>) -> Result<impl Responder> {
    let records = service.history().await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Redirect route handler
///
/// Unlike the JSON API this endpoint answers in plain text on failure,
/// matching what a browser following a dead short link should see.
pub async fn redirect_handler(
    path: web::Path<String>,
    service: web::Data<LinkServiceType>,
) -> impl Responder {
    let slug = path.into_inner();
    debug!("Redirect requested for slug: {}", slug);

    match service.resolve(&slug).await {
        Ok(record) => {
            info!("Redirecting '{}' to '{}'", slug, record.original_url);
            HttpResponse::Found()
                .insert_header((LOCATION, record.original_url))
                .finish()
        }
        Err(AppError::NotFound(_)) => HttpResponse::NotFound().body("Not found"),
        Err(e) => {
            error!("Redirect lookup for '{}' failed: {}", slug, e);
            HttpResponse::InternalServerError().body("Server error")
        }
    }
}
