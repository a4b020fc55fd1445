use actix_web::{HttpResponse, Responder};
use log::debug;
use rust_embed::Embed;

// Static assets compiled into the binary, so the deployed executable has no
// runtime dependency on a public/ directory on disk
#[derive(Embed)]
#[folder = "public/"]
struct PublicAssets;

/// Serves the landing page
pub async fn index() -> impl Responder {
    debug!("Serving landing page");

    match PublicAssets::get("index.html") {
        Some(content) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(content.data.into_owned()),
        None => HttpResponse::NotFound().body("Not found"),
    }
}
