use std::sync::Arc;

use actix_web::web;

mod link;

pub use link::{LinkService, LinkServiceTrait};

use crate::repositories::LinkRepository;

/// Service Register
pub fn register(repository: Arc<LinkRepository>, cfg: &mut web::ServiceConfig) {
    let link_service = LinkService::new(repository);
    cfg.app_data(web::Data::new(link_service));
}
