use actix_web::web;

use super::handlers::{fetch_product, list_products};

pub fn product_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/list").route(web::get().to(list_products)));
    cfg.service(web::resource("/{id}").route(web::get().to(fetch_product)));
}
