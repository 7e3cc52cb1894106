use actix_web::web;

use super::handlers::list_categories;

pub fn category_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/list").route(web::get().to(list_categories)));
}
