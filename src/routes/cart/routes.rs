use actix_web::web;

use super::handlers::{add_cart_item, clear_cart, fetch_cart, remove_cart_item, update_cart_item};
use crate::middleware::RequireAuth;

pub fn cart_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(fetch_cart).wrap(RequireAuth))
            .route(web::delete().to(clear_cart).wrap(RequireAuth)),
    );
    cfg.service(web::resource("/item").route(web::post().to(add_cart_item).wrap(RequireAuth)));
    cfg.service(
        web::resource("/item/{product_id}")
            .route(web::patch().to(update_cart_item).wrap(RequireAuth))
            .route(web::delete().to(remove_cart_item).wrap(RequireAuth)),
    );
}
