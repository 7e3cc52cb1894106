use actix_web::web;

use super::handlers::{
    create_address, delete_address, list_addresses, set_default_address, update_address,
};
use crate::middleware::RequireAuth;

pub fn address_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/list").route(web::get().to(list_addresses).wrap(RequireAuth)));
    cfg.service(web::resource("").route(web::post().to(create_address).wrap(RequireAuth)));
    cfg.service(
        web::resource("/{id}")
            .route(web::patch().to(update_address).wrap(RequireAuth))
            .route(web::delete().to(delete_address).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/{id}/default").route(web::post().to(set_default_address).wrap(RequireAuth)),
    );
}
