use actix_web::web;

use super::handlers::{authenticate, fetch_profile, register_user_account, update_profile};
use crate::middleware::RequireAuth;

pub fn user_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register_user_account)));
    cfg.service(web::resource("/authenticate").route(web::post().to(authenticate)));
    cfg.service(
        web::resource("/profile")
            .route(web::get().to(fetch_profile).wrap(RequireAuth))
            .route(web::patch().to(update_profile).wrap(RequireAuth)),
    );
}
