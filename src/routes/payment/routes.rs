use actix_web::web;

use super::handlers::{bog_callback, initiate_bog_payment, submit_bank_transfer};
use crate::middleware::RequireAuth;

pub fn payment_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/bog/initiate")
            .route(web::post().to(initiate_bog_payment).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/bank-transfer")
            .route(web::post().to(submit_bank_transfer).wrap(RequireAuth)),
    );
}

/// Called by BOG, which sends none of the client headers.
pub fn payment_callback_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/payment/bog/callback").route(web::post().to(bog_callback)));
}
