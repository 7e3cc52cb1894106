use actix_web::web;

use super::handlers::{cancel_order, checkout, fetch_order, list_orders};
use crate::middleware::RequireAuth;
use crate::routes::delivery::handlers::fetch_delivery_tracking;
use crate::routes::payment::handlers::list_payments;

pub fn order_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/checkout").route(web::post().to(checkout).wrap(RequireAuth)));
    cfg.service(web::resource("/list").route(web::get().to(list_orders).wrap(RequireAuth)));
    cfg.service(web::resource("/{order_no}").route(web::get().to(fetch_order).wrap(RequireAuth)));
    cfg.service(
        web::resource("/{order_no}/cancel").route(web::post().to(cancel_order).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/{order_no}/delivery")
            .route(web::get().to(fetch_delivery_tracking).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/{order_no}/payments")
            .route(web::get().to(list_payments).wrap(RequireAuth)),
    );
}
