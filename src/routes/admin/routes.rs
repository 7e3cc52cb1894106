use actix_web::web;

use super::handlers::{fetch_stats, list_all_orders};
use crate::middleware::{RequireAuth, RoleValidation};
use crate::routes::category::handlers::{create_category, delete_category, update_category};
use crate::routes::delivery::handlers::{update_delivery_status, update_delivery_weight};
use crate::routes::order::handlers::update_order_status;
use crate::routes::product::handlers::{create_product, delete_product, update_product};

pub fn admin_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/stats").route(
            web::get()
                .to(fetch_stats)
                .wrap(RoleValidation::admin())
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/order/list").route(
            web::get()
                .to(list_all_orders)
                .wrap(RoleValidation::admin())
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/order/{order_no}/status").route(
            web::patch()
                .to(update_order_status)
                .wrap(RoleValidation::admin())
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/order/{order_no}/delivery/status").route(
            web::patch()
                .to(update_delivery_status)
                .wrap(RoleValidation::admin())
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/order/{order_no}/delivery/weight").route(
            web::patch()
                .to(update_delivery_weight)
                .wrap(RoleValidation::admin())
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/category").route(
            web::post()
                .to(create_category)
                .wrap(RoleValidation::admin())
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/category/{id}")
            .route(
                web::patch()
                    .to(update_category)
                    .wrap(RoleValidation::admin())
                    .wrap(RequireAuth),
            )
            .route(
                web::delete()
                    .to(delete_category)
                    .wrap(RoleValidation::admin())
                    .wrap(RequireAuth),
            ),
    );
    cfg.service(
        web::resource("/product").route(
            web::post()
                .to(create_product)
                .wrap(RoleValidation::admin())
                .wrap(RequireAuth),
        ),
    );
    cfg.service(
        web::resource("/product/{id}")
            .route(
                web::patch()
                    .to(update_product)
                    .wrap(RoleValidation::admin())
                    .wrap(RequireAuth),
            )
            .route(
                web::delete()
                    .to(delete_product)
                    .wrap(RoleValidation::admin())
                    .wrap(RequireAuth),
            ),
    );
}
