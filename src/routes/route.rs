use crate::middleware::HeaderValidation;
use crate::openapi::ApiDoc;
use crate::routes::{
    address_route, admin_route, cart_route, category_route, order_route,
    payment_callback_route, payment_route, product_route, user_route, util_route,
};
use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn main_route(cfg: &mut web::ServiceConfig) {
    let openapi = ApiDoc::openapi();
    cfg.service(
        web::scope("/api")
            .configure(payment_callback_route)
            .service(web::scope("/util").configure(util_route))
            .service(
                web::scope("/user")
                    .configure(user_route)
                    .wrap(HeaderValidation),
            )
            .service(
                web::scope("/address")
                    .configure(address_route)
                    .wrap(HeaderValidation),
            )
            .service(
                web::scope("/category")
                    .configure(category_route)
                    .wrap(HeaderValidation),
            )
            .service(
                web::scope("/product")
                    .configure(product_route)
                    .wrap(HeaderValidation),
            )
            .service(
                web::scope("/cart")
                    .configure(cart_route)
                    .wrap(HeaderValidation),
            )
            .service(
                web::scope("/order")
                    .configure(order_route)
                    .wrap(HeaderValidation),
            )
            .service(
                web::scope("/payment")
                    .configure(payment_route)
                    .wrap(HeaderValidation),
            )
            .service(
                web::scope("/admin")
                    .configure(admin_route)
                    .wrap(HeaderValidation),
            ),
    )
    .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", openapi));
}
