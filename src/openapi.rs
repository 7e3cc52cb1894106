use crate::routes::{
    address, admin, cart, category, delivery, order, payment, product, user, util,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        util::handlers::health_check,
        user::handlers::register_user_account,
        user::handlers::authenticate,
        user::handlers::fetch_profile,
        user::handlers::update_profile,
        address::handlers::list_addresses,
        address::handlers::create_address,
        address::handlers::update_address,
        address::handlers::delete_address,
        address::handlers::set_default_address,
        category::handlers::list_categories,
        category::handlers::create_category,
        category::handlers::update_category,
        category::handlers::delete_category,
        product::handlers::list_products,
        product::handlers::fetch_product,
        product::handlers::create_product,
        product::handlers::update_product,
        product::handlers::delete_product,
        cart::handlers::fetch_cart,
        cart::handlers::add_cart_item,
        cart::handlers::update_cart_item,
        cart::handlers::remove_cart_item,
        cart::handlers::clear_cart,
        order::handlers::checkout,
        order::handlers::list_orders,
        order::handlers::fetch_order,
        order::handlers::cancel_order,
        order::handlers::update_order_status,
        payment::handlers::initiate_bog_payment,
        payment::handlers::bog_callback,
        payment::handlers::submit_bank_transfer,
        payment::handlers::list_payments,
        delivery::handlers::fetch_delivery_tracking,
        delivery::handlers::update_delivery_status,
        delivery::handlers::update_delivery_weight,
        admin::handlers::fetch_stats,
        admin::handlers::list_all_orders,
    ),
    components(schemas(
        crate::schemas::Language,
        order::schemas::OrderStatus,
        order::schemas::PaymentMethod,
        order::schemas::DeliveryMethod,
        delivery::schemas::DeliveryStatus,
        user::schemas::UserRole,
    )),
    tags(
        (name = "Util", description = "Service health"),
        (name = "User", description = "Registration, login and profile"),
        (name = "Address", description = "Saved shipping addresses"),
        (name = "Category", description = "Product categories"),
        (name = "Product", description = "Bilingual product catalog"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Order", description = "Checkout and order history"),
        (name = "Payment", description = "BOG and bank transfer payments"),
        (name = "Delivery", description = "Delivery tracking"),
        (name = "Admin", description = "Back-office endpoints"),
    ),
)]
pub struct ApiDoc;
