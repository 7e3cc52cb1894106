pub(crate) mod address;
pub(crate) mod admin;
pub(crate) mod cart;
pub(crate) mod category;
pub(crate) mod delivery;
pub(crate) mod order;
pub(crate) mod payment;
pub(crate) mod product;
mod route;
pub(crate) mod user;
pub(crate) mod util;

pub use address::address_route;
pub use admin::admin_route;
pub use cart::cart_route;
pub use category::category_route;
pub use order::order_route;
pub use payment::{payment_callback_route, payment_route};
pub use product::product_route;
pub use route::main_route;
pub use user::user_route;
pub use util::util_route;
