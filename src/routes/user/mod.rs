pub(crate) mod errors;
pub(crate) mod handlers;
mod models;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
pub(crate) mod tests;
pub(crate) mod utils;
pub use routes::user_route;
