mod errors;
pub(crate) mod handlers;
mod models;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
pub(crate) mod utils;
