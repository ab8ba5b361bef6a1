// service/src/web/mod.rs

pub mod cors;
pub mod dispatch;
pub mod docs;
pub mod handlers;
pub mod routes;

pub use routes::{configure_app_routes, product_routes, CompiledRoutes, RouteTable};
