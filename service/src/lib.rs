// service/src/lib.rs

//! catalog-api: HTTP service exposing CRUD over products under `/api/products`.

pub mod app;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod web;

pub use app::{build_app, AppRoutes};
pub use config::AppConfig;
pub use errors::AppError;
pub use lifecycle::{connect_db, ConnectionOutcome};
pub use state::AppState;
