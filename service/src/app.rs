// service/src/app.rs

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::from_fn;
use actix_web::{web, App, Error};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::state::AppState;
use crate::web::cors::cors_gate;
use crate::web::docs::configure_docs;
use crate::web::routes::{configure_app_routes, product_routes, route_not_found, CompiledRoutes, RouteTable};

/// The registered route table and its compiled endpoints.
pub struct AppRoutes {
  pub table: RouteTable,
  pub compiled: CompiledRoutes,
}

impl AppRoutes {
  pub fn build() -> Self {
    let table = product_routes();
    let compiled = CompiledRoutes::compile(&table);
    Self { table, compiled }
  }
}

/// Assembles the application: request logging outermost, then the CORS gate, then routing.
pub fn build_app(
  state: AppState,
  routes: Arc<AppRoutes>,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = Error,
    InitError = (),
  >,
> {
  App::new()
    .app_data(web::Data::new(state))
    .configure(|cfg| configure_docs(cfg, &routes.table))
    .configure(|cfg| configure_app_routes(cfg, &routes.compiled))
    .default_service(web::to(route_not_found))
    .wrap(from_fn(cors_gate))
    .wrap(TracingLogger::default())
}
