// service/src/web/routes.rs

//! The product route table and its mounting on the actix `App`.

use actix_web::http::Method;
use actix_web::{web, HttpRequest};
use catalog_pipeline::{coerce, RuleSet, Target};
use std::sync::Arc;

use crate::config::API_PREFIX;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::dispatch::RouteEndpoint;

pub const MSG_INVALID_ID: &str = "Invalid id";
pub const MSG_NAME_EMPTY: &str = "Product name must not be empty";
pub const MSG_PRICE_NOT_NUMERIC: &str = "Invalid value";
pub const MSG_PRICE_EMPTY: &str = "Product price must not be empty";
pub const MSG_PRICE_NOT_POSITIVE: &str = "Invalid price";
pub const MSG_AVAILABILITY_INVALID: &str = "Invalid availability value";

/// What a route does once its input is clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOperation {
  List,
  Get,
  Create,
  Replace,
  ToggleAvailability,
  Delete,
}

/// Shape of a documented response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocPayload {
  Product,
  ProductList,
  Message,
  ValidationErrors,
  Error,
}

#[derive(Debug, Clone)]
pub struct DocResponse {
  pub status: u16,
  pub description: &'static str,
  pub payload: DocPayload,
}

#[derive(Debug, Clone)]
pub struct RouteDoc {
  pub operation_id: &'static str,
  pub summary: &'static str,
  pub description: &'static str,
  pub responses: Vec<DocResponse>,
}

/// One route: verb, path below the prefix, rules, operation and docs.
#[derive(Debug, Clone)]
pub struct RouteDef {
  pub method: Method,
  /// `""` for the collection, `"/{id}"` for a single product.
  pub path: &'static str,
  pub rules: Arc<RuleSet>,
  pub operation: ProductOperation,
  pub doc: RouteDoc,
}

impl RouteDef {
  /// Whether any rule targets the JSON body; other routes never parse it.
  pub fn reads_body(&self) -> bool {
    self.rules.rules().iter().any(|r| matches!(r.target, Target::Body(_)))
  }
}

/// Immutable once built; `product_routes()` is the only registration point.
#[derive(Debug, Clone)]
pub struct RouteTable {
  prefix: String,
  routes: Vec<RouteDef>,
}

impl RouteTable {
  pub fn new(prefix: impl Into<String>) -> Self {
    Self {
      prefix: prefix.into(),
      routes: Vec::new(),
    }
  }

  pub fn register(mut self, route: RouteDef) -> Self {
    self.routes.push(route);
    self
  }

  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  pub fn routes(&self) -> &[RouteDef] {
    &self.routes
  }

  pub fn full_path(&self, route: &RouteDef) -> String {
    format!("{}{}", self.prefix, route.path)
  }

  /// Distinct route paths in registration order.
  pub fn paths(&self) -> Vec<&'static str> {
    let mut paths: Vec<&'static str> = Vec::new();
    for route in &self.routes {
      if !paths.contains(&route.path) {
        paths.push(route.path);
      }
    }
    paths
  }
}

fn id_rules() -> RuleSet {
  RuleSet::new().param("id", |f| f.is_integer(MSG_INVALID_ID))
}

fn with_product_body(rules: RuleSet) -> RuleSet {
  rules
    .body("name", |f| f.not_empty(MSG_NAME_EMPTY))
    .body("price", |f| {
      f.is_numeric(MSG_PRICE_NOT_NUMERIC)
        .not_empty(MSG_PRICE_EMPTY)
        .custom(
          "positive",
          |v| coerce::number(v).map_or(false, |n| n > 0.0),
          MSG_PRICE_NOT_POSITIVE,
        )
    })
}

fn response(status: u16, description: &'static str, payload: DocPayload) -> DocResponse {
  DocResponse {
    status,
    description,
    payload,
  }
}

/// Registers every product route under `/api/products`.
pub fn product_routes() -> RouteTable {
  RouteTable::new(API_PREFIX)
    .register(RouteDef {
      method: Method::GET,
      path: "",
      rules: Arc::new(RuleSet::new()),
      operation: ProductOperation::List,
      doc: RouteDoc {
        operation_id: "listProducts",
        summary: "Get a list of products",
        description: "Return all products ordered by id",
        responses: vec![response(200, "Successful response", DocPayload::ProductList)],
      },
    })
    .register(RouteDef {
      method: Method::GET,
      path: "/{id}",
      rules: Arc::new(id_rules()),
      operation: ProductOperation::Get,
      doc: RouteDoc {
        operation_id: "getProductById",
        summary: "Get a product by ID",
        description: "Return a product based on its unique ID",
        responses: vec![
          response(200, "Successful response", DocPayload::Product),
          response(400, "Bad request - invalid ID", DocPayload::ValidationErrors),
          response(404, "Product not found", DocPayload::Error),
        ],
      },
    })
    .register(RouteDef {
      method: Method::POST,
      path: "",
      rules: Arc::new(with_product_body(RuleSet::new())),
      operation: ProductOperation::Create,
      doc: RouteDoc {
        operation_id: "createProduct",
        summary: "Create a new product",
        description: "Store a new product; it starts out available",
        responses: vec![
          response(201, "Product created", DocPayload::Product),
          response(400, "Bad request - invalid input data", DocPayload::ValidationErrors),
        ],
      },
    })
    .register(RouteDef {
      method: Method::PUT,
      path: "/{id}",
      rules: Arc::new(
        with_product_body(id_rules()).body("availability", |f| f.is_boolean(MSG_AVAILABILITY_INVALID)),
      ),
      operation: ProductOperation::Replace,
      doc: RouteDoc {
        operation_id: "updateProduct",
        summary: "Update a product with user input",
        description: "Replace name, price and availability of a product",
        responses: vec![
          response(200, "Successful response", DocPayload::Product),
          response(400, "Bad request - invalid ID or input data", DocPayload::ValidationErrors),
          response(404, "Product not found", DocPayload::Error),
        ],
      },
    })
    .register(RouteDef {
      method: Method::PATCH,
      path: "/{id}",
      rules: Arc::new(id_rules()),
      operation: ProductOperation::ToggleAvailability,
      doc: RouteDoc {
        operation_id: "updateAvailability",
        summary: "Update product availability",
        description: "Flip the availability of a product",
        responses: vec![
          response(200, "Successful response", DocPayload::Product),
          response(400, "Bad request - invalid ID", DocPayload::ValidationErrors),
          response(404, "Product not found", DocPayload::Error),
        ],
      },
    })
    .register(RouteDef {
      method: Method::DELETE,
      path: "/{id}",
      rules: Arc::new(id_rules()),
      operation: ProductOperation::Delete,
      doc: RouteDoc {
        operation_id: "deleteProduct",
        summary: "Delete a product by ID",
        description: "Remove a product permanently",
        responses: vec![
          response(200, "Product deleted", DocPayload::Message),
          response(400, "Bad request - invalid ID", DocPayload::ValidationErrors),
          response(404, "Product not found", DocPayload::Error),
        ],
      },
    })
}

/// Route endpoints compiled once and shared by every worker.
pub struct CompiledRoutes {
  resources: Vec<(String, Vec<(Method, Arc<RouteEndpoint>)>)>,
}

impl CompiledRoutes {
  pub fn compile(table: &RouteTable) -> Self {
    let resources = table
      .paths()
      .into_iter()
      .map(|path| {
        let endpoints = table
          .routes()
          .iter()
          .filter(|route| route.path == path)
          .map(|route| (route.method.clone(), Arc::new(RouteEndpoint::compile(route))))
          .collect();
        (format!("{}{}", table.prefix(), path), endpoints)
      })
      .collect();
    Self { resources }
  }
}

/// Fallback for paths outside the route table.
pub async fn route_not_found() -> Result<actix_web::HttpResponse, AppError> {
  Err(AppError::NotFound("Route not found".to_string()))
}

/// Verbs a route answers to; `GET` routes also serve `HEAD`.
fn mounted_methods(method: &Method) -> Vec<Method> {
  if *method == Method::GET {
    vec![Method::GET, Method::HEAD]
  } else {
    vec![method.clone()]
  }
}

/// Mounts one actix resource per path, one route per verb.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig, compiled: &CompiledRoutes) {
  for (path, endpoints) in &compiled.resources {
    let mut resource = web::resource(path.as_str());
    for (method, endpoint) in endpoints {
      for verb in mounted_methods(method) {
        let endpoint = Arc::clone(endpoint);
        resource = resource.route(web::method(verb).to(
          move |req: HttpRequest, body: web::Bytes, state: web::Data<AppState>| {
            let endpoint = Arc::clone(&endpoint);
            async move { endpoint.dispatch(&req, &body, &state).await }
          },
        ));
      }
    }
    cfg.service(resource);
  }
}
