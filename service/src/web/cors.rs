// service/src/web/cors.rs

//! Single-origin CORS gate, applied before routing.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpResponse, ResponseError};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::state::AppState;

pub const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
  allowed_origin: String,
  allow_no_origin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
  /// The origin matches; echo it back.
  Allowed(String),
  /// No `Origin` header and the policy accepts that.
  AllowedWithoutOrigin,
  Rejected,
}

impl CorsPolicy {
  pub fn new(allowed_origin: impl Into<String>, allow_no_origin: bool) -> Self {
    Self {
      allowed_origin: allowed_origin.into(),
      allow_no_origin,
    }
  }

  pub fn allowed_origin(&self) -> &str {
    &self.allowed_origin
  }

  /// Exact string comparison; no normalisation of scheme, host or trailing slash.
  pub fn decide(&self, origin: Option<&str>) -> OriginDecision {
    match origin {
      Some(o) if o == self.allowed_origin => OriginDecision::Allowed(o.to_string()),
      Some(_) => OriginDecision::Rejected,
      None if self.allow_no_origin => OriginDecision::AllowedWithoutOrigin,
      None => OriginDecision::Rejected,
    }
  }
}

fn is_preflight(req: &ServiceRequest) -> bool {
  req.method() == Method::OPTIONS && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Middleware for `actix_web::middleware::from_fn`.
///
/// Rejected requests never reach a route and get `403`. Allowed preflights are
/// answered here with `204`.
pub async fn cors_gate<B>(req: ServiceRequest, next: Next<B>) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
  B: MessageBody + 'static,
{
  let policy = match req.app_data::<web::Data<AppState>>() {
    Some(state) => state.config.cors.clone(),
    None => {
      let response = AppError::Internal("application state not registered".to_string()).error_response();
      return Ok(req.into_response(response).map_into_right_body());
    }
  };

  let origin_header = req.headers().get(header::ORIGIN).cloned();
  let origin = origin_header.as_ref().and_then(|v| v.to_str().ok());
  let decision = policy.decide(origin);

  if decision == OriginDecision::Rejected {
    info!(origin = ?origin, path = %req.path(), "Request rejected by CORS policy.");
    let response = AppError::Cors {
      origin: origin.map(str::to_string),
    }
    .error_response();
    return Ok(req.into_response(response).map_into_right_body());
  }

  let allow_origin = match decision {
    OriginDecision::Allowed(_) => origin_header,
    _ => None,
  };

  if is_preflight(&req) {
    debug!(path = %req.path(), "Answering CORS preflight.");
    let mut response = HttpResponse::NoContent();
    if let Some(value) = &allow_origin {
      response.insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, value.clone()));
      response.insert_header((header::VARY, "Origin"));
    }
    response.insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS));
    if let Some(requested) = req.headers().get(header::ACCESS_CONTROL_REQUEST_HEADERS).cloned() {
      response.insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, requested));
    }
    return Ok(req.into_response(response.finish()).map_into_right_body());
  }

  let mut res = next.call(req).await?.map_into_left_body();
  if let Some(value) = allow_origin {
    let headers = res.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
  }
  Ok(res)
}
