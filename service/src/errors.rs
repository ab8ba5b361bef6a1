// service/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use catalog_pipeline::{PipelineError, Verdicts};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
  /// Declared rules failed; rendered with every verdict.
  #[error("Validation Error: {} rule(s) failed", .0.len())]
  Validation(Verdicts),

  #[error("Malformed JSON body: {0}")]
  MalformedBody(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Origin not allowed by CORS: {origin:?}")]
  Cors { origin: Option<String> },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Error: {0}")]
  Store(#[from] StoreError),

  #[error("Request Pipeline Error: {source}")]
  Pipeline {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) | AppError::Store(StoreError::Missing(_)) => StatusCode::NOT_FOUND,
      AppError::Cors { .. } => StatusCode::FORBIDDEN,
      AppError::Config(_) | AppError::Store(_) | AppError::Pipeline { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::info!(application_error = %self, status = status.as_u16(), "Responding with client error");
    }

    let body = match self {
      AppError::Validation(verdicts) => json!({ "errors": verdicts }),
      AppError::MalformedBody(_) => json!({ "error": "Malformed JSON body" }),
      AppError::NotFound(m) => json!({ "error": m }),
      AppError::Store(StoreError::Missing(_)) => json!({ "error": "Product not found" }),
      AppError::Cors { .. } => json!({ "error": "Not allowed by CORS" }),
      AppError::Config(_) => json!({ "error": "Configuration issue" }),
      AppError::Store(_) => json!({ "error": "Database operation failed" }),
      AppError::Pipeline { .. } => json!({ "error": "Request processing failed" }),
      AppError::Internal(_) => json!({ "error": "An internal error occurred" }),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
