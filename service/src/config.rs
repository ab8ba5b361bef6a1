// service/src/config.rs

use crate::errors::{AppError, Result};
use crate::web::cors::CorsPolicy;
use dotenvy::dotenv;
use std::env;

/// Mount point of the product resource.
pub const API_PREFIX: &str = "/api/products";
/// Mount point of the API documentation.
pub const DOCS_PATH: &str = "/docs";

/// `DATABASE_URL` prefix selecting the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub cors: CorsPolicy,
  pub log_format: LogFormat,
}

impl AppConfig {
  /// Loads `.env` when present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let require = |var_name: &str| {
      lookup(var_name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = lookup("SERVER_PORT")
      .or_else(|| lookup("PORT"))
      .unwrap_or_else(|| "4000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = require("DATABASE_URL")?;
    let db_max_connections = lookup("DB_MAX_CONNECTIONS")
      .unwrap_or_else(|| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;

    let allowed_origin = require("FRONTEND_URL")?;
    let allow_no_origin = lookup("CORS_ALLOW_NO_ORIGIN")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid CORS_ALLOW_NO_ORIGIN value: {}", e)))?;

    let log_format = match lookup("LOG_FORMAT").as_deref() {
      None | Some("pretty") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      cors: CorsPolicy::new(allowed_origin, allow_no_origin),
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }

  pub fn uses_memory_store(&self) -> bool {
    self.database_url.starts_with(MEMORY_DATABASE_URL)
  }
}
