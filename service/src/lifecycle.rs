// service/src/lifecycle.rs

//! Startup connection to the product store.

use crate::store::ProductStore;
use tracing::{debug, error, instrument};

pub const DB_CONNECTION_FAILURE: &str = "There was an error connecting to the database";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
  Connected,
  /// The server keeps running; store-bound requests fail until the store recovers.
  Degraded,
}

/// Authenticates against the store, then syncs the schema. Runs once, never retries.
#[instrument(name = "lifecycle::connect_db", skip(store))]
pub async fn connect_db(store: &dyn ProductStore) -> ConnectionOutcome {
  let result = async {
    store.authenticate().await?;
    store.sync_schema().await
  }
  .await;

  match result {
    Ok(()) => {
      debug!("Database connection established and schema synced.");
      ConnectionOutcome::Connected
    }
    Err(e) => {
      error!(error = %e, "{}", DB_CONNECTION_FAILURE);
      ConnectionOutcome::Degraded
    }
  }
}
