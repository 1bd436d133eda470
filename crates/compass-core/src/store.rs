//! Storage abstraction for the ingestion endpoint.
//!
//! The server talks to storage only through [`EventStore`], so integration
//! tests inject an in-memory mock and the Postgres backend stays behind a
//! crate boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::event::EventRow;

/// Storage-layer failures, already classified for the HTTP error mapping.
///
/// Carries rendered messages instead of backend error types so this crate
/// stays free of any database dependency.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying connection was forcibly terminated, or none could be
    /// acquired from the pool in time. Retrying later may succeed.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// Any other write failure. Not worth retrying blindly.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    /// `true` for failures where a later retry may succeed (maps to 503).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionLost(_))
    }
}

/// Append-only event sink. One row per accepted event, never updated or
/// deleted by this subsystem.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert_event(&self, row: &EventRow) -> Result<(), StoreError>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
