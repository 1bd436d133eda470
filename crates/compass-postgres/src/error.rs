use compass_core::store::StoreError;

/// SQLSTATE classes that mean the connection itself died rather than the
/// statement failing: class 08 (connection exception) and the 57P admin
/// shutdown / crash shutdown / cannot-connect family.
pub(crate) fn is_connection_code(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("57P")
}

/// Classify a sqlx failure into the store taxonomy.
///
/// Terminated connections and pool acquisition failures map to
/// [`StoreError::ConnectionLost`] (surfaced as 503, retry-later); anything
/// else is a plain [`StoreError::Database`] (500).
pub(crate) fn map_sqlx_err(e: sqlx::Error) -> StoreError {
    let transient = match &e {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db.code().as_deref().is_some_and(is_connection_code),
        _ => false,
    };
    if transient {
        StoreError::ConnectionLost(e.to_string())
    } else {
        StoreError::Database(e.to_string())
    }
}
