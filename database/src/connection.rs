use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Upper bound on any single connection attempt. There is no retry or
/// reconnection policy beyond this; an unreachable store is fatal to the
/// caller.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a connection pool against `url`, establishing one connection
/// eagerly so an unreachable store fails here rather than on the first
/// request.
pub async fn connect(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(url)
        .await
}
