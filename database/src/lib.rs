pub mod config;
pub mod connection;
pub mod schema;

pub use sqlx;

use sqlx::PgPool;

/// Applies any pending schema migrations embedded in this crate.
pub async fn initialize(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
