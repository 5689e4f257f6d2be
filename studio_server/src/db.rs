//! Async Postgres connection pool (diesel-async + deadpool).

use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

pub type DbPool = Pool<AsyncPgConnection>;

/// Build a pool. Connections are opened lazily on first checkout.
pub fn create_pool(database_url: &str, max_connections: usize) -> anyhow::Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager)
        .max_size(max_connections)
        .build()
        .map_err(|e| anyhow::anyhow!("database pool: {e}"))
}
