use sqlx::{PgPool, Pool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};
use std::sync::Arc;

use crate::{conf::settings, prelude::Result};

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

/// Checks a single connection out of the pool. Statements issued on it
/// auto-commit one by one; nothing here opens a transaction.
pub trait GetConn {
    async fn conn(&self) -> Result<PoolConnection<Postgres>>;
}

impl GetConn for PgPool {
    async fn conn(&self) -> Result<PoolConnection<Postgres>> {
        Ok(self.acquire().await?)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
}

impl AppState {
    pub fn new() -> Result<AppState> {
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
        })
    }
}
