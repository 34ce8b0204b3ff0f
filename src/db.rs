// db.rs - The database client boundary
//
// The seeder only needs three things from a database client:
// 1. build a connection from configuration   (Connector::connect)
// 2. run one SQL statement                    (SqlExecutor::execute)
// 3. shut the connection down                 (ConnectionHandle::release)
//
// PostgreSQL through a sqlx pool is the real implementation. Keeping the
// boundary behind traits lets the fixture logic be exercised without a server.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::ConnectionConfig;

/// Runs a single SQL statement, verbatim.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<(), sqlx::Error>;
}

/// A connection owned by exactly one fixture run.
#[async_trait]
pub trait ConnectionHandle: SqlExecutor + Sized {
    async fn release(self) -> Result<(), sqlx::Error>;
}

/// Creates a fresh [`ConnectionHandle`] for each fixture run.
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: ConnectionHandle;

    async fn connect(&self) -> Result<Self::Handle, sqlx::Error>;
}

#[async_trait]
impl SqlExecutor for PgPool {
    async fn execute(&self, sql: &str) -> Result<(), sqlx::Error> {
        // raw_sql uses the simple query protocol: no parameters, no prepare,
        // and several `;`-separated commands are allowed in one string.
        let result = sqlx::raw_sql(sql).execute(self).await?;
        tracing::trace!(rows_affected = result.rows_affected(), "statement done");
        Ok(())
    }
}

#[async_trait]
impl ConnectionHandle for PgPool {
    async fn release(self) -> Result<(), sqlx::Error> {
        // Pool::close waits for checked-out connections and never fails.
        PgPool::close(&self).await;
        Ok(())
    }
}

/// Opens a new PostgreSQL pool per fixture run.
///
/// The pool holds a single connection, so every statement of a run shares one
/// session: temp tables, `SET search_path` and `BEGIN`/`COMMIT` sent as
/// separate statements all carry over to the next statement.
#[derive(Debug, Clone)]
pub struct PgConnector {
    config: ConnectionConfig,
}

impl PgConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        PgConnector { config }
    }

    fn pool_options() -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        match &self.config {
            ConnectionConfig::Url(url) => Self::pool_options().connect(url).await,
            ConnectionConfig::Options(options) => Self::pool_options().connect_with(options.clone()).await,
        }
    }
}
