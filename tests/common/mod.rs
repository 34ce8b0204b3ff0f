// common/mod.rs - Shared test utilities
//
// Two kinds of helpers live here:
// 1. An in-memory connector that records every connect/execute/close call,
//    so fixture ordering can be checked without a database server.
// 2. A real PostgreSQL pool for the tests gated behind the `db-tools` feature.

#![allow(dead_code)]

use async_trait::async_trait;
use pg_seeder::db::{ConnectionHandle, Connector, SqlExecutor};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered record of everything that touched the fake database.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

/// Connector whose handles write into a [`Journal`].
///
/// Any statement containing one of `fail_on` is rejected with a protocol error.
#[derive(Clone, Default)]
pub struct RecordingConnector {
    pub journal: Journal,
    pub fail_on: Vec<&'static str>,
    pub fail_connect: bool,
    pub fail_close: bool,
    pub connections: Arc<AtomicUsize>,
}

impl RecordingConnector {
    pub fn new(journal: &Journal) -> Self {
        RecordingConnector {
            journal: journal.clone(),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, needle: &'static str) -> Self {
        self.fail_on.push(needle);
        self
    }

    pub fn connections_opened(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

pub struct RecordingHandle {
    id: usize,
    journal: Journal,
    fail_on: Vec<&'static str>,
    fail_close: bool,
}

#[async_trait]
impl SqlExecutor for RecordingHandle {
    async fn execute(&self, sql: &str) -> Result<(), sqlx::Error> {
        if self.fail_on.iter().any(|needle| sql.contains(needle)) {
            self.journal.push(format!("reject#{} {}", self.id, sql));
            return Err(sqlx::Error::Protocol(format!("rejected: {}", sql)));
        }
        self.journal.push(format!("exec#{} {}", self.id, sql));
        Ok(())
    }
}

#[async_trait]
impl ConnectionHandle for RecordingHandle {
    async fn release(self) -> Result<(), sqlx::Error> {
        self.journal.push(format!("close#{}", self.id));
        if self.fail_close {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    type Handle = RecordingHandle;

    async fn connect(&self) -> Result<RecordingHandle, sqlx::Error> {
        if self.fail_connect {
            self.journal.push("connect failed");
            return Err(sqlx::Error::PoolTimedOut);
        }
        let id = self.connections.fetch_add(1, Ordering::SeqCst) + 1;
        self.journal.push(format!("connect#{}", id));
        Ok(RecordingHandle {
            id,
            journal: self.journal.clone(),
            fail_on: self.fail_on.clone(),
            fail_close: self.fail_close,
        })
    }
}

/// Create a database connection pool for testing
pub async fn create_test_pool() -> anyhow::Result<PgPool> {
    dotenv::dotenv().ok();
    let database_url = env::var("DATABASE_URL")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    Ok(pool)
}

/// Check whether a table exists in the public schema
pub async fn table_exists(pool: &PgPool, table: &str) -> anyhow::Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_schema = 'public' AND table_name = $1)",
    )
    .bind(table)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Generate a table name unique to one test, so concurrent tests don't collide
pub fn unique_table_name(test_name: &str) -> String {
    let sanitized = test_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect::<String>();

    format!("seeder_{}_{}", sanitized, std::process::id())
}
