// queries.rs - Run statement sets against a connection
//
// Statements run strictly one after another: each one is awaited before the
// next is sent. The first failure stops the set and its database error is
// returned as-is. Nothing is rolled back and nothing is retried.

use crate::config::StatementSet;
use crate::db::SqlExecutor;

/// Execute every statement of `statements` in order.
pub async fn run_statements<E>(executor: &E, statements: &StatementSet) -> Result<(), sqlx::Error>
where
    E: SqlExecutor + ?Sized,
{
    let total = statements.len();
    for (index, sql) in statements.iter().enumerate() {
        tracing::debug!(statement = index + 1, total, "executing SQL");
        if let Err(e) = executor.execute(sql).await {
            tracing::error!(statement = index + 1, total, error = %e, "SQL statement failed");
            return Err(e);
        }
    }
    Ok(())
}

/// Run the seed statements (INSERTs, CREATEs, ...).
pub async fn seed_database<E>(executor: &E, seed_sql: &StatementSet) -> Result<(), sqlx::Error>
where
    E: SqlExecutor + ?Sized,
{
    tracing::info!(statements = seed_sql.len(), "seeding database");
    run_statements(executor, seed_sql).await
}

/// Run the cleanup statements (DELETEs, TRUNCATEs, DROPs, ...).
pub async fn clean_database<E>(executor: &E, clean_sql: &StatementSet) -> Result<(), sqlx::Error>
where
    E: SqlExecutor + ?Sized,
{
    tracing::info!(statements = clean_sql.len(), "cleaning database");
    run_statements(executor, clean_sql).await
}
