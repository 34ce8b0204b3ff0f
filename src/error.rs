// error.rs - Errors raised while seeding and cleaning the database
//
// Every phase of a fixture run has its own variant, so a test report can say
// whether things went wrong before the test body ran or after it finished.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeederError>;

#[derive(Debug, Error)]
pub enum SeederError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("seed statement failed: {0}")]
    Seed(#[source] sqlx::Error),

    #[error("cleanup statement failed: {0}")]
    Clean(#[source] sqlx::Error),

    #[error("failed to close connection pool: {0}")]
    Close(#[source] sqlx::Error),

    #[error("DATABASE_URL must be set in environment")]
    MissingDatabaseUrl,

    #[error("invalid seeder configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read SQL file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SeederError {
    /// True for failures that happen before the test body gets to run.
    pub fn is_setup(&self) -> bool {
        matches!(self, SeederError::Connect(_) | SeederError::Seed(_))
    }
}
