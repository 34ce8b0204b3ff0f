// fixtures/mod.rs - Test fixtures module
//
// What is a fixture?
// A fixture is setup code that wraps a test. It runs its setup, hands control
// to the test body, and runs its teardown once the body is done:
//
//   async fn setup(&self, use_fn) {
//       connect + seed;
//       use_fn().await;     // <- the test body runs here
//       clean + close;
//   }
//
// Fixtures are registered on a `TestType` (see runner.rs), which chains them
// around every test it runs.

pub mod seeder;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::runner::TestError;

/// Continuation handed to a fixture. Calling it runs the rest of the fixture
/// chain and the test body, and resolves once they have finished.
pub type Use<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<(), TestError>> + Send + 'a>;

/// A named setup/teardown unit applied around test bodies.
pub trait Fixture: Send + Sync {
    fn setup<'a>(&'a self, use_fn: Use<'a>) -> BoxFuture<'a, Result<(), FixtureError>>;
}

/// How a fixture run ended, by phase.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture could not prepare; the test body never ran.
    #[error("setup failed: {0}")]
    Setup(#[source] anyhow::Error),

    /// Setup and teardown were fine but the wrapped test failed.
    #[error(transparent)]
    Body(TestError),

    /// Teardown failed. Any earlier failure (setup or body) is kept in `masked`.
    #[error("teardown failed: {source}")]
    Teardown {
        #[source]
        source: anyhow::Error,
        masked: Option<Box<FixtureError>>,
    },
}

impl FixtureError {
    /// Attach the fixture's registered name, producing the error a test report shows.
    pub fn into_test_error(self, fixture: &str) -> TestError {
        match self {
            FixtureError::Setup(source) => TestError::Setup {
                fixture: fixture.to_string(),
                source,
            },
            FixtureError::Body(err) => err,
            FixtureError::Teardown { source, masked } => TestError::Teardown {
                fixture: fixture.to_string(),
                source,
                masked: masked.map(|m| Box::new(m.into_test_error(fixture))),
            },
        }
    }
}
