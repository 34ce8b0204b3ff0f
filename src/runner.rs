// runner.rs - Test definitions with automatically applied fixtures
//
// A `TestType` is an immutable list of named fixtures. `extend` returns a new
// `TestType` with one more fixture, leaving the original alone, so one base
// can be extended several ways:
//
//   let base = TestType::new();
//   let users = extend_with_seeder(&base, users_options);
//   let orders = extend_with_seeder(&base, orders_options);
//
//   users.run("lists users", || async { ... }).await?;
//
// Fixtures wrap the body in registration order: the first one registered is
// the outermost, so it sets up first and tears down last.

use futures::future::{BoxFuture, FutureExt};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

use crate::config::SeederOptions;
use crate::fixtures::seeder::create_seeder_fixture;
use crate::fixtures::{Fixture, Use};

/// Name under which [`extend_with_seeder`] registers the seeding fixture.
pub const SEEDER_FIXTURE: &str = "db_seeder";

/// Why a test run failed. Setup and teardown failures are reported apart
/// from failures inside the test body.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("test failed: {0}")]
    Failed(#[source] anyhow::Error),

    #[error("test panicked: {0}")]
    Panicked(String),

    #[error("fixture `{fixture}` setup failed: {source}")]
    Setup {
        fixture: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("fixture `{fixture}` teardown failed: {source}")]
    Teardown {
        fixture: String,
        #[source]
        source: anyhow::Error,
        /// Failure that happened before teardown and is hidden by it.
        masked: Option<Box<TestError>>,
    },
}

impl TestError {
    /// Name of the fixture that failed, if the failure came from one.
    pub fn fixture(&self) -> Option<&str> {
        match self {
            TestError::Setup { fixture, .. } | TestError::Teardown { fixture, .. } => Some(fixture.as_str()),
            TestError::Failed(_) | TestError::Panicked(_) => None,
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// An extensible test definition.
#[derive(Clone, Default)]
pub struct TestType {
    fixtures: Vec<(String, Arc<dyn Fixture>)>,
}

impl fmt::Debug for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestType")
            .field("fixtures", &self.fixture_names().collect::<Vec<_>>())
            .finish()
    }
}

impl TestType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fixture` under `name` on a copy of this definition.
    ///
    /// Registering a name that already exists replaces that fixture in place.
    pub fn extend(&self, name: impl Into<String>, fixture: impl Fixture + 'static) -> TestType {
        let name = name.into();
        let fixture: Arc<dyn Fixture> = Arc::new(fixture);
        let mut fixtures = self.fixtures.clone();

        match fixtures.iter().position(|(existing, _)| *existing == name) {
            Some(index) => fixtures[index].1 = fixture,
            None => fixtures.push((name, fixture)),
        }

        TestType { fixtures }
    }

    pub fn fixture_names(&self) -> impl Iterator<Item = &str> {
        self.fixtures.iter().map(|(name, _)| name.as_str())
    }

    /// Run `body` wrapped by every registered fixture.
    pub async fn run<F, Fut>(&self, title: &str, body: F) -> Result<(), TestError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<()>> + Send,
    {
        tracing::info!(test = title, fixtures = self.fixtures.len(), "running test");

        let body: Use<'_> = Box::new(move || {
            async move {
                match AssertUnwindSafe(async move { body().await }).catch_unwind().await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(TestError::Failed(e)),
                    Err(panic) => Err(TestError::Panicked(panic_message(panic.as_ref()))),
                }
            }
            .boxed()
        });

        let result = run_chain(&self.fixtures, body).await;
        match &result {
            Ok(()) => tracing::info!(test = title, "test passed"),
            Err(e) => tracing::warn!(test = title, error = %e, "test failed"),
        }
        result
    }
}

fn run_chain<'a>(fixtures: &'a [(String, Arc<dyn Fixture>)], body: Use<'a>) -> BoxFuture<'a, Result<(), TestError>> {
    match fixtures.split_first() {
        None => body(),
        Some(((name, fixture), rest)) => async move {
            let inner: Use<'a> = Box::new(move || run_chain(rest, body));
            fixture.setup(inner).await.map_err(|e| e.into_test_error(name))
        }
        .boxed(),
    }
}

/// Extend `base` with the database seeding fixture.
///
/// Every test run through the returned definition is seeded before its body
/// and cleaned after it. `base` is left untouched.
pub fn extend_with_seeder(base: &TestType, options: &SeederOptions) -> TestType {
    base.extend(SEEDER_FIXTURE, create_seeder_fixture(options))
}
