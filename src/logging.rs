// logging.rs - Tracing setup for test binaries
//
// Call `init_tracing()` at the top of a test to see what the seeder is doing.
// The level comes from RUST_LOG (default: info). Calling it more than once is
// fine, only the first call installs a subscriber.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_test_writer()
        .try_init();
}
