//! Shared helpers for unit and integration tests.

use std::path::{Path, PathBuf};
use std::sync::Once;

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Install the global test subscriber once per test binary.
///
/// Verbosity follows `RUST_LOG`, defaulting to `debug`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Directory of the JSON fixtures shipped with the test suite.
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/trees")
}

/// Write `document` as `<dir>/<id>.json` and return the path.
pub fn write_tree(dir: &Path, id: &str, document: &Value) -> PathBuf {
    let path = dir.join(format!("{}.json", id));
    let content = serde_json::to_string_pretty(document).expect("serialize fixture");
    std::fs::write(&path, content).expect("write fixture");
    path
}
