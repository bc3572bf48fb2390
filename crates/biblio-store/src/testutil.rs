//! Test-only filesystem helpers.
//!
//! Each test gets its own directory under the system temp dir, removed
//! on drop so failed assertions don't leak files between runs.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Once;

static NEXT_DIR: AtomicU32 = AtomicU32::new(0);
static TRACING: Once = Once::new();

/// Installs a test-writer tracing subscriber once per process.
///
/// Run with `RUST_LOG=biblio_store=debug` to see store activity while
/// debugging a failing test.
pub(crate) fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A uniquely named scratch directory, removed on drop.
pub(crate) struct TestDir {
    root: PathBuf,
}

impl TestDir {
    pub(crate) fn new() -> Self {
        let root = std::env::temp_dir().join(format!(
            "biblio-store-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&root).expect("create test dir");
        TestDir { root }
    }

    /// A path inside the scratch directory.
    pub(crate) fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
