//! test-support: helpers for robust, nextest-friendly integration tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support" }
//! ```
//!
//! Then in tests:
//! ```rust,ignore
//! use test_support::{digest_cmd, read_fixture_text};
//!
//! #[test]
//! fn example() {
//!     let events = read_fixture_text("events.json");
//!     let out = digest_cmd(&events).arg("acme/widgets").output().unwrap();
//!     assert!(out.status.success());
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

/// Binary under test.
pub const BIN: &str = "repo-activity-digest";

/// "now" used by every fixture-driven run; the fixtures are written against it.
pub const FIXTURE_NOW: &str = "2024-01-09T00:00:00Z";

/// Env var the binary reads fixture events from instead of calling the API.
pub const FIXTURE_ENV: &str = "RAD_TEST_EVENTS_JSON";

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// Resolved from this crate's manifest dir (`<repo>/tests/support`), so it's stable
/// regardless of the runner's working directory (cargo vs nextest).
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/support has a parent")
        .join("fixtures")
}

/// Return the path to the repository's `tests/schemas` directory.
pub fn schemas_dir() -> PathBuf {
    fixtures_dir().parent().expect("tests dir").join("schemas")
}

/// Read a UTF-8 text fixture into a string.
pub fn read_fixture_text<P: AsRef<Path>>(rel_path: P) -> String {
    let path = fixtures_dir().join(rel_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    assert_cmd::Command::cargo_bin(bin).expect("binary target not found")
}

/// The digest binary wired to serve `events_json` as its event source, pinned to `FIXTURE_NOW`.
///
/// Credentials are scrubbed so a misconfigured fixture can never reach the network.
pub fn digest_cmd(events_json: &str) -> assert_cmd::Command {
    let mut cmd = cmd_bin(BIN);
    cmd.env(FIXTURE_ENV, events_json)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("RUST_LOG")
        .args(["--now-override", FIXTURE_NOW]);
    cmd
}
