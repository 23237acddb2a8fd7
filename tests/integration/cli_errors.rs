use predicates::prelude::*;
use test_support::{cmd_bin, digest_cmd, read_fixture_text, BIN};

#[test]
fn include_and_exclude_together_is_a_usage_error() {
  cmd_bin(BIN)
    .args(["--include-event", "labeled", "--exclude-event", "merged", "acme/widgets"])
    .assert()
    .failure()
    .code(2)
    .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_repositories_is_a_usage_error() {
  cmd_bin(BIN)
    .args(["--format", "terminal"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("<REPO>"));
}

#[test]
fn malformed_slug_and_timezone_are_usage_errors() {
  let events = read_fixture_text("events.json");
  digest_cmd(&events)
    .arg("not-a-slug")
    .assert()
    .failure()
    .code(2)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("owner/name").and(predicate::str::contains("Usage:")));

  digest_cmd(&events)
    .args(["--tz", "Mars/Olympus", "acme/widgets"])
    .assert()
    .failure()
    .code(2)
    .stderr(predicate::str::contains("timezone").and(predicate::str::contains("Usage:")));
}

#[test]
fn colliding_cache_names_are_rejected_before_any_fetch() {
  let td = test_support::tempdir();
  let events = r#"{"a-b/c":[],"a/b-c":[]}"#;
  digest_cmd(events)
    .arg("--cache-dir")
    .arg(td.path())
    .args(["a-b/c", "a/b-c"])
    .assert()
    .failure()
    .code(2)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("a-b-c"));
  assert!(!td.path().join("a-b-c-01-raw.json").exists());
}

#[test]
fn source_failure_aborts_without_printing_a_report() {
  let events = read_fixture_text("events.json");
  // acme/widgets succeeds, acme/missing has no fixture
  digest_cmd(&events)
    .args(["acme/widgets", "acme/missing"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("acme/missing"));
}

#[test]
fn malformed_record_is_reported_with_its_index() {
  let events = r#"[{"event":"labeled","created_at":"2024-01-08T00:00:00Z","issue":{"number":1,"state":"open"}},{"event":"closed"}]"#;
  digest_cmd(events)
    .arg("acme/widgets")
    .assert()
    .failure()
    .stderr(predicate::str::contains("record 1"));
}

#[test]
fn no_credentials_is_an_environment_error() {
  let empty_path = test_support::tempdir();
  cmd_bin(BIN)
    .env_remove("RAD_TEST_EVENTS_JSON")
    .env_remove("GITHUB_TOKEN")
    .env_remove("GH_TOKEN")
    .env("PATH", empty_path.path())
    .arg("acme/widgets")
    .assert()
    .failure()
    .stderr(predicate::str::contains("no credentials"));
}
