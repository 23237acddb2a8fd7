use test_support::{cmd_bin, digest_cmd, read_fixture_text, BIN, FIXTURE_NOW};

#[test]
fn preserved_cache_holds_raw_filtered_and_report() {
  let td = test_support::tempdir();
  let cache = td.path().join("cache");
  let events = read_fixture_text("events.json");

  let out = digest_cmd(&events)
    .args(["--format", "markdown-list", "--preserve", "--cache-dir"])
    .arg(&cache)
    .args(["acme/widgets", "acme/gadgets"])
    .output()
    .unwrap();
  assert!(out.status.success());

  for name in [
    "acme-widgets-01-raw.json",
    "acme-widgets-02-filtered.json",
    "acme-gadgets-01-raw.json",
    "acme-gadgets-02-filtered.json",
    "report.txt",
  ] {
    assert!(cache.join(name).is_file(), "missing {}", name);
  }

  let report = std::fs::read(cache.join("report.txt")).unwrap();
  assert_eq!(report, out.stdout);

  // raw artifact is the untouched source payload, merged record included
  let raw: serde_json::Value =
    serde_json::from_slice(&std::fs::read(cache.join("acme-widgets-01-raw.json")).unwrap()).unwrap();
  assert_eq!(raw.as_array().map(|a| a.len()), Some(5));
}

#[test]
fn fresh_cache_dir_is_removed_without_preserve() {
  let td = test_support::tempdir();
  let cache = td.path().join("scratch");
  let events = read_fixture_text("events.json");

  digest_cmd(&events)
    .arg("--cache-dir")
    .arg(&cache)
    .arg("acme/widgets")
    .assert()
    .success();

  assert!(!cache.exists());
}

#[test]
fn existing_cache_dir_is_kept_and_reused_without_a_source() {
  let td = test_support::tempdir();
  let events = read_fixture_text("events.json");

  digest_cmd(&events)
    .arg("--cache-dir")
    .arg(td.path())
    .args(["--format", "markdown-list", "acme/gadgets"])
    .assert()
    .success();
  assert!(td.path().join("acme-gadgets-02-filtered.json").is_file());

  // no fixture and no credentials: only the cache can answer
  let empty_path = test_support::tempdir();
  let out = cmd_bin(BIN)
    .env_remove("RAD_TEST_EVENTS_JSON")
    .env_remove("GITHUB_TOKEN")
    .env_remove("GH_TOKEN")
    .env("PATH", empty_path.path())
    .args(["--now-override", FIXTURE_NOW, "--format", "markdown-list", "--cache-dir"])
    .arg(td.path())
    .arg("acme/gadgets")
    .output()
    .unwrap();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(
    String::from_utf8(out.stdout).unwrap(),
    "## acme/gadgets\n\n- acme/gadgets#101\n  - reopened by ghost\n"
  );
}

#[test]
fn earlier_artifacts_survive_a_later_failure() {
  let td = test_support::tempdir();
  let events = read_fixture_text("events.json");

  digest_cmd(&events)
    .arg("--cache-dir")
    .arg(td.path())
    .args(["acme/widgets", "acme/missing"])
    .assert()
    .failure();

  assert!(td.path().join("acme-widgets-02-filtered.json").is_file());
  assert!(!td.path().join("acme-missing-01-raw.json").exists());
  let partial = std::fs::read_to_string(td.path().join("report.txt")).unwrap();
  assert!(partial.starts_with("acme/widgets\n"));
}
