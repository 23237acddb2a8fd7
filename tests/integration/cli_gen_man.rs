use test_support::{cmd_bin, BIN};

#[test]
fn cli_generates_man_page() {
  let out = cmd_bin(BIN).args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.starts_with(".ie") || s.contains(".TH"));
  assert!(s.contains("repo\\-activity\\-digest") || s.contains("repo-activity-digest"));
}

#[test]
fn cli_lists_event_types_without_repos() {
  let out = cmd_bin(BIN).args(["--list-event-types"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8(out.stdout).unwrap();
  let kinds: Vec<&str> = s.lines().collect();
  assert!(kinds.contains(&"merged"));
  assert!(kinds.contains(&"labeled"));
  assert!(kinds.windows(2).all(|w| w[0] < w[1]));
}
