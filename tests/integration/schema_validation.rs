use jsonschema::validator_for;
use test_support::{digest_cmd, read_fixture_text, schemas_dir};

fn compile_schema(name: &str) -> jsonschema::Validator {
  let data = std::fs::read(schemas_dir().join(name)).expect("schema file");
  let schema: serde_json::Value = serde_json::from_slice(&data).expect("valid schema JSON");
  validator_for(&schema).expect("compile schema")
}

#[test]
fn filtered_artifacts_conform_to_schema() {
  let td = test_support::tempdir();
  let events = read_fixture_text("events.json");

  digest_cmd(&events)
    .arg("--cache-dir")
    .arg(td.path())
    .args(["acme/widgets", "acme/gadgets"])
    .assert()
    .success();

  let compiled = compile_schema("issue-summaries.schema.json");
  for stem in ["acme-widgets", "acme-gadgets"] {
    let path = td.path().join(format!("{}-02-filtered.json", stem));
    let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    compiled
      .validate(&v)
      .unwrap_or_else(|e| panic!("{} failed schema validation: {}", path.display(), e));
  }
}

#[test]
fn schema_rejects_unknown_issue_state() {
  let compiled = compile_schema("issue-summaries.schema.json");
  let bad = serde_json::json!([{
    "link": "acme/widgets#1",
    "repo_full_name": "acme/widgets",
    "state": "merged",
    "latest_event_at": "2024-01-08T00:00:00Z",
    "assignees": [],
    "events": []
  }]);
  assert!(!compiled.is_valid(&bad));
}
