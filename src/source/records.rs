// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn raw issue-event records (as fetched or cached in 01-raw.json) into typed pipeline Events
// role: source/records
// inputs: serde_json::Value array (newest-first), RepoSlug supplied by the caller
// outputs: Vec<Event> preserving record order
// invariants:
// - repo_full_name always comes from the caller, never from the payload
// - issue state and assignees are read from the record's embedded issue snapshot
// errors: DigestError::Transform naming the record index; malformed input is never repaired
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::DigestError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{Event, IssueState, RepoSlug};

pub fn events_from_raw(raw: &Value, repo: &RepoSlug) -> Result<Vec<Event>> {
  let Some(records) = raw.as_array() else {
    return Err(malformed(repo, 0, "expected a JSON array of event records").into());
  };

  records
    .iter()
    .enumerate()
    .map(|(index, record)| event_from_record(record, index, repo).map_err(anyhow::Error::from))
    .collect()
}

fn event_from_record(record: &Value, index: usize, repo: &RepoSlug) -> Result<Event, DigestError> {
  let kind = record
    .fetch("event")
    .as_str()
    .ok_or_else(|| malformed(repo, index, "missing event"))?;

  let created_raw = record
    .fetch("created_at")
    .as_str()
    .ok_or_else(|| malformed(repo, index, "missing created_at"))?;
  let created_at = DateTime::parse_from_rfc3339(created_raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| malformed(repo, index, format!("bad created_at {:?}: {}", created_raw, e)))?;

  let issue_number = record
    .fetch("issue.number")
    .to::<u64>()
    .ok_or_else(|| malformed(repo, index, "missing issue.number"))?;

  let state_raw = record.fetch("issue.state").as_str().unwrap_or_default();
  let issue_state = IssueState::parse(state_raw)
    .ok_or_else(|| malformed(repo, index, format!("unknown issue.state {:?}", state_raw)))?;

  let mut assignees = record.fetch("issue.assignees").pluck("login");
  if let Some(single) = record.fetch("issue.assignee.login").to::<String>() {
    if !assignees.contains(&single) {
      assignees.push(single);
    }
  }

  Ok(Event {
    kind: kind.to_string(),
    created_at,
    actor: record.fetch("actor.login").to::<String>(),
    issue_number,
    issue_state,
    assignees,
    repo_full_name: repo.full_name(),
  })
}

fn malformed(repo: &RepoSlug, index: usize, reason: impl Into<String>) -> DigestError {
  DigestError::Transform {
    repo: repo.full_name(),
    index,
    reason: reason.into(),
  }
}
