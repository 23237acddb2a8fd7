// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define events, per-issue summaries, report sections and repository slugs shared by the pipeline stages
// role: model/types
// outputs: Serializable structs with stable field names; the 02-filtered cache artifact is a Vec<IssueSummary>
// invariants: link is always "{repo_full_name}#{issue_number}"; timestamps serialize as RFC3339 UTC
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Issue event kinds documented for the issue-events endpoint.
///
/// Used for `--list-event-types` and to warn about filter values that can never match;
/// the pipeline itself never rejects an event whose kind is missing from this list.
pub const EVENT_TYPES: &[&str] = &[
  "added_to_project",
  "assigned",
  "automatic_base_change_failed",
  "automatic_base_change_succeeded",
  "base_ref_changed",
  "closed",
  "commented",
  "committed",
  "connected",
  "convert_to_draft",
  "converted_note_to_issue",
  "converted_to_discussion",
  "cross-referenced",
  "demilestoned",
  "deployed",
  "deployment_environment_changed",
  "disconnected",
  "head_ref_deleted",
  "head_ref_force_pushed",
  "head_ref_restored",
  "labeled",
  "locked",
  "marked_as_duplicate",
  "mentioned",
  "merged",
  "milestoned",
  "moved_columns_in_project",
  "pinned",
  "ready_for_review",
  "referenced",
  "removed_from_project",
  "renamed",
  "reopened",
  "review_dismissed",
  "review_request_removed",
  "review_requested",
  "reviewed",
  "subscribed",
  "transferred",
  "unassigned",
  "unlabeled",
  "unlocked",
  "unmarked_as_duplicate",
  "unpinned",
  "unsubscribed",
  "user_blocked",
];

pub fn is_known_event_type(kind: &str) -> bool {
  EVENT_TYPES.contains(&kind)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
  Open,
  Closed,
}

impl IssueState {
  pub fn as_str(&self) -> &'static str {
    match self {
      IssueState::Open => "open",
      IssueState::Closed => "closed",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "open" => Some(IssueState::Open),
      "closed" => Some(IssueState::Closed),
      _ => None,
    }
  }
}

/// One lifecycle event on an issue or pull request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Event {
  #[serde(rename = "type")]
  pub kind: String,
  pub created_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub actor: Option<String>,
  pub issue_number: u64,
  pub issue_state: IssueState,
  #[serde(default)]
  pub assignees: Vec<String>,
  pub repo_full_name: String,
}

impl Event {
  /// Grouping key: `owner/name#number`.
  pub fn link(&self) -> String {
    format!("{}#{}", self.repo_full_name, self.issue_number)
  }
}

/// One report row: everything that happened to a single issue within the window.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IssueSummary {
  pub link: String,
  pub repo_full_name: String,
  pub state: IssueState,
  pub latest_event_at: DateTime<Utc>,
  pub assignees: Vec<String>,
  pub events: Vec<Event>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RepoSection {
  pub repo_full_name: String,
  pub summaries: Vec<IssueSummary>,
}

/// A validated `owner/name` repository argument.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RepoSlug {
  pub owner: String,
  pub name: String,
}

impl RepoSlug {
  pub fn parse(s: &str) -> Result<Self> {
    static RE_SLUG: Lazy<regex::Regex> =
      Lazy::new(|| regex::Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)/([A-Za-z0-9._-]+)$").unwrap());

    let Some(c) = RE_SLUG.captures(s.trim()) else {
      bail!("invalid repository {:?}: expected owner/name", s);
    };

    Ok(Self {
      owner: c[1].to_string(),
      name: c[2].to_string(),
    })
  }

  pub fn full_name(&self) -> String {
    format!("{}/{}", self.owner, self.name)
  }

  /// File-name stem for this repository's cache artifacts (`owner-name`).
  pub fn cache_stem(&self) -> String {
    format!("{}-{}", self.owner, self.name)
  }
}

impl std::fmt::Display for RepoSlug {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}
