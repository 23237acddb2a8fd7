// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Event Source backed by the GitHub issue-events REST endpoint (token discovery, paginated calls)
// role: source/github-api
// inputs: hostname; env GITHUB_TOKEN / GH_TOKEN / GH_ENTERPRISE_TOKEN; optional `gh` CLI for token fallback; RAD_TEST_EVENTS_JSON fixtures
// outputs: Raw newest-first JSON arrays of issue-event records, one per repository
// side_effects: Network calls to the configured API host; spawns `gh` subprocess when needed
// invariants:
// - Token discovery prefers env vars, then `gh auth token --hostname <host>`
// - Pagination stops at the first empty or short page
// - Any HTTP or transport failure is fatal for the run (no retries)
// errors: DigestError::Source for fetch failures; DigestError::Environment when no credentials exist
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::error::DigestError;
use crate::model::RepoSlug;

const PER_PAGE: usize = 100;
const MAX_PAGES: u32 = 300;
const USER_AGENT: &str = "repo-activity-digest";
pub const FIXTURE_ENV: &str = "RAD_TEST_EVENTS_JSON";

// --- Trait seam for the Event Source ---
pub trait EventSource {
  /// Fetch every issue-event record for `repo`, newest first, as delivered by the host.
  fn fetch_raw(&self, repo: &RepoSlug) -> Result<Value>;
}

/// REST base URL for a hostname: github.com uses api.github.com, Enterprise uses /api/v3.
pub fn api_base_for_host(hostname: &str) -> String {
  if hostname == "github.com" || hostname == "api.github.com" {
    "https://api.github.com".to_string()
  } else {
    format!("https://{}/api/v3", hostname)
  }
}

fn non_empty_env(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|t| !t.trim().is_empty())
}

/// Discover a token for `hostname`: env vars first, then `gh auth token` if available.
pub fn get_github_token(hostname: &str) -> Option<String> {
  let env_keys: &[&str] = if hostname == "github.com" {
    &["GITHUB_TOKEN", "GH_TOKEN"]
  } else {
    &["GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"]
  };

  if let Some(t) = env_keys.iter().find_map(|k| non_empty_env(k)) {
    return Some(t);
  }

  let output = std::process::Command::new("gh")
    .args(["auth", "token", "--hostname", hostname])
    .output();

  if let Ok(output) = output {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

pub struct GithubHttpSource {
  api_base: String,
  token: String,
  agent: ureq::Agent,
}

impl GithubHttpSource {
  pub fn new(api_base: impl Into<String>, token: String) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout_connect(Duration::from_secs(10))
      .timeout_read(Duration::from_secs(60))
      .build();

    Self {
      api_base: api_base.into().trim_end_matches('/').to_string(),
      token,
      agent,
    }
  }

  fn get_page(&self, repo: &RepoSlug, page: u32) -> Result<Vec<Value>> {
    let url = format!("{}/repos/{}/{}/issues/events", self.api_base, repo.owner, repo.name);
    tracing::debug!(%url, page, "GET issue events");

    let resp = self
      .agent
      .get(&url)
      .query("per_page", &PER_PAGE.to_string())
      .query("page", &page.to_string())
      .set("Accept", "application/vnd.github+json")
      .set("User-Agent", USER_AGENT)
      .set("Authorization", &format!("Bearer {}", self.token))
      .call();

    let resp = match resp {
      Ok(r) => r,
      Err(ureq::Error::Status(code, r)) => {
        let body = r.into_string().unwrap_or_default();
        let reason = format!("HTTP {} from {}: {}", code, url, body.trim());
        return Err(DigestError::fetch(repo.full_name(), reason).into());
      }
      Err(ureq::Error::Transport(t)) => {
        return Err(DigestError::fetch(repo.full_name(), t.to_string()).into());
      }
    };

    let parsed: Value = resp
      .into_json()
      .map_err(|e| DigestError::fetch(repo.full_name(), format!("invalid JSON from {}: {}", url, e)))?;

    match parsed {
      Value::Array(items) => Ok(items),
      other => {
        let reason = format!("expected an array from {}, got {}", url, other);
        Err(DigestError::fetch(repo.full_name(), reason).into())
      }
    }
  }
}

impl EventSource for GithubHttpSource {
  fn fetch_raw(&self, repo: &RepoSlug) -> Result<Value> {
    let mut records: Vec<Value> = Vec::new();

    for page in 1..=MAX_PAGES {
      let items = self.get_page(repo, page)?;
      let short = items.len() < PER_PAGE;
      records.extend(items);

      if short {
        tracing::debug!(repo = %repo, pages = page, records = records.len(), "fetched issue events");
        return Ok(Value::Array(records));
      }
    }

    tracing::warn!(repo = %repo, max_pages = MAX_PAGES, "page limit reached; older events were not fetched");
    Ok(Value::Array(records))
  }
}

/// Fixture-backed source used by tests: `RAD_TEST_EVENTS_JSON` holds either one array
/// served for every repository or an object keyed by `owner/name`.
pub struct EnvFixtureSource;

impl EventSource for EnvFixtureSource {
  fn fetch_raw(&self, repo: &RepoSlug) -> Result<Value> {
    let raw = std::env::var(FIXTURE_ENV)
      .map_err(|_| DigestError::fetch(repo.full_name(), format!("{} is not set", FIXTURE_ENV)))?;
    let v: Value = serde_json::from_str(&raw)
      .map_err(|e| DigestError::fetch(repo.full_name(), format!("{} is not JSON: {}", FIXTURE_ENV, e)))?;

    match v {
      Value::Array(_) => Ok(v),
      Value::Object(mut by_repo) => by_repo
        .remove(&repo.full_name())
        .ok_or_else(|| DigestError::fetch(repo.full_name(), "no fixture for repository").into()),
      _ => Err(DigestError::fetch(repo.full_name(), "fixture must be an array or an object").into()),
    }
  }
}

fn env_wants_fixture() -> bool {
  std::env::var_os(FIXTURE_ENV).is_some()
}

/// Select the Event Source for a run: fixtures when present, otherwise HTTP with a discovered token.
pub fn build_source(hostname: &str) -> Result<Box<dyn EventSource>> {
  if env_wants_fixture() {
    tracing::debug!("using {} fixtures as the event source", FIXTURE_ENV);
    return Ok(Box::new(EnvFixtureSource));
  }

  let Some(token) = get_github_token(hostname) else {
    let msg = format!(
      "no credentials for {}: set GITHUB_TOKEN or GH_TOKEN, or install and log in to the gh CLI",
      hostname
    );
    return Err(DigestError::Environment(msg).into());
  };

  Ok(Box::new(GithubHttpSource::new(api_base_for_host(hostname), token)))
}
