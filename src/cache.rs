// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Cache directory lifecycle and existence-check memoization of per-repository JSON artifacts
// role: persistence/cache
// inputs: optional --cache-dir, --preserve flag, effective now (temp dir naming)
// outputs: {stem}-01-raw.json, {stem}-02-filtered.json, report.txt under the cache directory
// side_effects: Creates directories; writes JSON/text files; removes a run-created directory on drop unless preserved
// invariants:
// - a directory that existed before the run is never removed
// - an existing artifact is reused as-is, never validated against inputs or refreshed
// - artifacts for finished repositories stay on disk when a later repository fails
// errors: IO and JSON errors surfaced with full path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::RepoSlug;

pub const REPORT_FILE: &str = "report.txt";

pub struct CacheDir {
  path: PathBuf,
  remove_on_drop: bool,
}

impl CacheDir {
  /// Use `requested` (created if absent) or a fresh timestamped directory under the system temp dir.
  pub fn prepare(requested: Option<&Path>, preserve: bool, now: DateTime<Utc>) -> Result<Self> {
    let path = match requested {
      Some(p) => p.to_path_buf(),
      None => std::env::temp_dir().join(format!(
        "repo-activity-digest-{}-{}",
        now.format("%Y%m%d-%H%M%S"),
        std::process::id()
      )),
    };

    let fresh = !path.exists();
    std::fs::create_dir_all(&path).with_context(|| format!("creating cache dir {}", path.display()))?;

    let remove_on_drop = fresh && !preserve;
    tracing::debug!(path = %path.display(), fresh, remove_on_drop, "cache directory ready");

    Ok(Self { path, remove_on_drop })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn raw_path(&self, repo: &RepoSlug) -> PathBuf {
    self.path.join(format!("{}-01-raw.json", repo.cache_stem()))
  }

  pub fn filtered_path(&self, repo: &RepoSlug) -> PathBuf {
    self.path.join(format!("{}-02-filtered.json", repo.cache_stem()))
  }

  pub fn report_path(&self) -> PathBuf {
    self.path.join(REPORT_FILE)
  }

  pub fn write_report(&self, text: &str) -> Result<()> {
    let path = self.report_path();
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))
  }
}

impl Drop for CacheDir {
  fn drop(&mut self) {
    if !self.remove_on_drop {
      return;
    }

    match std::fs::remove_dir_all(&self.path) {
      Ok(()) => tracing::debug!(path = %self.path.display(), "removed cache directory"),
      Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "could not remove cache directory"),
    }
  }
}

/// Reuse the JSON artifact at `path` when it exists; otherwise compute it and write it pretty-printed.
pub fn memoize_json<T, F>(path: &Path, compute: F) -> Result<T>
where
  T: Serialize + DeserializeOwned,
  F: FnOnce() -> Result<T>,
{
  if path.exists() {
    tracing::debug!(path = %path.display(), "cache hit");
    let buf = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    return serde_json::from_slice(&buf).with_context(|| format!("parsing cached {}", path.display()));
  }

  let value = compute()?;
  std::fs::write(path, serde_json::to_vec_pretty(&value)?).with_context(|| format!("writing {}", path.display()))?;
  tracing::debug!(path = %path.display(), "cache written");

  Ok(value)
}
