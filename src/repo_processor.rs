// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate per-repository processing: fetch (or reuse) raw events, filter, aggregate, sort, render, and emit the report
// role: processing/orchestrator
// inputs: EffectiveConfig (repos in request order, cache and sink options), optional now override
// outputs: Cache artifacts per repository, accumulated report.txt, final report on stdout or --output-path
// side_effects: Creates directories; writes JSON/text files; network calls via the Event Source; prints to stdout
// invariants:
// - repositories are processed strictly one after another, each fully rendered before the next starts
// - the event source is only built when some repository lacks a cached artifact
// - nothing reaches the sink unless every repository succeeded
// errors: First failure aborts the run; earlier artifacts remain (unless the cache dir is a removed fresh dir)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use once_cell::unsync::OnceCell;

use crate::aggregate::summarize;
use crate::cache::{memoize_json, CacheDir};
use crate::cli::EffectiveConfig;
use crate::filter::filter_events;
use crate::model::{IssueSummary, RepoSection, RepoSlug};
use crate::params::{build_filter_params, build_render_params, FilterParams};
use crate::render::render_report;
use crate::source::github_api::{build_source, EventSource};
use crate::source::records::events_from_raw;
use crate::util;

/// Event Source built on first use, so fully cached runs need no credentials.
pub struct LazySource<'a> {
  hostname: &'a str,
  cell: OnceCell<Box<dyn EventSource>>,
}

impl<'a> LazySource<'a> {
  pub fn new(hostname: &'a str) -> Self {
    Self { hostname, cell: OnceCell::new() }
  }

  #[cfg(test)]
  pub fn with_source(source: Box<dyn EventSource>) -> Self {
    Self { hostname: "", cell: OnceCell::with_value(source) }
  }

  fn get(&self) -> Result<&dyn EventSource> {
    self
      .cell
      .get_or_try_init(|| build_source(self.hostname))
      .map(|s| s.as_ref())
  }
}

/// Produce one repository's section, reusing cached artifacts when present.
pub fn process_repo(
  repo: &RepoSlug,
  cache: &CacheDir,
  source: &LazySource<'_>,
  filter_params: &FilterParams,
) -> Result<RepoSection> {
  let summaries: Vec<IssueSummary> = memoize_json(&cache.filtered_path(repo), || {
    let raw: serde_json::Value = memoize_json(&cache.raw_path(repo), || source.get()?.fetch_raw(repo))?;
    let events = events_from_raw(&raw, repo)?;
    let kept = filter_events(events, filter_params);
    Ok(summarize(kept))
  })
  .with_context(|| format!("processing {}", repo))?;

  tracing::info!(repo = %repo, issues = summaries.len(), "repository summarized");

  Ok(RepoSection {
    repo_full_name: repo.full_name(),
    summaries,
  })
}

pub fn process_repos(cfg: &EffectiveConfig) -> Result<()> {
  let now = util::effective_now(cfg.now_override);
  let cache = CacheDir::prepare(cfg.cache_dir.as_deref(), cfg.preserve, now)?;
  tracing::info!(dir = %cache.path().display(), repos = cfg.repos.len(), "starting digest");
  let filter_params = build_filter_params(cfg, now);
  let render_params = build_render_params(cfg);
  let source = LazySource::new(&cfg.hostname);

  let mut sections: Vec<RepoSection> = Vec::with_capacity(cfg.repos.len());
  let mut report = String::new();

  for repo in cfg.repos.iter() {
    sections.push(process_repo(repo, &cache, &source, &filter_params)?);
    report = render_report(&sections, &render_params);
    cache.write_report(&report)?;
  }

  util::write_report(&report, cfg.output_path.as_deref())
}
