use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};

use crate::error::DigestError;
use crate::model::{is_known_event_type, RepoSlug};
use crate::util::{self, ReportTz};

#[derive(Parser, Debug)]
#[command(
    name = "repo-activity-digest",
    version,
    about = "Digest recent issue and pull-request activity for one or more repositories",
    long_about = None
)]
pub struct Cli {
  /// Repositories to report on, as owner/name (processed in the order given)
  #[arg(value_name = "REPO", required_unless_present_any = ["gen_man", "list_event_types"])]
  pub repos: Vec<String>,

  /// Directory for intermediate artifacts; created if absent, reused if present
  #[arg(long)]
  pub cache_dir: Option<PathBuf>,

  /// strftime-style pattern applied to every rendered timestamp
  #[arg(long, default_value = "%Y-%m-%d %H:%M")]
  pub date_format: String,

  /// Verbose tracing of API calls, cache hits and filter decisions (stderr)
  #[arg(long)]
  pub debug: bool,

  /// Drop events of this type (repeatable)
  #[arg(long = "exclude-event", value_name = "TYPE")]
  pub exclude_event: Vec<String>,

  /// Keep only events of this type (repeatable)
  #[arg(long = "include-event", value_name = "TYPE", conflicts_with = "exclude_event")]
  pub include_event: Vec<String>,

  /// Report layout
  #[arg(long, value_enum, default_value_t = Format::Terminal)]
  pub format: Format,

  /// Code-hosting instance to query
  #[arg(long, default_value = "github.com")]
  pub hostname: String,

  /// Write the report here instead of stdout
  #[arg(long)]
  pub output_path: Option<PathBuf>,

  /// Keep a freshly created cache directory after the run
  #[arg(long)]
  pub preserve: bool,

  /// Recency window in days
  #[arg(long, default_value_t = 7)]
  pub since: u32,

  /// Timezone for rendered timestamps: utc, local, or an IANA name (e.g. Europe/Berlin)
  #[arg(long, default_value = "utc")]
  pub tz: String,

  /// Print the known event types and exit
  #[arg(long)]
  pub list_event_types: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used for the recency window (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

/// One identifier per layout; selected once at configuration time.
#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Format {
  MarkdownList,
  MarkdownTable,
  Terminal,
}

/// Event-type selection resolved from `--include-event` / `--exclude-event`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventTypeFilter {
  All,
  Include(BTreeSet<String>),
  Exclude(BTreeSet<String>),
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub repos: Vec<RepoSlug>,
  pub cache_dir: Option<PathBuf>,
  pub date_format: String,
  pub event_types: EventTypeFilter,
  pub format: Format,
  pub hostname: String,
  pub output_path: Option<PathBuf>,
  pub preserve: bool,
  pub since_days: u32,
  pub tz: ReportTz,
  pub now_override: Option<DateTime<Utc>>,
}

fn config_error(msg: impl std::fmt::Display) -> anyhow::Error {
  DigestError::Config(msg.to_string()).into()
}

/// Distinct repositories must not share cache artifact names (`a-b/c` and `a/b-c` both map to `a-b-c`).
fn reject_stem_collisions(repos: &[RepoSlug]) -> Result<()> {
  let mut seen: BTreeMap<String, &RepoSlug> = BTreeMap::new();
  for repo in repos {
    let stem = repo.cache_stem();
    if let Some(prior) = seen.get(&stem).copied() {
      if prior != repo {
        return Err(config_error(format!(
          "{} and {} would share cache artifacts named {:?}; request them in separate runs",
          prior, repo, stem
        )));
      }
      continue;
    }
    seen.insert(stem, repo);
  }
  Ok(())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  if cli.repos.is_empty() {
    return Err(config_error("at least one repository (owner/name) is required"));
  }

  let event_types = match (cli.include_event.is_empty(), cli.exclude_event.is_empty()) {
    (true, true) => EventTypeFilter::All,
    (false, true) => EventTypeFilter::Include(cli.include_event.iter().cloned().collect()),
    (true, false) => EventTypeFilter::Exclude(cli.exclude_event.iter().cloned().collect()),
    (false, false) => {
      return Err(config_error("--include-event and --exclude-event are mutually exclusive"));
    }
  };

  for kind in cli.include_event.iter().chain(cli.exclude_event.iter()) {
    if !is_known_event_type(kind) {
      tracing::warn!(event_type = %kind, "unknown event type; it will never match an event");
    }
  }

  let repos = cli
    .repos
    .iter()
    .map(|r| RepoSlug::parse(r).map_err(config_error))
    .collect::<Result<Vec<_>>>()?;
  reject_stem_collisions(&repos)?;

  util::validate_date_format(&cli.date_format).map_err(config_error)?;
  let tz = ReportTz::parse(&cli.tz).map_err(config_error)?;

  let now_override = cli
    .now_override
    .as_deref()
    .map(util::parse_now_override)
    .transpose()
    .map_err(config_error)?;

  let hostname = cli.hostname.trim().to_ascii_lowercase();
  if hostname.is_empty() {
    return Err(config_error("--hostname must not be empty"));
  }

  Ok(EffectiveConfig {
    repos,
    cache_dir: cli.cache_dir,
    date_format: cli.date_format,
    event_types,
    format: cli.format,
    hostname,
    output_path: cli.output_path,
    preserve: cli.preserve,
    since_days: cli.since,
    tz,
    now_override,
  })
}
