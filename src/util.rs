// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for "now" resolution, timestamp rendering, report sink output, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; strftime patterns; clap CommandFactory
// outputs: Formatted timestamps, validated patterns, report text written to file or stdout, man page text
// side_effects: write_report writes to a file (creating parent directories) or stdout
// invariants:
// - format_timestamp never panics for patterns accepted by validate_date_format
// - effective_now is the only place the wall clock is read
// errors: IO errors bubble with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use clap::CommandFactory;

/// Zone used when rendering timestamps. Event timestamps are always stored in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTz {
  Utc,
  Local,
  Named(chrono_tz::Tz),
}

impl ReportTz {
  pub fn parse(s: &str) -> Result<Self> {
    if s.eq_ignore_ascii_case("utc") {
      return Ok(ReportTz::Utc);
    }

    if s.eq_ignore_ascii_case("local") {
      return Ok(ReportTz::Local);
    }

    match s.parse::<chrono_tz::Tz>() {
      Ok(zone) => Ok(ReportTz::Named(zone)),
      Err(_) => bail!("unknown timezone {:?}: use utc, local, or an IANA name", s),
    }
  }
}

/// Returns the effective "now" given an optional override.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Parse a `--now-override` value (RFC3339, e.g. 2024-01-09T00:00:00Z).
pub fn parse_now_override(raw: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .with_context(|| format!("invalid --now-override {:?}: expected RFC3339", raw))
}

/// Reject strftime patterns chrono cannot render.
pub fn validate_date_format(pattern: &str) -> Result<()> {
  if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
    bail!("invalid --date-format {:?}", pattern);
  }
  Ok(())
}

pub fn format_timestamp(ts: &DateTime<Utc>, pattern: &str, tz: ReportTz) -> String {
  match tz {
    ReportTz::Utc => ts.format(pattern).to_string(),
    ReportTz::Local => ts.with_timezone(&Local).format(pattern).to_string(),
    ReportTz::Named(zone) => ts.with_timezone(&zone).format(pattern).to_string(),
  }
}

/// Report Sink: write the finished report to `output_path`, or stdout when absent.
pub fn write_report(text: &str, output_path: Option<&Path>) -> Result<()> {
  match output_path {
    Some(path) => {
      if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
      }
      std::fs::write(path, text).with_context(|| format!("writing report to {}", path.display()))
    }
    None => {
      let mut out = std::io::stdout().lock();
      out.write_all(text.as_bytes())?;
      out.flush()?;
      Ok(())
    }
  }
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
