use crate::cli::Format;
use crate::model::{IssueSummary, RepoSection};
use crate::params::RenderParams;
use crate::util::format_timestamp;

const EMPTY_SECTION: &str = "No matching activity.";
const GHOST_ACTOR: &str = "ghost";

const HEADER_LINK: &str = "LINK";
const HEADER_STATE: &str = "STATE";
const HEADER_LATEST: &str = "LATEST";
const HEADER_EVENTS: &str = "EVENTS";

/// Render every section in request order into one report.
pub fn render_report(sections: &[RepoSection], params: &RenderParams) -> String {
  sections
    .iter()
    .map(|s| render_section(s, params))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn render_section(section: &RepoSection, params: &RenderParams) -> String {
  match params.format {
    Format::MarkdownList => render_markdown_list(section),
    Format::MarkdownTable => render_markdown_table(section, params),
    Format::Terminal => render_terminal(section, params),
  }
}

fn render_markdown_list(section: &RepoSection) -> String {
  let mut out = format!("## {}\n\n", section.repo_full_name);

  if section.summaries.is_empty() {
    out.push_str(EMPTY_SECTION);
    out.push('\n');
    return out;
  }

  for summary in &section.summaries {
    out.push_str(&format!("- {}\n", summary.link));
    for ev in &summary.events {
      let actor = ev.actor.as_deref().unwrap_or(GHOST_ACTOR);
      out.push_str(&format!("  - {} by {}\n", ev.kind, actor));
    }
  }

  out
}

fn render_markdown_table(section: &RepoSection, params: &RenderParams) -> String {
  let mut out = format!("## {}\n\n", section.repo_full_name);

  if section.summaries.is_empty() {
    out.push_str(EMPTY_SECTION);
    out.push('\n');
    return out;
  }

  let rows = table_rows(&section.summaries, params);
  let w = ColumnWidths::measure(&rows);

  out.push_str(&format!(
    "| {:<lw$} | {:<sw$} | {:<tw$} | {} |\n",
    HEADER_LINK,
    HEADER_STATE,
    HEADER_LATEST,
    HEADER_EVENTS,
    lw = w.link,
    sw = w.state,
    tw = w.latest,
  ));
  out.push_str(&format!(
    "| {} | {} | {} | {} |\n",
    "-".repeat(w.link),
    "-".repeat(w.state),
    "-".repeat(w.latest),
    "-".repeat(HEADER_EVENTS.len()),
  ));

  for row in &rows {
    out.push_str(&format!(
      "| {:<lw$} | {:<sw$} | {:<tw$} | {} |\n",
      row.link,
      row.state,
      row.latest,
      row.events,
      lw = w.link,
      sw = w.state,
      tw = w.latest,
    ));
  }

  out
}

fn render_terminal(section: &RepoSection, params: &RenderParams) -> String {
  let mut out = format!("{}\n", section.repo_full_name);

  if section.summaries.is_empty() {
    out.push_str(EMPTY_SECTION);
    out.push('\n');
    return out;
  }

  let rows = table_rows(&section.summaries, params);
  let w = ColumnWidths::measure(&rows);

  let mut line = |link: &str, state: &str, latest: &str, events: &str| {
    out.push_str(&format!(
      "{:<lw$} | {:<sw$} | {:<tw$} | {}\n",
      link,
      state,
      latest,
      events,
      lw = w.link,
      sw = w.state,
      tw = w.latest,
    ));
  };

  line(HEADER_LINK, HEADER_STATE, HEADER_LATEST, HEADER_EVENTS);
  for row in &rows {
    line(&row.link, &row.state, &row.latest, &row.events);
  }

  out
}

/// One summary with every field already rendered to text.
struct TableRow {
  link: String,
  state: String,
  latest: String,
  events: String,
}

fn table_rows(summaries: &[IssueSummary], params: &RenderParams) -> Vec<TableRow> {
  summaries
    .iter()
    .map(|s| TableRow {
      link: s.link.clone(),
      state: s.state.as_str().to_string(),
      latest: format_timestamp(&s.latest_event_at, &params.date_format, params.tz),
      events: s
        .events
        .iter()
        .map(|e| e.kind.as_str())
        .collect::<Vec<_>>()
        .join(", "),
    })
    .collect()
}

/// Per-field widths for one section. EVENTS is the last column and never padded.
///
/// Header labels count toward each width, so an all-`open` section still pads STATE
/// to five characters and the header row lines up with the values beneath it.
#[derive(Debug, PartialEq, Eq)]
struct ColumnWidths {
  link: usize,
  state: usize,
  latest: usize,
}

impl ColumnWidths {
  fn measure(rows: &[TableRow]) -> Self {
    let widest = |header: &str, field: fn(&TableRow) -> &str| {
      rows
        .iter()
        .map(|r| field(r).chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
    };

    Self {
      link: widest(HEADER_LINK, |r| r.link.as_str()),
      state: widest(HEADER_STATE, |r| r.state.as_str()),
      latest: widest(HEADER_LATEST, |r| r.latest.as_str()),
    }
  }
}
