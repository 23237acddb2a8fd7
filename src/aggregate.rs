// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Aggregator and Summary Sorter: group filtered events per issue link and order the resulting summaries
// role: pipeline/aggregate
// inputs: Filtered events in fetch order (newest-first as delivered by the source)
// outputs: Vec<IssueSummary>, one per distinct link, ordered by (latest_event_at, link)
// invariants:
// - every input event lands in exactly one summary (conservation)
// - state comes from the first event of the group in fetch order, not the newest by time
// - latest_event_at is the max created_at of the group; events are ascending by created_at, ties in fetch order
// - assignees are deduplicated and sorted so reruns are byte-identical
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Event, IssueSummary};

pub fn aggregate(events: Vec<Event>) -> Vec<IssueSummary> {
  let mut groups: BTreeMap<String, Vec<Event>> = BTreeMap::new();

  for ev in events {
    groups.entry(ev.link()).or_default().push(ev);
  }

  groups.into_iter().filter_map(|(link, group)| summarize_group(link, group)).collect()
}

fn summarize_group(link: String, mut events: Vec<Event>) -> Option<IssueSummary> {
  let first = events.first()?;
  let state = first.issue_state;
  let repo_full_name = first.repo_full_name.clone();

  let assignees: BTreeSet<String> = events.iter().flat_map(|e| e.assignees.iter().cloned()).collect();

  // stable: equal timestamps keep fetch order
  events.sort_by_key(|e| e.created_at);
  let latest_event_at = events.last()?.created_at;

  Some(IssueSummary {
    link,
    repo_full_name,
    state,
    latest_event_at,
    assignees: assignees.into_iter().collect(),
    events,
  })
}

/// Longest-idle issues first, most recently active last.
pub fn sort_summaries(summaries: &mut [IssueSummary]) {
  summaries.sort_by(|a, b| {
    a.latest_event_at
      .cmp(&b.latest_event_at)
      .then_with(|| a.link.cmp(&b.link))
  });
}

/// Aggregate then order: the shape stored in the `02-filtered` artifact.
pub fn summarize(events: Vec<Event>) -> Vec<IssueSummary> {
  let mut summaries = aggregate(events);
  sort_summaries(&mut summaries);
  tracing::debug!(summaries = summaries.len(), "aggregated events per issue");
  summaries
}
