// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Event Filter stage: narrow fetched events by event-type membership, then by the recency window
// role: pipeline/filter
// inputs: Vec<Event> in fetch order, FilterParams (type selection, since_days, now)
// outputs: Surviving events, still in fetch order
// invariants:
// - output is a subset of input; no event is modified
// - an event exactly at now - since_days is dropped (strict inequality)
// - unknown type names simply never match
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::cli::EventTypeFilter;
use crate::model::Event;
use crate::params::FilterParams;

impl EventTypeFilter {
  pub fn admits(&self, kind: &str) -> bool {
    match self {
      EventTypeFilter::All => true,
      EventTypeFilter::Include(set) => set.contains(kind),
      EventTypeFilter::Exclude(set) => !set.contains(kind),
    }
  }
}

pub fn filter_events(events: Vec<Event>, params: &FilterParams) -> Vec<Event> {
  let cutoff = params.cutoff();
  let fetched = events.len();

  let kept: Vec<Event> = events
    .into_iter()
    .filter(|ev| params.event_types.admits(&ev.kind))
    .filter(|ev| ev.created_at > cutoff)
    .collect();

  tracing::debug!(fetched, kept = kept.len(), %cutoff, "filtered events");

  kept
}
