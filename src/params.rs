use chrono::{DateTime, TimeDelta, Utc};

use crate::cli::{EffectiveConfig, EventTypeFilter, Format};
use crate::util::ReportTz;

/// Inputs for the Event Filter stage.
#[derive(Debug, Clone)]
pub struct FilterParams {
  pub event_types: EventTypeFilter,
  pub since_days: u32,
  pub now: DateTime<Utc>,
}

impl FilterParams {
  /// Events must be strictly newer than this instant.
  ///
  /// A window reaching past the representable range clamps to the earliest instant.
  pub fn cutoff(&self) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(self.since_days))
      .and_then(|window| self.now.checked_sub_signed(window))
      .unwrap_or(DateTime::<Utc>::MIN_UTC)
  }
}

/// Inputs for the Renderer stage.
#[derive(Debug, Clone)]
pub struct RenderParams {
  pub format: Format,
  pub date_format: String,
  pub tz: ReportTz,
}

pub fn build_filter_params(cfg: &EffectiveConfig, now: DateTime<Utc>) -> FilterParams {
  FilterParams {
    event_types: cfg.event_types.clone(),
    since_days: cfg.since_days,
    now,
  }
}

pub fn build_render_params(cfg: &EffectiveConfig) -> RenderParams {
  RenderParams {
    format: cfg.format,
    date_format: cfg.date_format.clone(),
    tz: cfg.tz,
  }
}
