// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failure taxonomy for a digest run (configuration, environment, data source, transformation)
// role: errors/taxonomy
// outputs: DigestError, carried inside anyhow::Error so callers can downcast
// invariants: Every variant is fatal; nothing is retried
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
  /// Invalid or contradictory options; raised before any work is done.
  #[error("configuration error: {0}")]
  Config(String),

  /// A required external tool or credential is unavailable.
  #[error("environment error: {0}")]
  Environment(String),

  /// The event source failed (network, auth, rate limit, missing fixture).
  #[error("event source failed for {repo}: {reason}")]
  Source { repo: String, reason: String },

  /// A raw or cached record could not be turned into pipeline input.
  #[error("malformed event record {index} for {repo}: {reason}")]
  Transform { repo: String, index: usize, reason: String },
}

impl DigestError {
  pub fn fetch(repo: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::Source { repo: repo.into(), reason: reason.into() }
  }
}
