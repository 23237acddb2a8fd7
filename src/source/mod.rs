// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the Event Source (GitHub issue-events API, test fixtures) and raw record decoding
// role: source/namespace
// outputs: Public submodules implementing fetching and record-to-Event conversion
// invariants: The source isolates all network access; the pipeline stages never touch it
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod github_api;
pub mod records;
