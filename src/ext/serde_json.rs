// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path lookup into raw event records (objects and array indices) with typed extraction
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper (typed extraction, borrowed str, per-element plucking)
// invariants: No panics; missing paths and null leaves yield None; plucking skips elements lacking the field
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A location inside a JSON document, resolved lazily to a typed value.
pub struct JsonFetched<'a> {
  inner: Option<&'a Value>,
}

impl<'a> JsonFetched<'a> {
  /// Deserialize the located value as `T`; `None` when absent, null, or mistyped.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self
      .inner
      .filter(|v| !v.is_null())
      .and_then(|v| T::deserialize(v).ok())
  }

  /// Borrow a string leaf without allocating.
  pub fn as_str(&self) -> Option<&'a str> {
    self.inner.and_then(Value::as_str)
  }

  /// For an array location, collect `field` (a dotted path) from each element as a string.
  ///
  /// `record.fetch("issue.assignees").pluck("login")` yields every assignee login.
  pub fn pluck(&self, field: &str) -> Vec<String> {
    let Some(items) = self.inner.and_then(Value::as_array) else {
      return Vec::new();
    };

    items
      .iter()
      .filter_map(|item| item.fetch(field).as_str().map(str::to_string))
      .collect()
  }
}

/// Fetch nested values via dotted paths like `actor.login` or `issue.assignees.0.login`.
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      let next = match cur {
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => cur.get(key),
      };

      match next {
        Some(v) => cur = v,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
