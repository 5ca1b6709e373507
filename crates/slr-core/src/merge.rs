//! Structural merge of a loaded document onto current defaults.
//!
//! Used both when reading the persisted document and when importing one. A
//! document written by an older schema lacks newer nested fields; merging it
//! onto the serialised defaults fills those in before the typed decode.
//!
//! Objects merge key by key, recursively. Everything else, arrays included,
//! replaces the target value wholesale: collections are always taken verbatim
//! from the source.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Merge `source` into `target` in place.
///
/// For every key of a source object: an object value is merged recursively
/// (a non-object target value is first replaced by `{}`), any other value
/// overwrites. A non-object `source` replaces `target` outright.
pub fn deep_merge(target: &mut Value, source: Value) {
  let source = match source {
    Value::Object(map) => map,
    other => {
      *target = other;
      return;
    }
  };
  if !target.is_object() {
    *target = Value::Object(Map::new());
  }
  let Value::Object(target) = target else {
    return;
  };
  for (key, value) in source {
    match value {
      Value::Object(_) => {
        let slot = target
          .entry(key)
          .or_insert_with(|| Value::Object(Map::new()));
        deep_merge(slot, value);
      }
      other => {
        target.insert(key, other);
      }
    }
  }
}

/// Merge `source` onto the serialised `T::default()` and decode the result.
///
/// `source` must be a JSON object; anything else is rejected rather than
/// replacing the defaults.
pub fn merge_onto_defaults<T>(source: Value) -> Result<T>
where
  T: Default + Serialize + DeserializeOwned,
{
  if !source.is_object() {
    return Err(Error::InvalidDocument(format!(
      "expected a JSON object at the top level, found {}",
      json_kind(&source)
    )));
  }
  let mut merged = serde_json::to_value(T::default())?;
  deep_merge(&mut merged, source);
  Ok(serde_json::from_value(merged)?)
}

fn json_kind(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;
  use crate::document::ReviewDocument;

  fn merged(target: Value, source: Value) -> Value {
    let mut t = target;
    deep_merge(&mut t, source);
    t
  }

  #[test]
  fn nested_objects_merge_key_by_key() {
    let out = merged(
      json!({ "pico": { "population": "", "outcome": "" } }),
      json!({ "pico": { "population": "adults" } }),
    );
    assert_eq!(out, json!({ "pico": { "population": "adults", "outcome": "" } }));
  }

  #[test]
  fn arrays_replace_wholesale() {
    let out = merged(
      json!({ "terms": ["a", "b", "c"] }),
      json!({ "terms": ["z"] }),
    );
    assert_eq!(out, json!({ "terms": ["z"] }));
  }

  #[test]
  fn object_replaces_scalar_target() {
    let out = merged(json!({ "meta": 3 }), json!({ "meta": { "title": "x" } }));
    assert_eq!(out, json!({ "meta": { "title": "x" } }));
  }

  #[test]
  fn null_overwrites() {
    let out = merged(json!({ "a": { "b": 1 } }), json!({ "a": null }));
    assert_eq!(out, json!({ "a": null }));
  }

  #[test]
  fn unknown_keys_are_carried() {
    let out = merged(json!({ "a": 1 }), json!({ "b": 2 }));
    assert_eq!(out, json!({ "a": 1, "b": 2 }));
  }

  #[test]
  fn merge_is_idempotent() {
    let defaults = serde_json::to_value(ReviewDocument::default()).unwrap();
    let x = json!({
      "meta": { "title": "Review" },
      "planning": { "pico": { "outcome": "accuracy" }, "keywords": [] },
      "extra": { "nested": [1, 2, 3] },
    });
    let once = merged(defaults.clone(), x);
    let twice = merged(defaults.clone(), once.clone());
    assert_eq!(once, twice);
    assert_eq!(merged(once.clone(), once.clone()), once);
  }

  #[test]
  fn older_document_gains_new_nested_defaults() {
    let old = json!({
      "meta": { "title": "Old review", "createdAt": null, "updatedAt": null },
      "planning": { "questions": [], "keywords": [], "sources": [] },
      "studies": [],
    });
    let doc: ReviewDocument = merge_onto_defaults(old).unwrap();
    assert_eq!(doc.meta.title, "Old review");
    assert_eq!(doc.planning.pico, Default::default());
    assert!(doc.planning.criteria.inclusion.is_empty());
    assert!(doc.conducting.searches.is_empty());
  }

  #[test]
  fn non_object_source_is_rejected() {
    let err = merge_onto_defaults::<ReviewDocument>(json!([1, 2])).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument(_)));
  }
}
