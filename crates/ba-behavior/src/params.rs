//! Schema-less behavior configuration.
//!
//! A behavior's config is a JSON object.  Keys are behavior-specific and
//! validated by the body's constructor through the typed getters here:
//! [`require`][BehaviorConfig::require] fails loudly on a missing key,
//! [`optional`][BehaviorConfig::optional] / [`get_or`][BehaviorConfig::get_or]
//! are for fields documented as optional-with-default.  A present key whose
//! value has the wrong shape is always an error, never a silent default.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{BehaviorError, BehaviorResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BehaviorConfig {
    doc: Map<String, Value>,
}

impl BehaviorConfig {
    /// Wrap a JSON value, which must be an object.
    pub fn new(doc: Value) -> BehaviorResult<Self> {
        match doc {
            Value::Object(doc) => Ok(Self { doc }),
            other => Err(BehaviorError::Config(format!(
                "behavior config must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn from_json_str(s: &str) -> BehaviorResult<Self> {
        let value: Value = serde_json::from_str(s).map_err(ba_core::CoreError::from)?;
        Self::new(value)
    }

    /// Raw JSON object.
    #[inline]
    pub fn raw(&self) -> &Map<String, Value> {
        &self.doc
    }

    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.doc.get(key).is_some_and(|v| !v.is_null())
    }

    /// Set `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.doc.insert(key.into(), value);
    }

    /// Deserialize a required key.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> BehaviorResult<T> {
        self.optional(key)?.ok_or_else(|| BehaviorError::MissingKey(key.to_string()))
    }

    /// Deserialize an optional key.  `null` counts as absent.
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> BehaviorResult<Option<T>> {
        match self.doc.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::deserialize(v).map(Some).map_err(|e| BehaviorError::InvalidValue {
                key:    key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Deserialize an optional key, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> BehaviorResult<T> {
        Ok(self.optional(key)?.unwrap_or(default))
    }

    /// Borrow a required string without allocating.
    pub fn require_str(&self, key: &str) -> BehaviorResult<&str> {
        match self.doc.get(key) {
            None | Some(Value::Null) => Err(BehaviorError::MissingKey(key.to_string())),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(BehaviorError::InvalidValue {
                key:    key.to_string(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }
}
