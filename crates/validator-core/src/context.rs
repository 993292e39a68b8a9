//! Validation record shared by the pipeline stages
//!
//! The `Context` is the key/value record every stage accumulates into. It
//! holds the idea text and one JSON value per completed stage; typed
//! accessors serialize stage outputs in and out of it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known context keys, one per pipeline stage
pub mod keys {
    /// The idea being validated
    pub const IDEA: &str = "idea";
    /// Market analysis output
    pub const MARKET: &str = "market";
    /// Competitor analysis output
    pub const COMPETITORS: &str = "competitors";
    /// Technical assessment output
    pub const TECHNICAL: &str = "technical";
    /// Financial projections output
    pub const FINANCIAL: &str = "financial";
    /// Strategy synthesis output
    pub const STRATEGY: &str = "strategy";

    /// Stage keys in pipeline order
    pub const STAGES: [&str; 5] = [MARKET, COMPETITORS, TECHNICAL, FINANCIAL, STRATEGY];
}

/// Record accumulated by the validation stages
///
/// # Example
///
/// ```
/// use validator_core::Context;
/// use validator_core::context::keys;
///
/// let mut ctx = Context::new("AI tutoring marketplace");
/// ctx.insert(keys::TECHNICAL, serde_json::json!({ "confidence": 0.85 }));
///
/// assert_eq!(ctx.idea(), Some("AI tutoring marketplace"));
/// assert_eq!(ctx.stage_confidence(keys::TECHNICAL), Some(0.85));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    data: BTreeMap<String, serde_json::Value>,
}

impl Context {
    /// Create a record for `idea`
    pub fn new(idea: impl Into<String>) -> Self {
        let mut ctx = Self::default();
        ctx.insert(keys::IDEA, serde_json::json!(idea.into()));
        ctx
    }

    /// The idea text
    pub fn idea(&self) -> Option<&str> {
        self.get(keys::IDEA).and_then(|v| v.as_str())
    }

    // =========== Stage helpers ===========

    /// The `confidence` field of a stage output, if the stage recorded one
    pub fn stage_confidence(&self, key: &str) -> Option<f64> {
        self.get(key)
            .and_then(|v| v.get("confidence"))
            .and_then(serde_json::Value::as_f64)
    }

    /// Stage keys that have output recorded, in pipeline order
    pub fn completed_stages(&self) -> Vec<&'static str> {
        keys::STAGES
            .into_iter()
            .filter(|key| self.contains_key(key))
            .collect()
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    ///
    /// Serializes the value to JSON before storing.
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    ///
    /// Deserializes the JSON value into the specified type.
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value '{key}': {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Get a typed value that an earlier stage must have recorded
    pub fn require_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<T> {
        self.get_typed(key)?
            .ok_or_else(|| crate::Error::MissingStage(key.to_string()))
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the whole record as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
