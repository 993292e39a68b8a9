//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;
use validator_core::{Error, Result};

/// A research step that stages, and the CLI, can execute by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// // Schema for a tool taking a single idea string:
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "idea": { "type": "string" }
    ///     },
    ///     "required": ["idea"]
    /// });
    /// ```
    fn input_schema(&self) -> Value;
}

/// Deserialize tool parameters, mapping failures to a processing error
pub fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| Error::ProcessingFailed(format!("Invalid parameters: {e}")))
}
