//! Tool registry for managing available tools

use crate::Tool;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Registry for managing tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        debug!("Registering tool: {}", tool.name());
        tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned()
    }

    /// List all registered tools, ordered by name
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.values().cloned().collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct UpperTool(&'static str);

    #[async_trait]
    impl Tool for UpperTool {
        async fn execute(&self, params: Value) -> validator_core::Result<Value> {
            let text = params["text"].as_str().unwrap_or_default();
            Ok(json!({ "text": text.to_uppercase() }))
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Uppercases text"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": { "text": { "type": "string" } } })
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(UpperTool("upper")));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("upper").is_some());
        assert!(registry.get("lower").is_none());
    }

    #[test]
    fn test_list_tools_sorted_by_name() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool("zeta")));
        registry.register(Arc::new(UpperTool("alpha")));

        let names: Vec<String> = registry
            .list_tools()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool("upper")));
        registry.register(Arc::new(UpperTool("upper")));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_registered_tool() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool("upper")));

        let tool = registry.get("upper").unwrap();
        let out = tool.execute(json!({ "text": "saas" })).await.unwrap();
        assert_eq!(out["text"], "SAAS");
    }

    #[test]
    fn test_parse_params_rejects_bad_shape() {
        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct Params {
            idea: String,
        }

        let err = crate::parse_params::<Params>(json!({ "idea": 3 })).err().unwrap();
        assert!(err.to_string().contains("Invalid parameters"));
    }
}
