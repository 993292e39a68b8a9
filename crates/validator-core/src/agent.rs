//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// A single stage of the validation pipeline
///
/// Agents read the idea and whatever earlier stages recorded in the
/// [`Context`], then record their own output under [`Agent::key`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run the stage for `idea`, recording its output into `context`
    async fn process(&self, idea: &str, context: &mut Context) -> Result<()>;

    /// Human readable agent name, used in logs
    fn name(&self) -> &str;

    /// Context key this agent writes its output under
    fn key(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoAgent;

    #[async_trait]
    impl Agent for EchoAgent {
        async fn process(&self, idea: &str, context: &mut Context) -> Result<()> {
            context.insert(self.key(), json!({ "echo": idea, "confidence": 0.5 }));
            Ok(())
        }

        fn name(&self) -> &str {
            "EchoAgent"
        }

        fn key(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_agent_records_output_under_key() {
        let agent = EchoAgent;
        let mut ctx = Context::new("meal kits for students");

        agent.process("meal kits for students", &mut ctx).await.unwrap();

        assert_eq!(ctx.get("echo").unwrap()["echo"], "meal kits for students");
        assert_eq!(ctx.stage_confidence("echo"), Some(0.5));
    }
}
