//! Technical feasibility stage

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator_core::context::keys;
use validator_core::{Agent, Context, Result};

use crate::tools::technical::{
    ComplexityAssessment, DevelopmentTimeline, TechStack, assess_complexity, estimate_timeline,
    recommend_tech_stack,
};

const TECHNICAL_CONFIDENCE: f64 = 0.85;

/// Output of the technical stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    pub complexity: ComplexityAssessment,
    pub tech_stack: TechStack,
    pub timeline: DevelopmentTimeline,
    pub confidence: f64,
    pub summary: String,
}

/// Keyword heuristics only, no search
#[derive(Debug, Default)]
pub struct TechnicalArchitectAgent;

impl TechnicalArchitectAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, idea: &str) -> TechnicalAnalysis {
        let complexity = assess_complexity(idea);
        let tech_stack = recommend_tech_stack(idea);
        let timeline = estimate_timeline(complexity.complexity);

        TechnicalAnalysis {
            summary: format!(
                "Technical complexity: {}, MVP timeline: {}",
                complexity.complexity, timeline.mvp
            ),
            complexity,
            tech_stack,
            timeline,
            confidence: TECHNICAL_CONFIDENCE,
        }
    }
}

#[async_trait]
impl Agent for TechnicalArchitectAgent {
    #[instrument(skip(self, context))]
    async fn process(&self, idea: &str, context: &mut Context) -> Result<()> {
        let analysis = self.analyze(idea);
        info!(complexity = %analysis.complexity.complexity, "Technical assessment complete");
        context.insert_typed(self.key(), &analysis)
    }

    fn name(&self) -> &str {
        "TechnicalArchitectAgent"
    }

    fn key(&self) -> &'static str {
        keys::TECHNICAL
    }
}
