//! Score aggregation and verdict stage

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator_core::context::keys;
use validator_core::{Agent, Context, Result};

use super::{CompetitorAnalysis, FinancialAnalysis, MarketAnalysis, TechnicalAnalysis};
use crate::tools::strategy::{
    ActionPlan, ComponentScores, ScoreInputs, Verdict, calculate_validation_score,
    create_action_plan, generate_recommendations,
};

/// Output of the strategy stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAnalysis {
    pub score: f64,
    pub verdict: Verdict,
    pub component_scores: ComponentScores,
    pub recommendations: Vec<String>,
    pub action_plan: ActionPlan,
    pub key_success_factors: Vec<String>,
    pub confidence: f64,
    pub summary: String,
}

/// Collect the scoring figures from whatever earlier stages recorded
pub fn score_inputs(context: &Context) -> Result<ScoreInputs> {
    let market: Option<MarketAnalysis> = context.get_typed(keys::MARKET)?;
    let competitors: Option<CompetitorAnalysis> = context.get_typed(keys::COMPETITORS)?;
    let technical: Option<TechnicalAnalysis> = context.get_typed(keys::TECHNICAL)?;
    let financial: Option<FinancialAnalysis> = context.get_typed(keys::FINANCIAL)?;

    Ok(ScoreInputs {
        tam: market.as_ref().map(|m| m.market_opportunity.tam.value),
        competitors_found: competitors.map(|c| c.competitors_found),
        complexity: technical.map(|t| t.complexity.complexity),
        break_even_months: financial.map(|f| f.break_even_analysis.months_to_break_even),
        growth_rate: market.map(|m| m.trends.average_growth),
    })
}

/// Combines every earlier stage into a score, verdict and plan
#[derive(Debug, Default)]
pub struct StrategyAdvisorAgent;

impl StrategyAdvisorAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(&self, inputs: &ScoreInputs) -> StrategyAnalysis {
        let score = calculate_validation_score(inputs);
        let recommendations = generate_recommendations(score.overall_score);
        let verdict = recommendations.verdict;

        StrategyAnalysis {
            score: score.overall_score,
            verdict,
            component_scores: score.component_scores,
            recommendations: recommendations.recommendations,
            action_plan: create_action_plan(verdict),
            key_success_factors: recommendations.key_success_factors,
            confidence: score.confidence,
            summary: format!(
                "Validation Score: {}/10 - {} {}",
                score.overall_score,
                verdict,
                verdict.emoji()
            ),
        }
    }
}

#[async_trait]
impl Agent for StrategyAdvisorAgent {
    #[instrument(skip(self, context))]
    async fn process(&self, _idea: &str, context: &mut Context) -> Result<()> {
        let inputs = score_inputs(context)?;
        let analysis = self.synthesize(&inputs);
        info!(score = analysis.score, verdict = %analysis.verdict, "Strategy synthesis complete");
        context.insert_typed(self.key(), &analysis)
    }

    fn name(&self) -> &str {
        "StrategyAdvisorAgent"
    }

    fn key(&self) -> &'static str {
        keys::STRATEGY
    }
}
