//! Validation report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator_core::Context;
use validator_core::context::keys;

use crate::agents::{
    CompetitorAnalysis, FinancialAnalysis, MarketAnalysis, StrategyAnalysis, TechnicalAnalysis,
};
use crate::error::Result;
use crate::tools::strategy::Verdict;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Completed,
    /// Finished below the stage's minimum confidence
    Degraded,
    Failed,
}

/// How one stage went
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: String,
    pub agent: String,
    pub state: StageState,
    pub confidence: Option<f64>,
    pub min_confidence: f64,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityLabels {
    pub market: String,
    pub competitors: String,
}

/// Headline figures of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub score: Option<f64>,
    pub verdict: Option<Verdict>,
    pub market_size: String,
    pub competitors_found: usize,
    pub technical_complexity: String,
    pub initial_investment: String,
    pub break_even: String,
    pub top_recommendations: Vec<String>,
    pub data_quality: DataQualityLabels,
}

/// Everything a validation run produced, including partial output of a
/// failed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub run_id: Uuid,
    pub idea: String,
    pub timestamp: DateTime<Utc>,
    pub status: ReportStatus,
    pub using_real_data: bool,
    pub execution_time_secs: f64,
    pub confidence_score: u8,
    pub summary: Summary,
    pub stages: Vec<StageOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub market: Option<MarketAnalysis>,
    pub competitors: Option<CompetitorAnalysis>,
    pub technical: Option<TechnicalAnalysis>,
    pub financial: Option<FinancialAnalysis>,
    pub strategy: Option<StrategyAnalysis>,
}

impl ValidationReport {
    /// Assemble a report from the stage outputs recorded in `context`
    pub fn from_context(context: &Context, stages: Vec<StageOutcome>) -> Result<Self> {
        let market: Option<MarketAnalysis> = context.get_typed(keys::MARKET)?;
        let competitors: Option<CompetitorAnalysis> = context.get_typed(keys::COMPETITORS)?;
        let technical: Option<TechnicalAnalysis> = context.get_typed(keys::TECHNICAL)?;
        let financial: Option<FinancialAnalysis> = context.get_typed(keys::FINANCIAL)?;
        let strategy: Option<StrategyAnalysis> = context.get_typed(keys::STRATEGY)?;

        let failed = stages.iter().any(|s| s.state == StageState::Failed);

        let mut report = Self {
            run_id: Uuid::new_v4(),
            idea: context.idea().unwrap_or_default().to_string(),
            timestamp: Utc::now(),
            status: if failed {
                ReportStatus::Failed
            } else {
                ReportStatus::Completed
            },
            using_real_data: false,
            execution_time_secs: 0.0,
            confidence_score: 0,
            summary: Summary {
                score: None,
                verdict: None,
                market_size: UNKNOWN.to_string(),
                competitors_found: 0,
                technical_complexity: UNKNOWN.to_string(),
                initial_investment: UNKNOWN.to_string(),
                break_even: UNKNOWN.to_string(),
                top_recommendations: Vec::new(),
                data_quality: DataQualityLabels {
                    market: "Estimated".to_string(),
                    competitors: "Estimated".to_string(),
                },
            },
            error: stages.iter().find_map(|s| s.error.clone()),
            stages,
            market,
            competitors,
            technical,
            financial,
            strategy,
        };
        report.confidence_score = report.overall_confidence();
        report.summary = report.build_summary();
        Ok(report)
    }

    pub fn with_execution_time(mut self, secs: f64) -> Self {
        self.execution_time_secs = (secs * 100.0).round() / 100.0;
        self
    }

    pub fn with_real_data(mut self, using_real_data: bool) -> Self {
        self.using_real_data = using_real_data;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == ReportStatus::Completed
    }

    /// Average of per-stage confidence, as a whole percentage
    ///
    /// The search stages are rated by what they found rather than by their
    /// own confidence field. Their two slots always count: a run that stopped
    /// before market or competitor research averages in the offline ratings
    /// of 60 and 50. The other stages count only when they produced output.
    pub fn overall_confidence(&self) -> u8 {
        let mut scores = Vec::with_capacity(5);

        scores.push(match &self.market {
            Some(market) if market.search_successful() => 90.0,
            _ => 60.0,
        });
        scores.push(match self.competitors.as_ref().map(|c| c.competitors_found) {
            Some(found) if found >= 3 => 85.0,
            Some(found) if found > 0 => 70.0,
            _ => 50.0,
        });
        scores.extend(self.technical.as_ref().map(|t| t.confidence * 100.0));
        scores.extend(self.financial.as_ref().map(|f| f.confidence * 100.0));
        scores.extend(self.strategy.as_ref().map(|s| s.confidence * 100.0));

        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        average.clamp(0.0, 100.0) as u8
    }

    fn build_summary(&self) -> Summary {
        let market_live = self
            .market
            .as_ref()
            .is_some_and(MarketAnalysis::search_successful);
        let competitors_live = self.competitors.as_ref().is_some_and(|c| c.search_successful);

        Summary {
            score: self.strategy.as_ref().map(|s| s.score),
            verdict: self.strategy.as_ref().map(|s| s.verdict),
            market_size: self.market.as_ref().map_or_else(
                || UNKNOWN.to_string(),
                |m| m.market_opportunity.tam.formatted.clone(),
            ),
            competitors_found: self.competitors.as_ref().map_or(0, |c| c.competitors_found),
            technical_complexity: self
                .technical
                .as_ref()
                .map_or_else(|| UNKNOWN.to_string(), |t| t.complexity.complexity.to_string()),
            initial_investment: self.financial.as_ref().map_or_else(
                || UNKNOWN.to_string(),
                |f| f.startup_costs.formatted_total.clone(),
            ),
            break_even: self.financial.as_ref().map_or_else(
                || UNKNOWN.to_string(),
                |f| f.break_even_analysis.break_even_timeline.clone(),
            ),
            top_recommendations: self
                .strategy
                .as_ref()
                .map(|s| s.recommendations.iter().take(3).cloned().collect())
                .unwrap_or_default(),
            data_quality: DataQualityLabels {
                market: if market_live { "Real Research" } else { "Estimated" }.to_string(),
                competitors: if competitors_live { "Real Search" } else { "Estimated" }.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::TechnicalArchitectAgent;
    use validator_core::Agent;

    fn outcome(stage: &str, state: StageState) -> StageOutcome {
        StageOutcome {
            stage: stage.to_string(),
            agent: "TestAgent".to_string(),
            state,
            confidence: None,
            min_confidence: 0.5,
            elapsed_ms: 1,
            error: (state == StageState::Failed).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn test_empty_context_report() {
        let ctx = Context::new("Rental marketplace for camping gear");
        let report = ValidationReport::from_context(&ctx, vec![]).unwrap();

        assert!(report.is_completed());
        assert_eq!(report.summary.market_size, "Unknown");
        assert_eq!(report.summary.verdict, None);
        // market 60 and competitors 50 only
        assert_eq!(report.confidence_score, 55);
        assert_eq!(report.summary.data_quality.market, "Estimated");
    }

    #[tokio::test]
    async fn test_partial_report_after_failure() {
        let idea = "Simple website builder for bakeries";
        let mut ctx = Context::new(idea);
        TechnicalArchitectAgent::new()
            .process(idea, &mut ctx)
            .await
            .unwrap();

        let stages = vec![
            outcome(keys::TECHNICAL, StageState::Completed),
            outcome(keys::FINANCIAL, StageState::Failed),
        ];
        let report = ValidationReport::from_context(&ctx, stages)
            .unwrap()
            .with_execution_time(1.23456);

        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.error.as_deref(), Some("boom"));
        assert_eq!(report.summary.technical_complexity, "low");
        assert_eq!(report.execution_time_secs, 1.23);
        // (60 + 50 + 85) / 3
        assert_eq!(report.confidence_score, 65);
    }
}
