//! Financial projection stage

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator_core::context::keys;
use validator_core::{Agent, Context, Result};

use super::MarketAnalysis;
use crate::tools::financial::{
    BreakEven, DEFAULT_MARKET_SIZE, RevenueProjection, StartupCosts, calculate_break_even,
    calculate_startup_costs, project_revenue,
};

const FINANCIAL_CONFIDENCE: f64 = 0.75;

/// Output of the financial stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub startup_costs: StartupCosts,
    pub market_size_used: String,
    pub revenue_projections: RevenueProjection,
    pub break_even_analysis: BreakEven,
    pub confidence: f64,
    pub summary: String,
}

/// Projects costs and revenue, sized by the market stage's TAM when present
pub struct FinancialAnalystAgent {
    capture_rate: f64,
}

impl FinancialAnalystAgent {
    pub fn new(capture_rate: f64) -> Self {
        Self { capture_rate }
    }

    pub fn analyze(&self, idea: &str, market_size: Option<&str>) -> FinancialAnalysis {
        let costs = calculate_startup_costs(idea);
        let market_size = market_size.unwrap_or(DEFAULT_MARKET_SIZE);
        let revenue = project_revenue(market_size, self.capture_rate);
        let break_even = calculate_break_even(costs.total);

        FinancialAnalysis {
            summary: format!(
                "Initial investment: {}, Break-even: {}",
                costs.formatted_total, break_even.break_even_timeline
            ),
            startup_costs: costs,
            market_size_used: market_size.to_string(),
            revenue_projections: revenue,
            break_even_analysis: break_even,
            confidence: FINANCIAL_CONFIDENCE,
        }
    }
}

#[async_trait]
impl Agent for FinancialAnalystAgent {
    #[instrument(skip(self, context))]
    async fn process(&self, idea: &str, context: &mut Context) -> Result<()> {
        let market: Option<MarketAnalysis> = context.get_typed(keys::MARKET)?;
        let tam = market.map(|m| m.market_opportunity.tam.formatted);
        if tam.is_none() {
            debug!("No market stage output, assuming {}", DEFAULT_MARKET_SIZE);
        }

        let analysis = self.analyze(idea, tam.as_deref());
        info!(
            investment = %analysis.startup_costs.formatted_total,
            break_even = %analysis.break_even_analysis.break_even_timeline,
            "Financial analysis complete"
        );
        context.insert_typed(self.key(), &analysis)
    }

    fn name(&self) -> &str {
        "FinancialAnalystAgent"
    }

    fn key(&self) -> &'static str {
        keys::FINANCIAL
    }
}
