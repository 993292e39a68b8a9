//! Market sizing and growth stage

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator_core::context::keys;
use validator_core::{Agent, Context, Result};

use super::LIVE_SEARCH_SOURCE;
use crate::api::SearchProvider;
use crate::tools::market::{
    MarketResearch, MarketSizing, MarketTrends, analyze_market_trends, calculate_tam_sam_som,
    extract_industry, search_market_data,
};

const LIVE_CONFIDENCE: f64 = 0.9;
const BASELINE_CONFIDENCE: f64 = 0.6;

/// Output of the market stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub industry: String,
    pub market_opportunity: MarketSizing,
    pub market_research: MarketResearch,
    pub trends: MarketTrends,
    pub confidence: f64,
    pub data_source: String,
    pub summary: String,
}

impl MarketAnalysis {
    pub fn search_successful(&self) -> bool {
        self.market_research.search_successful
    }
}

/// Searches for market size and growth figures
pub struct MarketAnalystAgent {
    search: Arc<dyn SearchProvider>,
}

impl MarketAnalystAgent {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }

    pub async fn analyze(&self, idea: &str) -> MarketAnalysis {
        let research = search_market_data(self.search.as_ref(), idea).await;
        let industry = extract_industry(idea);
        let sizing = calculate_tam_sam_som(industry, Some(&research));
        let trends = analyze_market_trends(self.search.as_ref(), idea).await;

        let live = research.search_successful;
        let summary = format!(
            "Market TAM: {}, Growth: {}",
            sizing.tam.formatted, trends.average_growth_rate
        );

        MarketAnalysis {
            industry: industry.to_string(),
            market_opportunity: sizing,
            market_research: research,
            trends,
            confidence: if live { LIVE_CONFIDENCE } else { BASELINE_CONFIDENCE },
            data_source: if live {
                LIVE_SEARCH_SOURCE.to_string()
            } else {
                "Industry baselines".to_string()
            },
            summary,
        }
    }
}

#[async_trait]
impl Agent for MarketAnalystAgent {
    #[instrument(skip(self, context))]
    async fn process(&self, idea: &str, context: &mut Context) -> Result<()> {
        let analysis = self.analyze(idea).await;
        info!(
            tam = %analysis.market_opportunity.tam.formatted,
            live = analysis.search_successful(),
            "Market analysis complete"
        );
        context.insert_typed(self.key(), &analysis)
    }

    fn name(&self) -> &str {
        "MarketAnalystAgent"
    }

    fn key(&self) -> &'static str {
        keys::MARKET
    }
}
