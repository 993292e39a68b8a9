//! Competitor landscape stage

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator_core::context::keys;
use validator_core::{Agent, Context, Result};

use super::LIVE_SEARCH_SOURCE;
use crate::api::SearchProvider;
use crate::tools::competitor::{
    Competitor, CompetitorProfile, MarketGaps, analyze_competitor, find_competitors,
    identify_market_gaps,
};

const DETAILED_ANALYSES: usize = 3;
const LIVE_CONFIDENCE: f64 = 0.85;
const LIMITED_CONFIDENCE: f64 = 0.65;

/// Output of the competitor stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAnalysis {
    pub competitors_found: usize,
    pub competitor_list: Vec<Competitor>,
    pub detailed_analysis: Vec<CompetitorProfile>,
    pub market_gaps: MarketGaps,
    pub search_successful: bool,
    pub confidence: f64,
    pub data_source: String,
    pub summary: String,
}

/// Finds competitors, profiles the top few and looks for gaps they leave
pub struct CompetitorResearcherAgent {
    search: Arc<dyn SearchProvider>,
}

impl CompetitorResearcherAgent {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }

    pub async fn analyze(&self, idea: &str) -> CompetitorAnalysis {
        let found = find_competitors(self.search.as_ref(), idea).await;

        let mut detailed = Vec::new();
        for competitor in found.competitors.iter().take(DETAILED_ANALYSES) {
            detailed.push(analyze_competitor(self.search.as_ref(), &competitor.name).await);
        }

        let gaps = identify_market_gaps(self.search.as_ref(), &found.names()).await;

        let live = found.search_successful;
        let confidence = if live && detailed.len() >= 2 {
            LIVE_CONFIDENCE
        } else {
            LIMITED_CONFIDENCE
        };

        CompetitorAnalysis {
            competitors_found: found.count,
            summary: format!(
                "Found {} real competitors. Key gaps identified in market.",
                found.count
            ),
            competitor_list: found.competitors,
            detailed_analysis: detailed,
            market_gaps: gaps,
            search_successful: live,
            confidence,
            data_source: if live {
                LIVE_SEARCH_SOURCE.to_string()
            } else {
                "Limited data".to_string()
            },
        }
    }
}

#[async_trait]
impl Agent for CompetitorResearcherAgent {
    #[instrument(skip(self, context))]
    async fn process(&self, idea: &str, context: &mut Context) -> Result<()> {
        let analysis = self.analyze(idea).await;
        info!(
            found = analysis.competitors_found,
            profiled = analysis.detailed_analysis.len(),
            "Competitor research complete"
        );
        context.insert_typed(self.key(), &analysis)
    }

    fn name(&self) -> &str {
        "CompetitorResearcherAgent"
    }

    fn key(&self) -> &'static str {
        keys::COMPETITORS
    }
}
