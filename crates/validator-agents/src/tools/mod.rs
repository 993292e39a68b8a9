//! Research tools, one set per validation stage
//!
//! Each tool exposes a typed function the stage agents call directly and a
//! [`Tool`](validator_tools::Tool) implementation so the same step can be
//! listed and invoked by name.

pub mod competitor;
pub mod financial;
pub mod market;
pub mod strategy;
pub mod technical;

pub use competitor::{AnalyzeCompetitorTool, FindCompetitorsTool, MarketGapsTool};
pub use financial::{BreakEvenTool, RevenueProjectionTool, StartupCostsTool};
pub use market::{MarketTrendsTool, SearchMarketDataTool, TamSamSomTool};
pub use strategy::{ActionPlanTool, RecommendationsTool, ValidationScoreTool};
pub use technical::{ComplexityTool, TechStackTool, TimelineTool};

use crate::api::SearchProvider;
use crate::config::ValidatorConfig;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator_tools::ToolRegistry;

/// Year used in search queries
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// How much a stage output is backed by live search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

/// Register every stage tool with `registry`
pub fn register_all(
    registry: &ToolRegistry,
    search: &Arc<dyn SearchProvider>,
    config: &ValidatorConfig,
) {
    registry.register(Arc::new(SearchMarketDataTool::new(Arc::clone(search))));
    registry.register(Arc::new(TamSamSomTool));
    registry.register(Arc::new(MarketTrendsTool::new(Arc::clone(search))));

    registry.register(Arc::new(FindCompetitorsTool::new(Arc::clone(search))));
    registry.register(Arc::new(AnalyzeCompetitorTool::new(Arc::clone(search))));
    registry.register(Arc::new(MarketGapsTool::new(Arc::clone(search))));

    registry.register(Arc::new(ComplexityTool));
    registry.register(Arc::new(TechStackTool));
    registry.register(Arc::new(TimelineTool));

    registry.register(Arc::new(StartupCostsTool));
    registry.register(Arc::new(RevenueProjectionTool::new(config.capture_rate)));
    registry.register(Arc::new(BreakEvenTool));

    registry.register(Arc::new(ValidationScoreTool));
    registry.register(Arc::new(RecommendationsTool));
    registry.register(Arc::new(ActionPlanTool));
}
