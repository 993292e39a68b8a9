//! The five validation stage agents
//!
//! Each agent runs its stage's tools in a fixed order and records a typed
//! analysis, carrying a `confidence` field, under its context key.

pub mod competitor_researcher;
pub mod financial_analyst;
pub mod market_analyst;
pub mod strategy_advisor;
pub mod technical_architect;

pub use competitor_researcher::{CompetitorAnalysis, CompetitorResearcherAgent};
pub use financial_analyst::{FinancialAnalysis, FinancialAnalystAgent};
pub use market_analyst::{MarketAnalysis, MarketAnalystAgent};
pub use strategy_advisor::{StrategyAdvisorAgent, StrategyAnalysis};
pub use technical_architect::{TechnicalAnalysis, TechnicalArchitectAgent};

/// Data source label for stages backed by live search
pub const LIVE_SEARCH_SOURCE: &str = "Real web search via Serper API";
