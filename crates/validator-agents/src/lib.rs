//! Startup idea validation agents
//!
//! This crate runs a startup idea through five research stages and turns
//! the results into a GO / PIVOT / NO-GO verdict:
//!
//! - Market sizing (TAM/SAM/SOM) and growth trends from web search snippets
//! - Competitor discovery, profiling and market gap detection
//! - Technical complexity, stack and timeline heuristics
//! - Startup cost, revenue and break-even arithmetic
//! - Weighted scoring, recommendations and an action plan
//!
//! Searches go through the Serper API. Without an API key, or when a search
//! fails, every stage degrades to industry baselines instead of erroring.
//!
//! # Example
//!
//! ```rust,ignore
//! use validator_agents::{StartupValidator, ValidatorConfig, api::search_provider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ValidatorConfig::from_env()?;
//!     let validator = StartupValidator::new(search_provider(&config)?, &config);
//!
//!     let report = validator.validate("AI bookkeeping for dentists", None).await?;
//!     println!("{:?} {}%", report.summary.verdict, report.confidence_score);
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod keywords;
pub mod report;
pub mod tools;

// Re-export main types for convenience
pub use agents::{
    CompetitorResearcherAgent, FinancialAnalystAgent, MarketAnalystAgent, StrategyAdvisorAgent,
    TechnicalArchitectAgent,
};
pub use config::ValidatorConfig;
pub use engine::{ProgressReporter, ReportStatus, StartupValidator, ValidationReport};
pub use error::{Result, ValidatorError};
pub use report::{FormatterFactory, ReportFormat};
pub use tools::strategy::Verdict;
