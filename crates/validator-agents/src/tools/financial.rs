//! Startup cost, revenue and break-even arithmetic

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator_core::Result as CoreResult;
use validator_tools::{Tool, parse_params};

use crate::extract::{first_number, format_usd};
use crate::keywords::matches_any;

/// Market size assumed when the market stage recorded none
pub const DEFAULT_MARKET_SIZE: &str = "$100B";

const BREAK_EVEN_CAP_MONTHS: u32 = 36;
const BURN_SHARE: f64 = 0.3;
const STARTING_REVENUE: f64 = 5000.0;
const MONTHLY_GROWTH: f64 = 1.15;

/// Initial budget by spending category, in whole dollars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupCosts {
    pub development: u64,
    pub marketing: u64,
    pub operations: u64,
    pub legal: u64,
    pub other: u64,
    pub total: u64,
    pub formatted_total: String,
}

impl StartupCosts {
    fn new(development: u64, marketing: u64, operations: u64, legal: u64, other: u64) -> Self {
        let total = development + marketing + operations + legal + other;
        Self {
            development,
            marketing,
            operations,
            legal,
            other,
            total,
            formatted_total: format_usd(total),
        }
    }
}

/// Budget for the kind of product the idea describes
pub fn calculate_startup_costs(idea_type: &str) -> StartupCosts {
    if matches_any(idea_type, &["marketplace", "platform"]) {
        StartupCosts::new(50_000, 20_000, 15_000, 10_000, 5_000)
    } else if matches_any(idea_type, &["app", "mobile"]) {
        StartupCosts::new(30_000, 15_000, 10_000, 5_000, 5_000)
    } else if matches_any(idea_type, &["saas", "software"]) {
        StartupCosts::new(40_000, 25_000, 10_000, 5_000, 5_000)
    } else {
        StartupCosts::new(25_000, 10_000, 8_000, 3_000, 4_000)
    }
}

/// Yearly revenue targets at a fixed share of the market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueProjection {
    pub year_1: u64,
    pub year_2: u64,
    pub year_3: u64,
    pub year_5: u64,
    pub year_1_formatted: String,
    pub year_2_formatted: String,
    pub year_3_formatted: String,
    pub year_5_formatted: String,
}

/// Dollar value of a market size string such as `$15.8B` or `750 million`
///
/// Unscaled figures are read as millions; a string without digits counts
/// as 100 of its unit.
pub fn market_size_value(market_size: &str) -> f64 {
    let lower = market_size.to_lowercase();
    let multiplier = if lower.contains("trillion") {
        1_000_000_000_000.0
    } else if market_size.contains('B') || lower.contains("billion") {
        1_000_000_000.0
    } else {
        1_000_000.0
    };
    first_number(market_size).unwrap_or(100.0) * multiplier
}

/// Project revenue for years 1, 2, 3 and 5
pub fn project_revenue(market_size: &str, capture_rate: f64) -> RevenueProjection {
    let target = market_size_value(market_size) * capture_rate;
    let year = |share: f64| (target * share) as u64;

    let (year_1, year_2, year_3, year_5) = (year(0.1), year(0.3), year(1.0), year(2.5));
    RevenueProjection {
        year_1,
        year_2,
        year_3,
        year_5,
        year_1_formatted: format_usd(year_1),
        year_2_formatted: format_usd(year_2),
        year_3_formatted: format_usd(year_3),
        year_5_formatted: format_usd(year_5),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEven {
    pub months_to_break_even: u32,
    pub break_even_timeline: String,
    /// False when the horizon ran out before profits covered the investment
    pub reached: bool,
    pub initial_investment: String,
    pub monthly_burn: String,
}

/// Months until cumulative profit covers the initial investment
///
/// Burn is 30% of the budget spread over a year; revenue starts at $5,000
/// and compounds 15% a month. The search stops at 36 months.
pub fn calculate_break_even(total_costs: u64) -> BreakEven {
    let investment = total_costs as f64;
    let burn = investment * BURN_SHARE / 12.0;

    let mut revenue = STARTING_REVENUE;
    let mut cumulative = 0.0;
    let mut months = 0;
    let mut reached = false;

    while months < BREAK_EVEN_CAP_MONTHS {
        months += 1;
        cumulative += revenue - burn;
        if cumulative >= investment {
            reached = true;
            break;
        }
        revenue *= MONTHLY_GROWTH;
    }

    BreakEven {
        months_to_break_even: months,
        break_even_timeline: if reached {
            format!("{months} months")
        } else {
            format!("{months}+ months")
        },
        reached,
        initial_investment: format_usd(total_costs),
        monthly_burn: format_usd(burn.round() as u64),
    }
}

// =========== Tools ===========

#[derive(Debug, Deserialize)]
struct CostParams {
    idea_type: String,
}

pub struct StartupCostsTool;

#[async_trait]
impl Tool for StartupCostsTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: CostParams = parse_params(params)?;
        Ok(serde_json::to_value(calculate_startup_costs(&params.idea_type))?)
    }

    fn name(&self) -> &str {
        "calculate_startup_costs"
    }

    fn description(&self) -> &str {
        "Estimate the initial budget by category for a type of startup"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "idea_type": {
                    "type": "string",
                    "description": "Idea or product type (saas, marketplace, app, ...)"
                }
            },
            "required": ["idea_type"]
        })
    }
}

#[derive(Debug, Deserialize)]
struct RevenueParams {
    #[serde(default = "default_market_size")]
    market_size: String,
    capture_rate: Option<f64>,
}

fn default_market_size() -> String {
    DEFAULT_MARKET_SIZE.to_string()
}

pub struct RevenueProjectionTool {
    capture_rate: f64,
}

impl RevenueProjectionTool {
    pub fn new(capture_rate: f64) -> Self {
        Self { capture_rate }
    }
}

#[async_trait]
impl Tool for RevenueProjectionTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: RevenueParams = parse_params(params)?;
        let rate = params.capture_rate.unwrap_or(self.capture_rate);
        Ok(serde_json::to_value(project_revenue(&params.market_size, rate))?)
    }

    fn name(&self) -> &str {
        "project_revenue"
    }

    fn description(&self) -> &str {
        "Project revenue for years 1-5 from a market size and capture rate"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "market_size": { "type": "string", "default": DEFAULT_MARKET_SIZE },
                "capture_rate": { "type": "number", "default": self.capture_rate }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct BreakEvenParams {
    total_costs: u64,
}

pub struct BreakEvenTool;

#[async_trait]
impl Tool for BreakEvenTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: BreakEvenParams = parse_params(params)?;
        Ok(serde_json::to_value(calculate_break_even(params.total_costs))?)
    }

    fn name(&self) -> &str {
        "calculate_break_even"
    }

    fn description(&self) -> &str {
        "Months until cumulative profit covers the initial investment"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "total_costs": { "type": "integer", "minimum": 0 }
            },
            "required": ["total_costs"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_costs_by_type() {
        let costs = calculate_startup_costs("Marketplace for local tutors");
        assert_eq!(costs.total, 100_000);
        assert_eq!(costs.formatted_total, "$100,000");

        assert_eq!(calculate_startup_costs("Mobile app for hikers").total, 65_000);
        assert_eq!(calculate_startup_costs("SaaS for dentists").total, 85_000);
        assert_eq!(calculate_startup_costs("Handmade candle shop").total, 50_000);
        // "happy" must not read as an app
        assert_eq!(calculate_startup_costs("Happy hour finder").total, 50_000);
    }

    #[test]
    fn test_market_size_value() {
        assert_eq!(market_size_value("$100.0B"), 100e9);
        assert_eq!(market_size_value("$750.0M"), 750e6);
        assert_eq!(market_size_value("42"), 42e6);
        assert_eq!(market_size_value("unknown"), 100e6);
    }

    #[test]
    fn test_revenue_projection() {
        let revenue = project_revenue(DEFAULT_MARKET_SIZE, 0.001);
        assert_eq!(revenue.year_1, 10_000_000);
        assert_eq!(revenue.year_3, 100_000_000);
        assert_eq!(revenue.year_5, 250_000_000);
        assert_eq!(revenue.year_2_formatted, "$30,000,000");
    }

    #[test]
    fn test_break_even() {
        let result = calculate_break_even(100_000);
        assert_eq!(result.months_to_break_even, 12);
        assert_eq!(result.break_even_timeline, "12 months");
        assert!(result.reached);
        assert_eq!(result.monthly_burn, "$2,500");
        assert_eq!(result.initial_investment, "$100,000");

        assert_eq!(calculate_break_even(50_000).months_to_break_even, 8);
    }

    #[test]
    fn test_break_even_is_capped() {
        let result = calculate_break_even(10_000_000);
        assert_eq!(result.months_to_break_even, 36);
        assert!(!result.reached);
        assert_eq!(result.break_even_timeline, "36+ months");
    }

    #[tokio::test]
    async fn test_revenue_tool_uses_configured_rate() {
        let tool = RevenueProjectionTool::new(0.002);
        let value = tool.execute(json!({ "market_size": "$1B" })).await.unwrap();
        assert_eq!(value["year_3"], 2_000_000);

        let value = tool
            .execute(json!({ "market_size": "$1B", "capture_rate": 0.001 }))
            .await
            .unwrap();
        assert_eq!(value["year_3"], 1_000_000);
    }
}
