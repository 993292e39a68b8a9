//! Market sizing and trend tools

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use validator_core::Result as CoreResult;
use validator_tools::{Tool, parse_params};

use super::{DataQuality, current_year};
use crate::api::SearchProvider;
use crate::extract::{
    extract_money_mentions, extract_percentages, format_market_value, parse_market_size,
    parse_money_token, truncate_chars,
};
use crate::keywords::{first_match, matches_keyword};

const MARKET_RESULTS: usize = 10;
const TREND_RESULTS: usize = 5;
const SCANNED_RESULTS: usize = 5;
const MAX_INSIGHTS: usize = 5;
const INSIGHT_CHARS: usize = 200;

const SAM_SHARE: f64 = 0.15;
const SOM_SHARE: f64 = 0.05;
const DEFAULT_GROWTH: f64 = 15.0;

/// Industry keywords, checked in order against the idea
const INDUSTRIES: &[&str] = &[
    "fintech",
    "healthtech",
    "edtech",
    "ecommerce",
    "saas",
    "ai",
    "meal",
    "food",
    "app",
    "nutrition",
    "diabetes",
    "sustainability",
    "fashion",
    "travel",
    "gaming",
    "social",
    "marketplace",
];

/// Baseline TAM in billions of dollars when search finds no figure
const INDUSTRY_BASELINES: &[(&str, f64)] = &[
    ("ai", 200.0),
    ("fintech", 380.0),
    ("healthtech", 450.0),
    ("edtech", 300.0),
    ("ecommerce", 5000.0),
    ("saas", 195.0),
    ("meal", 100.0),
    ("food", 2000.0),
    ("sustainability", 250.0),
    ("nutrition", 15.8),
    ("diabetes", 450.0),
];
const DEFAULT_BASELINE: f64 = 100.0;

const TREND_KEYWORDS: &[&str] = &[
    "growing",
    "declining",
    "stable",
    "emerging",
    "mature",
    "explosive",
];

/// Industry label for an idea, `general` when no keyword matches
pub fn extract_industry(idea: &str) -> &'static str {
    first_match(idea, INDUSTRIES).unwrap_or("general")
}

/// Baseline TAM in dollars for an industry label
pub fn industry_baseline(industry: &str) -> f64 {
    INDUSTRY_BASELINES
        .iter()
        .find(|(key, _)| matches_keyword(industry, key))
        .map_or(DEFAULT_BASELINE, |(_, billions)| *billions)
        * 1_000_000_000.0
}

// =========== Market research ===========

/// A snippet that looked like market sizing data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsight {
    pub insight: String,
    #[serde(default)]
    pub numbers: Vec<String>,
    pub source: String,
}

/// Output of the market data search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketResearch {
    #[serde(default)]
    pub market_insights: Vec<MarketInsight>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub search_successful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Search for market size statistics about `query`
///
/// Search failures are reported inside the result rather than as an error,
/// so later steps can fall back to baselines.
pub async fn search_market_data(search: &dyn SearchProvider, query: &str) -> MarketResearch {
    let search_query = format!(
        "{query} market size statistics {} TAM growth rate billion",
        current_year()
    );

    let response = match search.search(&search_query, MARKET_RESULTS).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Market search failed: {}", e);
            return MarketResearch {
                error: Some(format!("Search error: {e}")),
                ..MarketResearch::default()
            };
        }
    };

    let mut insights = Vec::new();
    let mut sources = Vec::new();

    for result in response.organic.iter().take(SCANNED_RESULTS) {
        let numbers = extract_money_mentions(&result.snippet);
        if numbers.is_empty() && !result.snippet.to_lowercase().contains("market") {
            continue;
        }
        insights.push(MarketInsight {
            insight: truncate_chars(&result.snippet, INSIGHT_CHARS),
            numbers: numbers.into_iter().take(3).collect(),
            source: result.title.clone(),
        });
        sources.push(result.link.clone());
    }

    if let Some(answer) = response
        .answer_box
        .as_ref()
        .and_then(|answer_box| answer_box.answer.as_deref())
        .filter(|answer| !answer.is_empty())
    {
        insights.insert(
            0,
            MarketInsight {
                insight: answer.to_string(),
                numbers: extract_money_mentions(answer),
                source: "Featured snippet".to_string(),
            },
        );
    }

    insights.truncate(MAX_INSIGHTS);
    sources.truncate(MAX_INSIGHTS);
    debug!(insights = insights.len(), "Market research collected");

    MarketResearch {
        market_insights: insights,
        sources,
        search_successful: true,
        error: None,
    }
}

// =========== TAM / SAM / SOM ===========

/// A dollar amount with its display form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketValue {
    pub value: f64,
    pub formatted: String,
}

impl MarketValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            formatted: format_market_value(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingSource {
    RealSearch,
    IndustryBaseline,
}

/// Market sizing derived from one TAM figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct MarketSizing {
    pub tam: MarketValue,
    pub sam: MarketValue,
    pub som: MarketValue,
    #[serde(rename = "data_source")]
    pub data_source: SizingSource,
}

fn tam_from_research(research: &MarketResearch) -> Option<f64> {
    research.market_insights.iter().find_map(|insight| {
        parse_market_size(&insight.insight)
            .or_else(|| insight.numbers.iter().find_map(|n| parse_money_token(n)))
    })
}

/// Size the market from research results, or from the industry baseline
pub fn calculate_tam_sam_som(industry: &str, research: Option<&MarketResearch>) -> MarketSizing {
    let found = research.and_then(tam_from_research);
    let (tam, data_source) = match found {
        Some(tam) => (tam, SizingSource::RealSearch),
        None => (industry_baseline(industry), SizingSource::IndustryBaseline),
    };

    let sam = tam * SAM_SHARE;
    let som = sam * SOM_SHARE;

    MarketSizing {
        tam: MarketValue::new(tam),
        sam: MarketValue::new(sam),
        som: MarketValue::new(som),
        data_source,
    }
}

// =========== Trends ===========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPhase {
    #[serde(rename = "Explosive Growth")]
    ExplosiveGrowth,
    #[serde(rename = "High Growth")]
    HighGrowth,
    Growth,
    #[serde(rename = "Moderate Growth")]
    ModerateGrowth,
    Mature,
}

impl MarketPhase {
    pub fn from_growth(rate: f64) -> Self {
        if rate > 25.0 {
            Self::ExplosiveGrowth
        } else if rate > 15.0 {
            Self::HighGrowth
        } else if rate > 10.0 {
            Self::Growth
        } else if rate > 5.0 {
            Self::ModerateGrowth
        } else {
            Self::Mature
        }
    }
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExplosiveGrowth => "Explosive Growth",
            Self::HighGrowth => "High Growth",
            Self::Growth => "Growth",
            Self::ModerateGrowth => "Moderate Growth",
            Self::Mature => "Mature",
        };
        f.write_str(label)
    }
}

/// Growth and trend signals for a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrends {
    pub average_growth: f64,
    pub average_growth_rate: String,
    pub growth_rates_found: Vec<String>,
    pub market_phase: MarketPhase,
    pub trend_indicators: Vec<String>,
    pub data_quality: DataQuality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarketTrends {
    fn from_rates(rates: &[f64], indicators: Vec<String>, error: Option<String>) -> Self {
        let average = if rates.is_empty() {
            DEFAULT_GROWTH
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        };

        Self {
            average_growth: average,
            average_growth_rate: format!("{average:.1}%"),
            growth_rates_found: rates.iter().take(3).map(|r| format!("{r:.1}%")).collect(),
            market_phase: MarketPhase::from_growth(average),
            trend_indicators: indicators,
            data_quality: if rates.len() >= 3 {
                DataQuality::High
            } else {
                DataQuality::Medium
            },
            error,
        }
    }
}

/// Search for growth rates and trend words about `market`
pub async fn analyze_market_trends(search: &dyn SearchProvider, market: &str) -> MarketTrends {
    let year = current_year();
    let query = format!(
        "{market} market growth rate trends {year} {} forecast CAGR percentage",
        year + 1
    );

    let response = match search.search(&query, TREND_RESULTS).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Trend search failed: {}", e);
            return MarketTrends::from_rates(&[], Vec::new(), Some(format!("Trend search error: {e}")));
        }
    };

    let mut rates = Vec::new();
    let mut indicators: Vec<String> = Vec::new();

    for result in &response.organic {
        rates.extend(extract_percentages(&result.snippet));

        let snippet = result.snippet.to_lowercase();
        if let Some(keyword) = TREND_KEYWORDS.iter().find(|k| snippet.contains(*k)) {
            if !indicators.iter().any(|seen| seen == keyword) {
                indicators.push((*keyword).to_string());
            }
        }
    }
    indicators.truncate(3);

    MarketTrends::from_rates(&rates, indicators, None)
}

// =========== Tools ===========

#[derive(Debug, Deserialize)]
struct QueryParams {
    query: String,
}

/// Tool wrapper for [`search_market_data`]
pub struct SearchMarketDataTool {
    search: Arc<dyn SearchProvider>,
}

impl SearchMarketDataTool {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for SearchMarketDataTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: QueryParams = parse_params(params)?;
        let research = search_market_data(self.search.as_ref(), &params.query).await;
        Ok(serde_json::to_value(research)?)
    }

    fn name(&self) -> &str {
        "search_market_data"
    }

    fn description(&self) -> &str {
        "Search the web for market size statistics and return snippets with dollar figures"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Startup idea or market to research"
                }
            },
            "required": ["query"]
        })
    }
}

#[derive(Debug, Deserialize)]
struct SizingParams {
    industry: String,
    #[serde(default)]
    market_data: Option<MarketResearch>,
}

/// Tool wrapper for [`calculate_tam_sam_som`]
pub struct TamSamSomTool;

#[async_trait]
impl Tool for TamSamSomTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: SizingParams = parse_params(params)?;
        let sizing = calculate_tam_sam_som(&params.industry, params.market_data.as_ref());
        Ok(serde_json::to_value(sizing)?)
    }

    fn name(&self) -> &str {
        "calculate_tam_sam_som"
    }

    fn description(&self) -> &str {
        "Estimate TAM, SAM and SOM from market research or an industry baseline"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "industry": { "type": "string" },
                "market_data": {
                    "type": "object",
                    "description": "Output of search_market_data"
                }
            },
            "required": ["industry"]
        })
    }
}

#[derive(Debug, Deserialize)]
struct MarketParams {
    market: String,
}

/// Tool wrapper for [`analyze_market_trends`]
pub struct MarketTrendsTool {
    search: Arc<dyn SearchProvider>,
}

impl MarketTrendsTool {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for MarketTrendsTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: MarketParams = parse_params(params)?;
        let trends = analyze_market_trends(self.search.as_ref(), &params.market).await;
        Ok(serde_json::to_value(trends)?)
    }

    fn name(&self) -> &str {
        "analyze_market_trends"
    }

    fn description(&self) -> &str {
        "Search for growth rates and classify the market phase"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "market": { "type": "string" }
            },
            "required": ["market"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{StaticSearch, hit};
    use crate::api::{AnswerBox, SearchResponse};

    fn research_with(insight: &str, numbers: &[&str]) -> MarketResearch {
        MarketResearch {
            market_insights: vec![MarketInsight {
                insight: insight.to_string(),
                numbers: numbers.iter().map(ToString::to_string).collect(),
                source: "Report".to_string(),
            }],
            sources: vec![],
            search_successful: true,
            error: None,
        }
    }

    #[test]
    fn test_extract_industry() {
        assert_eq!(extract_industry("A fintech app for freelancers"), "fintech");
        assert_eq!(extract_industry("AI meal planning for diabetics"), "ai");
        assert_eq!(extract_industry("Marketplace for vintage furniture"), "marketplace");
        assert_eq!(extract_industry("Email newsletter for plumbers"), "general");
    }

    #[test]
    fn test_industry_baseline() {
        assert_eq!(industry_baseline("nutrition"), 15.8e9);
        assert_eq!(industry_baseline("sustainability"), 250e9);
        assert_eq!(industry_baseline("general"), 100e9);
    }

    #[test]
    fn test_tam_from_insight_text() {
        let research = research_with("The market was valued at USD 15.79 billion in 2023", &[]);
        let sizing = calculate_tam_sam_som("food", Some(&research));

        assert_eq!(sizing.data_source, SizingSource::RealSearch);
        assert_eq!(sizing.tam.formatted, "$15.8B");
        assert!((sizing.sam.value - 15.79e9 * 0.15).abs() < 1.0);
        assert!((sizing.som.value - 15.79e9 * 0.15 * 0.05).abs() < 1.0);
    }

    #[test]
    fn test_tam_from_extracted_numbers() {
        let research = research_with("Sizable opportunity ahead", &["$850M"]);
        let sizing = calculate_tam_sam_som("general", Some(&research));
        assert_eq!(sizing.tam.value, 850e6);
        assert_eq!(sizing.tam.formatted, "$850.0M");
    }

    #[test]
    fn test_tam_falls_back_to_baseline() {
        let sizing = calculate_tam_sam_som("fintech", None);
        assert_eq!(sizing.data_source, SizingSource::IndustryBaseline);
        assert_eq!(sizing.tam.formatted, "$380.0B");
        assert_eq!(sizing.sam.formatted, "$57.0B");
        assert!((sizing.som.value - 2.85e9).abs() < 1.0);

        let sizing = calculate_tam_sam_som("general", Some(&MarketResearch::default()));
        assert_eq!(sizing.tam.formatted, "$100.0B");
        assert_eq!(sizing.som.formatted, "$750.0M");
    }

    #[test]
    fn test_sizing_serializes_with_uppercase_keys() {
        let value = serde_json::to_value(calculate_tam_sam_som("saas", None)).unwrap();
        assert_eq!(value["TAM"]["formatted"], "$195.0B");
        assert_eq!(value["data_source"], "industry_baseline");
    }

    #[tokio::test]
    async fn test_search_market_data_collects_insights() {
        let search = StaticSearch::new().route_response(
            "market size statistics",
            SearchResponse {
                organic: vec![
                    hit("Meal kit report", "The meal kit market reached $19.9 billion", "https://a.com"),
                    hit("Unrelated", "Recipes for busy weeknights", "https://b.com"),
                    hit("Growth", "Valued at USD 4.2 B with strong demand", "https://c.com"),
                ],
                answer_box: Some(AnswerBox {
                    answer: Some("$20.5B in 2024".to_string()),
                    snippet: None,
                }),
            },
        );

        let research = search_market_data(&search, "meal kits").await;

        assert!(research.search_successful);
        assert_eq!(research.market_insights.len(), 3);
        assert_eq!(research.market_insights[0].source, "Featured snippet");
        assert_eq!(research.market_insights[1].numbers, vec!["$19.9 billion"]);
        assert_eq!(research.sources, vec!["https://a.com", "https://c.com"]);
        assert!(search.queries()[0].starts_with("meal kits market size statistics"));
    }

    #[tokio::test]
    async fn test_search_market_data_reports_failure() {
        let research = search_market_data(&StaticSearch::unavailable(), "meal kits").await;
        assert!(!research.search_successful);
        assert!(research.market_insights.is_empty());
        assert!(research.error.is_some());
    }

    #[tokio::test]
    async fn test_market_trends() {
        let search = StaticSearch::new().route(
            "forecast CAGR",
            vec![
                hit("a", "A growing market with a CAGR of 12.5% and 100% adoption", ""),
                hit("b", "Emerging segment expanding 20% yearly, growing fast", ""),
                hit("c", "Analysts expect 30.5% growth; the sector is growing", ""),
            ],
        );

        let trends = analyze_market_trends(&search, "meal kits").await;

        assert_eq!(trends.growth_rates_found, vec!["12.5%", "20.0%", "30.5%"]);
        assert_eq!(trends.average_growth_rate, "21.0%");
        assert_eq!(trends.market_phase, MarketPhase::HighGrowth);
        assert_eq!(trends.trend_indicators, vec!["growing"]);
        assert_eq!(trends.data_quality, DataQuality::High);
    }

    #[tokio::test]
    async fn test_market_trends_defaults_without_rates() {
        let trends = analyze_market_trends(&StaticSearch::new(), "meal kits").await;
        assert_eq!(trends.average_growth, 15.0);
        assert_eq!(trends.market_phase, MarketPhase::Growth);
        assert_eq!(trends.data_quality, DataQuality::Medium);
        assert!(trends.error.is_none());
    }

    #[test]
    fn test_market_phase_thresholds() {
        assert_eq!(MarketPhase::from_growth(25.1), MarketPhase::ExplosiveGrowth);
        assert_eq!(MarketPhase::from_growth(25.0), MarketPhase::HighGrowth);
        assert_eq!(MarketPhase::from_growth(10.5), MarketPhase::Growth);
        assert_eq!(MarketPhase::from_growth(6.0), MarketPhase::ModerateGrowth);
        assert_eq!(MarketPhase::from_growth(5.0), MarketPhase::Mature);
        assert_eq!(MarketPhase::HighGrowth.to_string(), "High Growth");
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let tool = TamSamSomTool;
        let value = tool.execute(json!({ "industry": "edtech" })).await.unwrap();
        assert_eq!(value["TAM"]["formatted"], "$300.0B");

        assert!(tool.execute(json!({ "wrong": 1 })).await.is_err());
    }
}
