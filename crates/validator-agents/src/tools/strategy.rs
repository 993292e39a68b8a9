//! Score aggregation, verdict and follow-up planning

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use validator_core::Result as CoreResult;
use validator_tools::{Tool, parse_params};

use super::technical::ComplexityLevel;

const WEIGHT_MARKET: f64 = 0.25;
const WEIGHT_COMPETITION: f64 = 0.20;
const WEIGHT_TECHNICAL: f64 = 0.20;
const WEIGHT_FINANCIAL: f64 = 0.20;
const WEIGHT_TIMING: f64 = 0.15;

const GO_THRESHOLD: f64 = 7.5;
const PIVOT_THRESHOLD: f64 = 5.0;

const SCORE_CONFIDENCE: f64 = 0.85;

const KEY_SUCCESS_FACTORS: [&str; 3] = ["Strong execution", "Customer focus", "Rapid iteration"];

/// Final recommendation for an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "PIVOT")]
    Pivot,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= GO_THRESHOLD {
            Self::Go
        } else if score >= PIVOT_THRESHOLD {
            Self::Pivot
        } else {
            Self::NoGo
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Go => "GO",
            Self::Pivot => "PIVOT",
            Self::NoGo => "NO-GO",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Go => "✅",
            Self::Pivot => "⚠️",
            Self::NoGo => "❌",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "GO" => Ok(Self::Go),
            "PIVOT" => Ok(Self::Pivot),
            "NO-GO" | "NOGO" => Ok(Self::NoGo),
            other => Err(format!("unknown verdict '{other}'")),
        }
    }
}

// =========== Score ===========

/// Figures the component scores are looked up from
///
/// Every field is optional; a missing one falls back to a neutral score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    /// Total addressable market in dollars
    #[serde(default)]
    pub tam: Option<f64>,
    #[serde(default)]
    pub competitors_found: Option<usize>,
    #[serde(default)]
    pub complexity: Option<ComplexityLevel>,
    #[serde(default)]
    pub break_even_months: Option<u32>,
    /// Average market growth in percent
    #[serde(default)]
    pub growth_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub market_size: f64,
    pub competition: f64,
    pub technical_feasibility: f64,
    pub financial_viability: f64,
    pub timing: f64,
}

impl ComponentScores {
    pub fn from_inputs(inputs: &ScoreInputs) -> Self {
        Self {
            market_size: inputs.tam.map_or(7.5, market_size_score),
            competition: inputs.competitors_found.map_or(6.0, competition_score),
            technical_feasibility: inputs.complexity.map_or(8.0, technical_score),
            financial_viability: inputs.break_even_months.map_or(7.0, financial_score),
            timing: inputs.growth_rate.map_or(7.5, timing_score),
        }
    }

    /// Weighted sum of the components
    pub fn weighted(&self) -> f64 {
        self.market_size * WEIGHT_MARKET
            + self.competition * WEIGHT_COMPETITION
            + self.technical_feasibility * WEIGHT_TECHNICAL
            + self.financial_viability * WEIGHT_FINANCIAL
            + self.timing * WEIGHT_TIMING
    }
}

// Component tables. Each one maps a single stage figure onto the 0-10
// scale; bounds are inclusive on the lower edge unless noted.

/// TAM: >= $100B 8.5, >= $10B 7.5, >= $1B 6.5, else 5.0
fn market_size_score(tam: f64) -> f64 {
    if tam >= 100e9 {
        8.5
    } else if tam >= 10e9 {
        7.5
    } else if tam >= 1e9 {
        6.5
    } else {
        5.0
    }
}

/// Competitors found: 0-3 7.0, 4-6 6.0, 7+ 5.0
fn competition_score(found: usize) -> f64 {
    match found {
        0..=3 => 7.0,
        4..=6 => 6.0,
        _ => 5.0,
    }
}

/// Complexity: low 9.0, medium 8.0, high 6.0
fn technical_score(complexity: ComplexityLevel) -> f64 {
    match complexity {
        ComplexityLevel::Low => 9.0,
        ComplexityLevel::Medium => 8.0,
        ComplexityLevel::High => 6.0,
    }
}

/// Break-even months: <= 12 8.0, <= 24 7.0, later 5.5
fn financial_score(months: u32) -> f64 {
    match months {
        0..=12 => 8.0,
        13..=24 => 7.0,
        _ => 5.5,
    }
}

/// Growth percent, strict lower bounds: > 25 9.0, > 15 8.0, > 10 7.5, > 5 6.5, else 5.0
fn timing_score(growth: f64) -> f64 {
    if growth > 25.0 {
        9.0
    } else if growth > 15.0 {
        8.0
    } else if growth > 10.0 {
        7.5
    } else if growth > 5.0 {
        6.5
    } else {
        5.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationScore {
    pub overall_score: f64,
    pub component_scores: ComponentScores,
    pub confidence: f64,
}

pub fn calculate_validation_score(inputs: &ScoreInputs) -> ValidationScore {
    let component_scores = ComponentScores::from_inputs(inputs);
    let overall_score = (component_scores.weighted() * 10.0).round() / 10.0;

    ValidationScore {
        overall_score,
        component_scores,
        confidence: SCORE_CONFIDENCE,
    }
}

// =========== Recommendations ===========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub verdict: Verdict,
    pub recommendations: Vec<String>,
    pub key_success_factors: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

pub fn generate_recommendations(score: f64) -> Recommendations {
    let verdict = Verdict::from_score(score);
    let recommendations: &[&str] = match verdict {
        Verdict::Go => &[
            "Proceed with MVP development",
            "Focus on rapid market entry",
            "Secure seed funding",
            "Build core team",
            "Establish early customer relationships",
        ],
        Verdict::Pivot => &[
            "Refine value proposition",
            "Focus on underserved niche",
            "Reduce initial scope",
            "Validate with potential customers",
            "Consider alternative business models",
        ],
        Verdict::NoGo => &[
            "Reconsider the fundamental concept",
            "Research alternative markets",
            "Explore different problem spaces",
            "Join an accelerator for guidance",
            "Consider partnering with existing players",
        ],
    };

    Recommendations {
        verdict,
        recommendations: owned(recommendations),
        key_success_factors: owned(&KEY_SUCCESS_FACTORS),
    }
}

// =========== Action plan ===========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub immediate_actions: Vec<String>,
    #[serde(rename = "30_day_goals")]
    pub thirty_day_goals: Vec<String>,
    #[serde(rename = "90_day_goals")]
    pub ninety_day_goals: Vec<String>,
}

pub fn create_action_plan(verdict: Verdict) -> ActionPlan {
    let (immediate, thirty, ninety): (&[&str], &[&str], &[&str]) = match verdict {
        Verdict::Go => (
            &[
                "Validate with 20 potential customers",
                "Build technical prototype",
                "Form founding team",
                "Apply to accelerators",
            ],
            &[
                "Complete customer interviews",
                "Finalize MVP features",
                "Secure technical co-founder",
            ],
            &["Launch MVP", "Acquire first 100 users", "Raise pre-seed funding"],
        ),
        Verdict::Pivot => (
            &[
                "Identify specific niche to target",
                "Revise value proposition",
                "Survey target customers",
            ],
            &[
                "Complete pivot strategy",
                "Test new positioning",
                "Update business model",
            ],
            &[
                "Launch revised MVP",
                "Measure traction metrics",
                "Decide on path forward",
            ],
        ),
        Verdict::NoGo => (
            &[
                "Document lessons learned",
                "Explore adjacent opportunities",
                "Network with other entrepreneurs",
            ],
            &[
                "Generate new ideas",
                "Join startup community",
                "Find mentor or advisor",
            ],
            &[
                "Validate new concept",
                "Build skills in weak areas",
                "Consider joining existing startup",
            ],
        ),
    };

    ActionPlan {
        immediate_actions: owned(immediate),
        thirty_day_goals: owned(thirty),
        ninety_day_goals: owned(ninety),
    }
}

// =========== Tools ===========

pub struct ValidationScoreTool;

#[async_trait]
impl Tool for ValidationScoreTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let inputs: ScoreInputs = parse_params(params)?;
        Ok(serde_json::to_value(calculate_validation_score(&inputs))?)
    }

    fn name(&self) -> &str {
        "calculate_validation_score"
    }

    fn description(&self) -> &str {
        "Combine market, competition, technical, financial and timing scores into one 0-10 score"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tam": { "type": "number", "description": "Total addressable market in dollars" },
                "competitors_found": { "type": "integer" },
                "complexity": { "type": "string", "enum": ["low", "medium", "high"] },
                "break_even_months": { "type": "integer" },
                "growth_rate": { "type": "number", "description": "Average growth in percent" }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct ScoreParams {
    score: f64,
}

pub struct RecommendationsTool;

#[async_trait]
impl Tool for RecommendationsTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: ScoreParams = parse_params(params)?;
        Ok(serde_json::to_value(generate_recommendations(params.score))?)
    }

    fn name(&self) -> &str {
        "generate_recommendations"
    }

    fn description(&self) -> &str {
        "Turn a validation score into a verdict and recommendations"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "score": { "type": "number", "minimum": 0, "maximum": 10 }
            },
            "required": ["score"]
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerdictParams {
    verdict: String,
}

pub struct ActionPlanTool;

#[async_trait]
impl Tool for ActionPlanTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: VerdictParams = parse_params(params)?;
        let verdict = params
            .verdict
            .parse::<Verdict>()
            .map_err(validator_core::Error::InvalidInput)?;
        Ok(serde_json::to_value(create_action_plan(verdict))?)
    }

    fn name(&self) -> &str {
        "create_action_plan"
    }

    fn description(&self) -> &str {
        "Immediate actions and 30/90 day goals for a verdict"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "verdict": { "type": "string", "enum": ["GO", "PIVOT", "NO-GO"] }
            },
            "required": ["verdict"]
        })
    }
}
