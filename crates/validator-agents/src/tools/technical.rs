//! Technical feasibility heuristics

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator_core::Result as CoreResult;
use validator_tools::{Tool, parse_params};

use crate::keywords::matches_any;

const HIGH_COMPLEXITY: &[&str] = &[
    "ai",
    "machine learning",
    "blockchain",
    "ar",
    "vr",
    "quantum",
    "autonomous",
    "robotics",
    "deep learning",
    "neural",
];

const MEDIUM_COMPLEXITY: &[&str] = &[
    "marketplace",
    "platform",
    "app",
    "saas",
    "api",
    "integration",
    "analytics",
    "dashboard",
    "automation",
    "cloud",
];

const LOW_COMPLEXITY: &[&str] = &[
    "website",
    "blog",
    "landing page",
    "newsletter",
    "directory",
    "simple",
    "basic",
    "static",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    pub fn score(self) -> u8 {
        match self {
            Self::Low => 3,
            Self::Medium => 5,
            Self::High => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityLevel {
    type Err = std::convert::Infallible;

    /// Unknown levels read as medium
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAssessment {
    pub complexity: ComplexityLevel,
    pub score: u8,
    pub description: String,
}

/// Classify an idea by the first complexity tier whose keywords it mentions
pub fn assess_complexity(idea: &str) -> ComplexityAssessment {
    let tiers = [
        (ComplexityLevel::High, HIGH_COMPLEXITY),
        (ComplexityLevel::Medium, MEDIUM_COMPLEXITY),
        (ComplexityLevel::Low, LOW_COMPLEXITY),
    ];
    let complexity = tiers
        .into_iter()
        .find(|(_, keywords)| matches_any(idea, keywords))
        .map_or(ComplexityLevel::Medium, |(level, _)| level);

    ComplexityAssessment {
        complexity,
        score: complexity.score(),
        description: format!("This project has {complexity} technical complexity"),
    }
}

/// Recommended technologies; optional components are keyed by role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStack {
    pub frontend: String,
    pub backend: String,
    pub database: String,
    pub hosting: String,
    #[serde(flatten)]
    pub extras: BTreeMap<String, String>,
    pub additional: Vec<String>,
}

impl Default for TechStack {
    fn default() -> Self {
        Self {
            frontend: "React/Next.js".to_string(),
            backend: "Node.js/Python FastAPI".to_string(),
            database: "PostgreSQL".to_string(),
            hosting: "AWS/Vercel".to_string(),
            extras: BTreeMap::new(),
            additional: Vec::new(),
        }
    }
}

impl TechStack {
    fn add(&mut self, role: &str, technology: &str, additional: &str) {
        self.extras.insert(role.to_string(), technology.to_string());
        self.additional.push(additional.to_string());
    }
}

pub fn recommend_tech_stack(idea: &str) -> TechStack {
    let mut stack = TechStack::default();

    if matches_any(idea, &["mobile", "app"]) {
        stack.add("mobile", "React Native or Flutter", "Push notifications");
    }
    if matches_any(idea, &["ai", "machine learning"]) {
        stack.backend = "Python FastAPI".to_string();
        stack.add("ml", "TensorFlow/PyTorch", "GPU infrastructure");
    }
    if matches_any(idea, &["real-time", "live"]) {
        stack.add("realtime", "WebSockets/Socket.io", "Redis for caching");
    }
    if matches_any(idea, &["marketplace", "payment"]) {
        stack.add("payments", "Stripe/PayPal", "Payment processing");
    }

    stack
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentTimeline {
    pub mvp: String,
    pub beta: String,
    pub launch: String,
    pub team_size: String,
}

pub fn estimate_timeline(complexity: ComplexityLevel) -> DevelopmentTimeline {
    let (mvp, beta, launch, team_size) = match complexity {
        ComplexityLevel::Low => ("1-2 months", "2-3 months", "3-4 months", "1-2 developers"),
        ComplexityLevel::Medium => ("3-4 months", "4-6 months", "6-8 months", "2-4 developers"),
        ComplexityLevel::High => ("6-8 months", "8-10 months", "10-12 months", "4-8 developers"),
    };

    DevelopmentTimeline {
        mvp: mvp.to_string(),
        beta: beta.to_string(),
        launch: launch.to_string(),
        team_size: team_size.to_string(),
    }
}

// =========== Tools ===========

#[derive(Debug, Deserialize)]
struct IdeaParams {
    idea: String,
}

fn idea_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "idea": { "type": "string", "description": "Startup idea" }
        },
        "required": ["idea"]
    })
}

pub struct ComplexityTool;

#[async_trait]
impl Tool for ComplexityTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: IdeaParams = parse_params(params)?;
        Ok(serde_json::to_value(assess_complexity(&params.idea))?)
    }

    fn name(&self) -> &str {
        "assess_technical_complexity"
    }

    fn description(&self) -> &str {
        "Rate technical complexity (low, medium, high) from keywords in the idea"
    }

    fn input_schema(&self) -> Value {
        idea_schema()
    }
}

pub struct TechStackTool;

#[async_trait]
impl Tool for TechStackTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: IdeaParams = parse_params(params)?;
        Ok(serde_json::to_value(recommend_tech_stack(&params.idea))?)
    }

    fn name(&self) -> &str {
        "recommend_tech_stack"
    }

    fn description(&self) -> &str {
        "Recommend a technology stack for the idea"
    }

    fn input_schema(&self) -> Value {
        idea_schema()
    }
}

#[derive(Debug, Deserialize)]
struct TimelineParams {
    complexity: String,
}

pub struct TimelineTool;

#[async_trait]
impl Tool for TimelineTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: TimelineParams = parse_params(params)?;
        let level = params
            .complexity
            .parse::<ComplexityLevel>()
            .unwrap_or(ComplexityLevel::Medium);
        Ok(serde_json::to_value(estimate_timeline(level))?)
    }

    fn name(&self) -> &str {
        "estimate_development_timeline"
    }

    fn description(&self) -> &str {
        "Estimate MVP, beta and launch timelines and team size for a complexity level"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "complexity": {
                    "type": "string",
                    "enum": ["low", "medium", "high"]
                }
            },
            "required": ["complexity"]
        })
    }
}
