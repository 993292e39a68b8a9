//! Five-stage validation pipeline

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use validator_core::{Agent, Context};

use super::result::{StageOutcome, StageState, ValidationReport};
use crate::agents::{
    CompetitorResearcherAgent, FinancialAnalystAgent, MarketAnalystAgent, StrategyAdvisorAgent,
    TechnicalArchitectAgent,
};
use crate::api::SearchProvider;
use crate::config::ValidatorConfig;
use crate::error::{Result, ValidatorError};
use crate::keywords::contains_word;

const MIN_IDEA_CHARS: usize = 10;
const SPAM_MARKERS: &[&str] = &["test", "asdf", "123", "xxx"];

/// Receives progress notifications as stages start
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str, percent: u8);
}

impl<F> ProgressReporter for F
where
    F: Fn(&str, u8) + Send + Sync,
{
    fn report(&self, message: &str, percent: u8) {
        self(message, percent);
    }
}

/// One pipeline step
pub struct Stage {
    agent: Arc<dyn Agent>,
    min_confidence: f64,
    percent: u8,
    message: &'static str,
}

impl Stage {
    pub fn new(
        agent: Arc<dyn Agent>,
        min_confidence: f64,
        percent: u8,
        message: &'static str,
    ) -> Self {
        Self {
            agent,
            min_confidence,
            percent,
            message,
        }
    }
}

/// Runs the stages in order over a shared [`Context`]
pub struct StartupValidator {
    stages: Vec<Stage>,
    max_execution_time: Duration,
    using_real_data: bool,
}

impl StartupValidator {
    /// The standard market, competitor, technical, financial and strategy
    /// pipeline
    pub fn new(search: Arc<dyn SearchProvider>, config: &ValidatorConfig) -> Self {
        let stages = vec![
            Stage::new(
                Arc::new(MarketAnalystAgent::new(Arc::clone(&search))),
                0.7,
                20,
                "Analyzing market opportunity",
            ),
            Stage::new(
                Arc::new(CompetitorResearcherAgent::new(search)),
                0.6,
                40,
                "Researching competitors",
            ),
            Stage::new(
                Arc::new(TechnicalArchitectAgent::new()),
                0.8,
                60,
                "Assessing technical feasibility",
            ),
            Stage::new(
                Arc::new(FinancialAnalystAgent::new(config.capture_rate)),
                0.7,
                80,
                "Projecting financials",
            ),
            Stage::new(
                Arc::new(StrategyAdvisorAgent::new()),
                0.8,
                90,
                "Synthesizing strategy",
            ),
        ];

        Self::with_stages(stages, config.max_execution_time, config.has_search_key())
    }

    pub fn with_stages(
        stages: Vec<Stage>,
        max_execution_time: Duration,
        using_real_data: bool,
    ) -> Self {
        Self {
            stages,
            max_execution_time,
            using_real_data,
        }
    }

    /// Reject ideas that are too short or look like junk input
    pub fn pre_validate(idea: &str) -> Result<()> {
        let trimmed = idea.trim();
        if trimmed.chars().count() < MIN_IDEA_CHARS {
            return Err(ValidatorError::InvalidIdea(format!(
                "idea must be at least {MIN_IDEA_CHARS} characters"
            )));
        }

        if let Some(marker) = SPAM_MARKERS.iter().find(|m| contains_word(trimmed, m)) {
            return Err(ValidatorError::InvalidIdea(format!(
                "idea looks like placeholder text ('{marker}')"
            )));
        }

        Ok(())
    }

    /// Validate `idea`, returning the report even when a stage fails
    ///
    /// Only pre-validation errors are returned as `Err`.
    #[instrument(skip(self, progress))]
    pub async fn validate(
        &self,
        idea: &str,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<ValidationReport> {
        Self::pre_validate(idea)?;

        let idea = idea.trim();
        let started = Instant::now();
        let mut context = Context::new(idea);
        let mut outcomes = Vec::with_capacity(self.stages.len());

        info!(using_real_data = self.using_real_data, "Starting validation");

        for stage in &self.stages {
            if let Some(progress) = progress {
                progress.report(stage.message, stage.percent);
            }

            let outcome = self.run_stage(stage, idea, &mut context, started).await;
            let failed = outcome.state == StageState::Failed;
            outcomes.push(outcome);
            if failed {
                break;
            }
        }

        let report = ValidationReport::from_context(&context, outcomes)?
            .with_execution_time(started.elapsed().as_secs_f64())
            .with_real_data(self.using_real_data);

        if report.is_completed() {
            if let Some(progress) = progress {
                progress.report("Validation complete", 100);
            }
        }

        info!(
            status = ?report.status,
            confidence = report.confidence_score,
            seconds = report.execution_time_secs,
            "Validation finished"
        );
        Ok(report)
    }

    async fn run_stage(
        &self,
        stage: &Stage,
        idea: &str,
        context: &mut Context,
        started: Instant,
    ) -> StageOutcome {
        let key = stage.agent.key();
        let remaining = self.max_execution_time.saturating_sub(started.elapsed());
        let stage_started = Instant::now();

        debug!(stage = key, agent = stage.agent.name(), ?remaining, "Running stage");

        let result = if remaining.is_zero() {
            None
        } else {
            tokio::time::timeout(remaining, stage.agent.process(idea, context))
                .await
                .ok()
        };

        let mut outcome = StageOutcome {
            stage: key.to_string(),
            agent: stage.agent.name().to_string(),
            state: StageState::Completed,
            confidence: None,
            min_confidence: stage.min_confidence,
            elapsed_ms: stage_started.elapsed().as_millis() as u64,
            error: None,
        };

        match result {
            Some(Ok(())) => {
                outcome.confidence = context.stage_confidence(key);
                if outcome.confidence.unwrap_or(0.0) < stage.min_confidence {
                    warn!(
                        stage = key,
                        confidence = ?outcome.confidence,
                        min_confidence = stage.min_confidence,
                        "Stage below minimum confidence"
                    );
                    outcome.state = StageState::Degraded;
                }
            }
            Some(Err(e)) => {
                error!(stage = key, error = %e, "Stage failed");
                outcome.state = StageState::Failed;
                outcome.error = Some(e.to_string());
            }
            None => {
                let err = ValidatorError::Timeout {
                    stage: key.to_string(),
                    millis: remaining.as_millis() as u64,
                };
                error!(stage = key, "{err}");
                outcome.state = StageState::Failed;
                outcome.error = Some(err.to_string());
            }
        }

        outcome
    }
}
