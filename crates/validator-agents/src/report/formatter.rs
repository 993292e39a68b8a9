//! Text, Markdown and JSON renderings of a validation report

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::fmt;
use std::str::FromStr;

use crate::engine::{ReportStatus, StageState, ValidationReport};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Json => "json",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

pub trait Formatter: Send + Sync {
    fn format(&self) -> ReportFormat;
    fn render(&self, report: &ValidationReport) -> Result<String>;
}

fn verdict_line(report: &ValidationReport) -> String {
    match (report.summary.score, report.summary.verdict) {
        (Some(score), Some(verdict)) => {
            format!("{} {verdict} (score {score}/10)", verdict.emoji())
        }
        _ => "No verdict".to_string(),
    }
}

fn status_label(report: &ValidationReport) -> &'static str {
    match report.status {
        ReportStatus::Completed => "completed",
        ReportStatus::Failed => "failed",
    }
}

/// The headline rows shared by the text and Markdown renderings
fn summary_rows(report: &ValidationReport) -> Vec<(&'static str, String)> {
    let summary = &report.summary;
    vec![
        ("Verdict", verdict_line(report)),
        ("Confidence", format!("{}%", report.confidence_score)),
        ("Market size (TAM)", summary.market_size.clone()),
        ("Competitors found", summary.competitors_found.to_string()),
        ("Technical complexity", summary.technical_complexity.clone()),
        ("Initial investment", summary.initial_investment.clone()),
        ("Break-even", summary.break_even.clone()),
        ("Market data", summary.data_quality.market.clone()),
        ("Competitor data", summary.data_quality.competitors.clone()),
    ]
}

fn stage_label(state: StageState) -> &'static str {
    match state {
        StageState::Completed => "ok",
        StageState::Degraded => "degraded",
        StageState::Failed => "failed",
    }
}

/// Terminal rendering built from tables
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, report: &ValidationReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!("Startup validation: {}\n", report.idea));
        out.push_str(&format!(
            "Status: {} in {:.2}s\n",
            status_label(report),
            report.execution_time_secs
        ));
        if let Some(error) = &report.error {
            out.push_str(&format!("❌ Error: {error}\n"));
        }

        let mut summary = Table::new();
        summary
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Metric", "Value"]);
        for (label, value) in summary_rows(report) {
            summary.add_row(vec![label.to_string(), value]);
        }
        out.push_str(&format!("\n{summary}\n"));

        if let Some(market) = &report.market {
            let sizing = &market.market_opportunity;
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["TAM", "SAM", "SOM", "Growth", "Phase"])
                .add_row(vec![
                    sizing.tam.formatted.clone(),
                    sizing.sam.formatted.clone(),
                    sizing.som.formatted.clone(),
                    market.trends.average_growth_rate.clone(),
                    market.trends.market_phase.to_string(),
                ]);
            out.push_str(&format!("\nMarket ({})\n{table}\n", market.industry));
        }

        if let Some(competitors) = &report.competitors {
            if !competitors.competitor_list.is_empty() {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["Competitor", "Source"]);
                for competitor in &competitors.competitor_list {
                    table.add_row(vec![competitor.name.clone(), competitor.source.clone()]);
                }
                out.push_str(&format!("\nCompetitors\n{table}\n"));
            }
        }

        if let Some(financial) = &report.financial {
            let revenue = &financial.revenue_projections;
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["Year 1", "Year 2", "Year 3", "Year 5"])
                .add_row(vec![
                    revenue.year_1_formatted.clone(),
                    revenue.year_2_formatted.clone(),
                    revenue.year_3_formatted.clone(),
                    revenue.year_5_formatted.clone(),
                ]);
            out.push_str(&format!("\nRevenue projection\n{table}\n"));
        }

        if !report.summary.top_recommendations.is_empty() {
            out.push_str("\nTop recommendations\n");
            for (i, rec) in report.summary.top_recommendations.iter().enumerate() {
                out.push_str(&format!("  {}. {rec}\n", i + 1));
            }
        }

        let mut stages = Table::new();
        stages
            .load_preset(UTF8_FULL)
            .set_header(vec!["Stage", "State", "Confidence", "Time (ms)"]);
        for stage in &report.stages {
            stages.add_row(vec![
                stage.stage.clone(),
                stage_label(stage.state).to_string(),
                stage
                    .confidence
                    .map_or_else(|| "-".to_string(), |c| format!("{c:.2}")),
                stage.elapsed_ms.to_string(),
            ]);
        }
        out.push_str(&format!("\nStages\n{stages}\n"));

        Ok(out)
    }
}

/// Markdown document
pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }

    fn render(&self, report: &ValidationReport) -> Result<String> {
        let mut out = String::new();
        out.push_str("# Startup Validation Report\n\n");
        out.push_str(&format!("**Idea:** {}\n\n", report.idea));
        out.push_str(&format!(
            "_Run {} at {} ({}, {:.2}s)_\n\n",
            report.run_id,
            report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            status_label(report),
            report.execution_time_secs
        ));
        if let Some(error) = &report.error {
            out.push_str(&format!("> **Error:** {error}\n\n"));
        }

        out.push_str("## Summary\n\n");
        out.push_str("| Metric | Value |\n");
        out.push_str("|---|---|\n");
        for (label, value) in summary_rows(report) {
            out.push_str(&format!("| {label} | {value} |\n"));
        }

        if let Some(market) = &report.market {
            let sizing = &market.market_opportunity;
            out.push_str("\n## Market\n\n");
            out.push_str(&format!("- Industry: {}\n", market.industry));
            out.push_str(&format!(
                "- TAM {} / SAM {} / SOM {}\n",
                sizing.tam.formatted,
                sizing.sam.formatted,
                sizing.som.formatted
            ));
            out.push_str(&format!(
                "- Growth: {} ({})\n",
                market.trends.average_growth_rate,
                market.trends.market_phase
            ));
            out.push_str(&format!("- Source: {}\n", market.data_source));
        }

        if let Some(competitors) = &report.competitors {
            out.push_str("\n## Competitors\n\n");
            if competitors.competitor_list.is_empty() {
                out.push_str("No competitors identified.\n");
            }
            for competitor in &competitors.competitor_list {
                out.push_str(&format!("- **{}**: {}\n", competitor.name, competitor.description));
            }
            let gaps = &competitors.market_gaps;
            if !gaps.unserved_segments.is_empty() {
                out.push_str(&format!(
                    "\nUnserved segments: {}\n",
                    gaps.unserved_segments.join(", ")
                ));
            }
        }

        if let Some(technical) = &report.technical {
            out.push_str("\n## Technical\n\n");
            out.push_str(&format!("- {}\n", technical.complexity.description));
            out.push_str(&format!(
                "- Stack: {} / {} / {}\n",
                technical.tech_stack.frontend,
                technical.tech_stack.backend,
                technical.tech_stack.database
            ));
            out.push_str(&format!(
                "- MVP in {}, launch in {} with {}\n",
                technical.timeline.mvp,
                technical.timeline.launch,
                technical.timeline.team_size
            ));
        }

        if let Some(financial) = &report.financial {
            out.push_str("\n## Financials\n\n");
            out.push_str(&format!("- {}\n", financial.summary));
            out.push_str(&format!(
                "- Year 3 revenue: {}\n",
                financial.revenue_projections.year_3_formatted
            ));
        }

        if let Some(strategy) = &report.strategy {
            out.push_str("\n## Strategy\n\n");
            out.push_str(&format!("{}\n\n", strategy.summary));
            for rec in &strategy.recommendations {
                out.push_str(&format!("- {rec}\n"));
            }
            out.push_str("\n### Immediate actions\n\n");
            for action in &strategy.action_plan.immediate_actions {
                out.push_str(&format!("1. {action}\n"));
            }
        }

        Ok(out)
    }
}

/// Pretty-printed JSON of the whole report
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, report: &ValidationReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: ReportFormat) -> Box<dyn Formatter> {
        match format {
            ReportFormat::Text => Box::new(TextFormatter),
            ReportFormat::Markdown => Box::new(MarkdownFormatter),
            ReportFormat::Json => Box::new(JsonFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{StrategyAdvisorAgent, TechnicalArchitectAgent};
    use crate::api::testing::StaticSearch;
    use crate::config::ValidatorConfig;
    use crate::engine::StartupValidator;
    use std::sync::Arc;
    use validator_core::{Agent, Context};

    async fn sample_report() -> ValidationReport {
        let idea = "Simple website builder for bakeries";
        let mut ctx = Context::new(idea);
        TechnicalArchitectAgent::new()
            .process(idea, &mut ctx)
            .await
            .unwrap();
        StrategyAdvisorAgent::new()
            .process(idea, &mut ctx)
            .await
            .unwrap();
        ValidationReport::from_context(&ctx, vec![]).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("html".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default().to_string(), "text");
    }

    #[tokio::test]
    async fn test_text_rendering() {
        let report = sample_report().await;
        let text = TextFormatter.render(&report).unwrap();

        assert!(text.contains("Simple website builder for bakeries"));
        assert!(text.contains("Technical complexity"));
        assert!(text.contains("PIVOT"));
        assert!(text.contains("1. Refine value proposition"));
    }

    #[tokio::test]
    async fn test_markdown_rendering() {
        let report = sample_report().await;
        let md = MarkdownFormatter.render(&report).unwrap();

        assert!(md.starts_with("# Startup Validation Report"));
        assert!(md.contains("| Market size (TAM) | Unknown |"));
        assert!(md.contains("## Technical"));
        assert!(!md.contains("## Financials"));
    }

    #[tokio::test]
    async fn test_full_offline_report_renders_every_section() {
        let validator = StartupValidator::new(
            Arc::new(StaticSearch::unavailable()),
            &ValidatorConfig::default(),
        );
        let mut report = validator
            .validate("Mobile app for booking dog walkers", None)
            .await
            .unwrap();
        report.error = Some("search quota exhausted".to_string());

        let md = MarkdownFormatter.render(&report).unwrap();
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "# Startup Validation Report");
        assert!(lines.contains(&"| Metric | Value |"));
        assert!(lines.contains(&"> **Error:** search quota exhausted"));
        assert!(lines.contains(&"No competitors identified."));
        assert!(lines.contains(&"### Immediate actions"));
        for heading in [
            "## Market",
            "## Competitors",
            "## Technical",
            "## Financials",
            "## Strategy",
        ] {
            assert!(lines.contains(&heading), "missing {heading}");
        }
        assert!(md.ends_with('\n'));

        let text = TextFormatter.render(&report).unwrap();
        assert!(text.starts_with("Startup validation: Mobile app for booking dog walkers\n"));
        assert!(text.contains("❌ Error: search quota exhausted\n"));
        assert!(text.contains("Revenue projection"));
        assert!(text.contains("\nStages\n"));
    }

    #[tokio::test]
    async fn test_json_rendering_round_trips() {
        let report = sample_report().await;
        let formatter = FormatterFactory::create(ReportFormat::Json);
        assert_eq!(formatter.format(), ReportFormat::Json);

        let json = formatter.render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["verdict"], "PIVOT");
        assert_eq!(value["status"], "completed");
    }
}
