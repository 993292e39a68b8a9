//! Command-line interface for the startup validator
//!
//! ```bash
//! export SERPER_API_KEY=...
//! startup-validator validate "AI bookkeeping for dental clinics" --format markdown
//! startup-validator tools
//! startup-validator tool calculate_break_even --params '{"total_costs": 85000}'
//! ```

use anyhow::{Context as _, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use validator_agents::api::search_provider;
use validator_agents::{FormatterFactory, ReportFormat, StartupValidator, ValidatorConfig};
use validator_tools::{Tool, ToolRegistry};
use validator_utils::{Config, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "startup-validator", version)]
#[command(about = "Validate a startup idea with market, competitor, technical and financial research")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full five-stage validation on an idea
    Validate {
        /// The startup idea, in plain words
        idea: String,

        /// Report format: text, markdown or json
        #[arg(short, long, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip web search and use industry baselines only
        #[arg(long)]
        offline: bool,

        /// Execution budget in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List the research tools
    Tools,

    /// Run a single research tool
    Tool {
        /// Tool name, as printed by `tools`
        name: String,

        /// Tool parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,
    },
}

fn load_config(offline: bool, timeout: Option<u64>) -> anyhow::Result<ValidatorConfig> {
    let mut config = ValidatorConfig::from_env()?;
    if offline {
        config.serper_api_key = None;
    }
    if let Some(secs) = timeout {
        config.max_execution_time = Duration::from_secs(secs);
    }
    config.validate()?;
    Ok(config)
}

async fn run_validate(
    idea: &str,
    format: ReportFormat,
    output: Option<PathBuf>,
    config: &ValidatorConfig,
) -> anyhow::Result<ExitCode> {
    if !config.has_search_key() {
        eprintln!("No SERPER_API_KEY set, using industry baselines instead of live search");
    }

    let validator = StartupValidator::new(search_provider(config)?, config);
    let progress = |message: &str, percent: u8| eprintln!("[{percent:>3}%] {message}");
    let report = validator.validate(idea, Some(&progress)).await?;

    let rendered = FormatterFactory::create(format).render(&report)?;
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(if report.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn registry(config: &ValidatorConfig) -> anyhow::Result<ToolRegistry> {
    let registry = ToolRegistry::new();
    validator_agents::tools::register_all(&registry, &search_provider(config)?, config);
    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let app = Config::from_env();
    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    validator_utils::init_tracing_with(app.log_filter(), log_format);

    info!(environment = %app.environment, "Starting {}", app.app_name);

    match cli.command {
        Command::Validate {
            idea,
            format,
            output,
            offline,
            timeout,
        } => {
            let config = load_config(offline, timeout)?;
            run_validate(&idea, format, output, &config).await
        }
        Command::Tools => {
            let registry = registry(&load_config(false, None)?)?;
            for tool in registry.list_tools() {
                println!("{:<32} {}", tool.name(), tool.description());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Tool { name, params } => {
            let registry = registry(&load_config(false, None)?)?;
            let tool: Arc<dyn Tool> = registry
                .get(&name)
                .ok_or_else(|| anyhow!("unknown tool '{name}', run `tools` to list them"))?;
            let params: serde_json::Value =
                serde_json::from_str(&params).context("--params must be a JSON object")?;
            let value = tool.execute(params).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args() {
        let cli = Cli::try_parse_from([
            "startup-validator",
            "validate",
            "Meal kits for college students",
            "--format",
            "md",
            "--offline",
        ])
        .unwrap();

        match cli.command {
            Command::Validate {
                idea,
                format,
                offline,
                output,
                ..
            } => {
                assert_eq!(idea, "Meal kits for college students");
                assert_eq!(format, ReportFormat::Markdown);
                assert!(offline);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_tool_args_default_params() {
        let cli = Cli::try_parse_from([
            "startup-validator",
            "--json-logs",
            "tool",
            "recommend_tech_stack",
        ])
        .unwrap();
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Command::Tool { ref params, .. } if params == "{}"));
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let result =
            Cli::try_parse_from(["startup-validator", "validate", "idea text", "-f", "html"]);
        assert!(result.is_err());
    }
}
