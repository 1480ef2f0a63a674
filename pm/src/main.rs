//! pm - staged project-planning pipeline
//!
//! CLI entry point: runs the pipeline and inspects its stages.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use pmagent::agent::{AgentDescriptor, AgentRunner, LlmAgentRunner, ScriptedRunner};
use pmagent::cli::{Cli, Command, OutputFormat, get_log_path};
use pmagent::config::Config;
use pmagent::llm::create_client;
use pmagent::pipeline::{Pipeline, STAGES, Stage, summary};
use pmagent::progress::{ConsoleReporter, ProgressReporter, TracingReporter};
use pmagent::prompts::PromptLoader;

/// Exit code for a run interrupted with Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("pm loaded config: provider={} model={}", config.llm.provider, config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Run {
            brief,
            fixtures,
            format,
            quiet,
        }) => {
            debug!(?brief, ?fixtures, %format, quiet, "main: matched Run command");
            cmd_run(&config, brief, fixtures.as_deref(), format, quiet).await
        }
        Some(Command::Stages) => {
            debug!("main: matched Stages command");
            cmd_stages();
            Ok(())
        }
        Some(Command::Prompt { stage }) => {
            debug!(%stage, "main: matched Prompt command");
            cmd_prompt(&config, stage)
        }
        Some(Command::Schema { stage }) => {
            debug!(%stage, "main: matched Schema command");
            cmd_schema(stage)
        }
        None => {
            debug!("main: no command specified, printing help");
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Run the full pipeline and print the result
async fn cmd_run(
    config: &Config,
    brief: Option<String>,
    fixtures: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let brief = resolve_brief(brief, config)?;

    let runner: Arc<dyn AgentRunner> = match fixtures {
        Some(path) => {
            info!(path = %path.display(), "cmd_run: replaying fixtures");
            Arc::new(ScriptedRunner::from_yaml_file(path)?)
        }
        None => {
            config.validate()?;
            let llm = create_client(&config.llm).context("Failed to create LLM client")?;
            Arc::new(LlmAgentRunner::new(llm, config.llm.max_tokens))
        }
    };
    let reporter: Arc<dyn ProgressReporter> = if quiet {
        Arc::new(TracingReporter)
    } else {
        Arc::new(ConsoleReporter)
    };

    let pipeline = Pipeline::new(runner, reporter, &prompt_loader(config))?;

    let outcome = tokio::select! {
        result = pipeline.run(&brief) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("cmd_run: interrupted");
            eprintln!("Interrupted");
            std::process::exit(EXIT_INTERRUPTED);
        }
    };

    match format {
        OutputFormat::Text => print!("{}", summary::render_text(&outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

/// Brief from the argument, stdin (`-`), or the configured default
fn resolve_brief(brief: Option<String>, config: &Config) -> Result<String> {
    let brief = match brief.as_deref() {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read brief from stdin")?;
            text
        }
        Some(text) => text.to_string(),
        None => String::new(),
    };

    let brief = brief.trim();
    if brief.is_empty() {
        debug!("resolve_brief: using configured default");
        Ok(config.pipeline.brief.clone())
    } else {
        Ok(brief.to_string())
    }
}

fn prompt_loader(config: &Config) -> PromptLoader {
    match &config.pipeline.prompts_dir {
        Some(dir) => PromptLoader::new(dir),
        None => PromptLoader::embedded_only(),
    }
}

/// List the stages in execution order
fn cmd_stages() {
    println!("{:<3} {:<10} {:<22} {:<22} RECORD", "#", "STAGE", "AGENT", "TOOL");
    for (i, spec) in STAGES.iter().enumerate() {
        let stage = spec.stage;
        println!(
            "{:<3} {:<10} {:<22} {:<22} {}",
            i + 1,
            stage.key(),
            stage.agent_name(),
            stage.output_tool(),
            stage.record_name()
        );
    }
}

/// Print a stage's rendered instructions
fn cmd_prompt(config: &Config, stage: Stage) -> Result<()> {
    let descriptor = AgentDescriptor::for_stage(stage, &prompt_loader(config))
        .context(format!("Failed to render instructions for stage '{}'", stage))?;
    println!("{}", descriptor.instructions);
    Ok(())
}

/// Print a stage's output schema
fn cmd_schema(stage: Stage) -> Result<()> {
    let schema = (stage.spec().schema)();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
