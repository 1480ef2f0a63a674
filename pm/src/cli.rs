//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::pipeline::Stage;

/// pm - staged project-planning pipeline
#[derive(Parser)]
#[command(
    name = "pm",
    about = "Turn a project brief into a roadmap, sprint plan and calendar",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline and print the plan summary
    Run {
        /// Project brief for the first stage; `-` reads it from stdin
        brief: Option<String>,

        /// Replay stage outputs from a YAML fixtures file instead of calling a model
        #[arg(long, value_name = "FILE")]
        fixtures: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Suppress progress lines on stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the pipeline stages in order
    Stages,

    /// Print the rendered instructions for a stage
    Prompt {
        /// Stage key (input, roadmap, sessions, calendar)
        stage: Stage,
    },

    /// Print the JSON schema of a stage's output record
    Schema {
        /// Stage key (input, roadmap, sessions, calendar)
        stage: Stage,
    },
}

/// Output format for the run summary
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pmagent")
        .join("logs")
        .join("pmagent.log")
}
