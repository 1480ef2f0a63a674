//! pmagent - staged project-planning pipeline
//!
//! Turns a free-text project brief into a plan through four LLM-backed
//! stages, each producing one typed record:
//!
//! 1. `ProjectInputAgent` - structured project facts ([`schema::ProjectInputData`])
//! 2. `RoadmapPlannerAgent` - phases, epics and stories ([`schema::ProjectRoadmap`])
//! 3. `SessionPlannerAgent` - sprints and ceremonies ([`schema::SessionPlan`])
//! 4. `CalendarAgent` - concrete calendar entries ([`schema::CalendarPlan`])
//!
//! Each stage sees only a small text projection of earlier records, never the
//! raw responses.
//!
//! # Modules
//!
//! - [`schema`] - Typed stage records and soft consistency findings
//! - [`pipeline`] - Stage table, context projection, driver and summary
//! - [`agent`] - Runner trait with LLM-backed and scripted implementations
//! - [`llm`] - Provider clients (Anthropic, OpenAI)
//! - [`progress`] - Progress reporters
//! - [`prompts`] - Stage instruction templates
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod schema;

// Re-export commonly used types
pub use agent::{AgentDescriptor, AgentError, AgentOutput, AgentRunner, LlmAgentRunner, ScriptedRunner};
pub use config::{Config, LlmConfig};
pub use llm::{LlmClient, LlmError, create_client};
pub use pipeline::{Pipeline, PipelineError, PipelineOutcome, Stage};
pub use progress::{ConsoleReporter, ProgressReporter, RecordingReporter, TracingReporter};
