//! Scripted agent runner
//!
//! Replays canned stage outputs instead of calling a model. Backs the
//! `--fixtures` mode of the CLI and the pipeline tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::{AgentDescriptor, AgentError, AgentOutput, AgentRunner};
use crate::llm::LlmError;
use crate::pipeline::Stage;

/// What the runner hands back for a stage
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// A raw structured value, decoded later like a real response
    Output(serde_json::Value),
    /// A failed external call
    TransportFailure(String),
}

/// One call the runner received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub stage: Stage,
    pub agent: String,
    pub input: String,
}

/// Fixture file layout: one raw value per stage key, plus optional failures
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureFile {
    input: Option<serde_json::Value>,
    roadmap: Option<serde_json::Value>,
    sessions: Option<serde_json::Value>,
    calendar: Option<serde_json::Value>,
    /// Stage key -> transport error message
    #[serde(default)]
    fail: HashMap<String, String>,
}

/// Replays canned replies and records every call it receives
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: HashMap<Stage, ScriptedReply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, stage: Stage, value: serde_json::Value) -> Self {
        self.replies.insert(stage, ScriptedReply::Output(value));
        self
    }

    pub fn with_failure(mut self, stage: Stage, message: impl Into<String>) -> Self {
        self.replies.insert(stage, ScriptedReply::TransportFailure(message.into()));
        self
    }

    /// Load replies from a YAML fixture file with `input`, `roadmap`,
    /// `sessions`, `calendar` and an optional `fail` map
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read fixtures file: {}", path.display()))?;
        Self::from_yaml_str(&content).context(format!("Failed to parse fixtures file: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: FixtureFile = serde_yaml::from_str(content)?;
        let mut runner = Self::new();

        for (stage, value) in [
            (Stage::ProjectInput, file.input),
            (Stage::Roadmap, file.roadmap),
            (Stage::Sessions, file.sessions),
            (Stage::Calendar, file.calendar),
        ] {
            if let Some(value) = value {
                runner = runner.with_output(stage, value);
            }
        }

        for (key, message) in file.fail {
            let stage: Stage = key.parse().map_err(|e: String| eyre::eyre!(e))?;
            runner = runner.with_failure(stage, message);
        }

        debug!(replies = runner.replies.len(), "ScriptedRunner::from_yaml_str: loaded");
        Ok(runner)
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AgentRunner for ScriptedRunner {
    async fn run(&self, agent: &AgentDescriptor, input: &str) -> Result<AgentOutput, AgentError> {
        debug!(stage = %agent.stage, agent = %agent.name, "ScriptedRunner::run: called");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                stage: agent.stage,
                agent: agent.name.clone(),
                input: input.to_string(),
            });
        }

        match self.replies.get(&agent.stage) {
            Some(ScriptedReply::Output(value)) => Ok(AgentOutput::new(value.clone())),
            Some(ScriptedReply::TransportFailure(message)) => Err(AgentError::Transport(LlmError::ApiError {
                status: 503,
                message: message.clone(),
            })),
            None => Err(AgentError::Transport(LlmError::InvalidResponse(format!(
                "no scripted reply for stage '{}'",
                agent.stage
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolDefinition;
    use serde_json::json;

    fn descriptor(stage: Stage) -> AgentDescriptor {
        AgentDescriptor {
            stage,
            name: stage.agent_name().to_string(),
            instructions: String::new(),
            output_tool: ToolDefinition::new(stage.output_tool(), "", json!({"type": "object"})),
        }
    }

    #[tokio::test]
    async fn test_replays_output_and_records_call() {
        let runner = ScriptedRunner::new().with_output(Stage::Roadmap, json!({"phases": []}));

        let output = runner.run(&descriptor(Stage::Roadmap), "Project: Alpha").await.unwrap();
        assert_eq!(output.value, json!({"phases": []}));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].agent, "RoadmapPlannerAgent");
        assert_eq!(calls[0].input, "Project: Alpha");
    }

    #[tokio::test]
    async fn test_missing_reply_is_transport_error() {
        let runner = ScriptedRunner::new();
        let err = runner.run(&descriptor(Stage::Calendar), "ctx").await.unwrap_err();
        assert!(matches!(err, AgentError::Transport(_)));
    }

    #[tokio::test]
    async fn test_from_yaml_with_failure() {
        let yaml = r#"
input:
  project_name: Alpha
fail:
  roadmap: connection reset
"#;
        let runner = ScriptedRunner::from_yaml_str(yaml).unwrap();

        let output = runner.run(&descriptor(Stage::ProjectInput), "brief").await.unwrap();
        assert_eq!(output.value["project_name"], "Alpha");

        let err = runner.run(&descriptor(Stage::Roadmap), "ctx").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        assert!(ScriptedRunner::from_yaml_str("roadmaps: {}\n").is_err());
        assert!(ScriptedRunner::from_yaml_str("fail:\n  deploy: boom\n").is_err());
    }
}
