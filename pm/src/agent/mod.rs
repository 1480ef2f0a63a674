//! Agent runners
//!
//! A stage delegates its one external call to an [`AgentRunner`]: given the
//! stage's rendered instructions and its context text, the runner returns the
//! raw structured value the model produced. Decoding into a typed record
//! happens afterwards, in the pipeline.

use async_trait::async_trait;
use thiserror::Error;

use crate::llm::{LlmError, TokenUsage, ToolDefinition};
use crate::pipeline::Stage;
use crate::prompts::{InstructionContext, PromptError, PromptLoader};

mod llm_runner;
mod scripted;

pub use llm_runner::{LlmAgentRunner, extract_output};
pub use scripted::{RecordedCall, ScriptedReply, ScriptedRunner};

/// Errors from a single agent call
#[derive(Debug, Error)]
pub enum AgentError {
    /// The response was malformed, incomplete, or carried no structured output
    #[error("{agent} returned an invalid response: {reason}")]
    Validation { agent: String, reason: String },

    /// The external call itself failed
    #[error("Agent call failed: {0}")]
    Transport(#[from] LlmError),
}

impl AgentError {
    pub fn validation(agent: impl Into<String>, reason: impl Into<String>) -> Self {
        AgentError::Validation {
            agent: agent.into(),
            reason: reason.into(),
        }
    }
}

/// Everything a runner needs to perform one stage's call
#[derive(Debug, Clone)]
pub struct AgentDescriptor {
    pub stage: Stage,
    pub name: String,
    /// Rendered stage instructions (system prompt)
    pub instructions: String,
    /// The single tool the model submits its record through
    pub output_tool: ToolDefinition,
}

impl AgentDescriptor {
    /// Build the descriptor for a stage, rendering its instruction template
    pub fn for_stage(stage: Stage, prompts: &PromptLoader) -> Result<Self, PromptError> {
        let ctx = InstructionContext {
            agent: stage.agent_name().to_string(),
            output_tool: stage.output_tool().to_string(),
            record: stage.record_name().to_string(),
        };
        let instructions = prompts.render(stage.template(), &ctx)?;

        Ok(Self {
            stage,
            name: stage.agent_name().to_string(),
            instructions,
            output_tool: ToolDefinition::new(
                stage.output_tool(),
                format!("Submit the completed {} for this stage", stage.record_name()),
                (stage.spec().schema)(),
            ),
        })
    }
}

/// Raw output of one agent call
#[derive(Debug, Clone)]
pub struct AgentOutput {
    pub value: serde_json::Value,
    pub usage: TokenUsage,
}

impl AgentOutput {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value,
            usage: TokenUsage::default(),
        }
    }
}

/// Performs a stage's external call
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, agent: &AgentDescriptor, input: &str) -> Result<AgentOutput, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_for_stage() {
        let loader = PromptLoader::embedded_only();
        let desc = AgentDescriptor::for_stage(Stage::Roadmap, &loader).unwrap();

        assert_eq!(desc.name, "RoadmapPlannerAgent");
        assert_eq!(desc.output_tool.name, "submit_roadmap");
        assert_eq!(desc.output_tool.input_schema["type"], "object");
        assert!(desc.instructions.contains("`submit_roadmap`"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = AgentError::validation("CalendarAgent", "no structured output");
        assert_eq!(err.to_string(), "CalendarAgent returned an invalid response: no structured output");
    }
}
