//! Agent runner backed by a live LLM client

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{AgentDescriptor, AgentError, AgentOutput, AgentRunner};
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, Message, StopReason};

/// Runs each stage as a single forced-tool completion
pub struct LlmAgentRunner {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl LlmAgentRunner {
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    fn build_request(&self, agent: &AgentDescriptor, input: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: agent.instructions.clone(),
            messages: vec![Message::user(input)],
            tools: vec![agent.output_tool.clone()],
            forced_tool: Some(agent.output_tool.name.clone()),
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl AgentRunner for LlmAgentRunner {
    async fn run(&self, agent: &AgentDescriptor, input: &str) -> Result<AgentOutput, AgentError> {
        debug!(agent = %agent.name, input_len = input.len(), model = %self.llm.model(), "LlmAgentRunner::run: called");

        let response = self.llm.complete(self.build_request(agent, input)).await?;
        info!(
            agent = %agent.name,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            cost_usd = response.usage.cost_usd(self.llm.model()),
            "Agent call completed"
        );

        if response.stop_reason == StopReason::MaxTokens {
            warn!(agent = %agent.name, "LlmAgentRunner::run: response hit max tokens");
        }

        let value = extract_output(&response, &agent.output_tool.name)
            .ok_or_else(|| AgentError::validation(&agent.name, missing_output_reason(&response, &agent.output_tool.name)))?;

        Ok(AgentOutput {
            value,
            usage: response.usage,
        })
    }
}

/// Pull the structured value out of a response
///
/// Prefers the first call to `tool`; otherwise parses the text content as a
/// JSON object, either bare or inside a fenced code block.
pub fn extract_output(response: &CompletionResponse, tool: &str) -> Option<serde_json::Value> {
    if let Some(call) = response.tool_call(tool) {
        return Some(call.input.clone());
    }

    let text = response.content.as_deref()?.trim();
    parse_object(text).or_else(|| fenced_block(text).and_then(parse_object))
}

fn parse_object(text: &str) -> Option<serde_json::Value> {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .filter(|v| v.is_object())
}

/// Body of the first ``` fenced block, skipping an optional language tag
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let body_start = rest.find('\n')? + 1;
    let body = &rest[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn missing_output_reason(response: &CompletionResponse, tool: &str) -> String {
    match (&response.content, response.tool_calls.is_empty()) {
        (_, false) => format!(
            "expected a call to '{}', got: {}",
            tool,
            response
                .tool_calls
                .iter()
                .map(|tc| tc.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        (Some(text), true) if !text.trim().is_empty() => {
            format!("no '{}' call and the text reply is not a JSON object", tool)
        }
        _ => "response contained no structured output".to_string(),
    }
}
