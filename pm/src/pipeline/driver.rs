//! Pipeline driver
//!
//! Walks [`STAGES`] in order. For each stage: project the context from the
//! accumulated state, call the agent, decode and store the record. The first
//! failure ends the run.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::PipelineError;
use super::stage::{STAGES, StageSpec};
use super::state::{PipelineOutcome, PipelineState};
use crate::agent::{AgentDescriptor, AgentError, AgentRunner};
use crate::progress::ProgressReporter;
use crate::prompts::PromptLoader;

/// Runs the four planning stages against an agent runner
pub struct Pipeline {
    runner: Arc<dyn AgentRunner>,
    reporter: Arc<dyn ProgressReporter>,
    /// One descriptor per entry of `STAGES`, same order
    agents: Vec<AgentDescriptor>,
}

impl Pipeline {
    /// Build a pipeline, rendering every stage's instructions up front
    pub fn new(
        runner: Arc<dyn AgentRunner>,
        reporter: Arc<dyn ProgressReporter>,
        prompts: &PromptLoader,
    ) -> Result<Self, PipelineError> {
        let agents = STAGES
            .iter()
            .map(|spec| AgentDescriptor::for_stage(spec.stage, prompts))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            runner,
            reporter,
            agents,
        })
    }

    /// Run every stage in order
    ///
    /// Returns the outcome only when all four stages succeed. A stage failure
    /// is returned as-is and no later stage is attempted.
    pub async fn run(&self, brief: &str) -> Result<PipelineOutcome, PipelineError> {
        let trace_id = Uuid::now_v7().to_string();
        info!(%trace_id, brief_len = brief.len(), "Pipeline::run: starting");
        self.reporter.run_started(&trace_id);

        let mut state = PipelineState::new(brief);
        for (spec, agent) in STAGES.iter().zip(&self.agents) {
            if let Err(e) = self.run_stage(spec, agent, &mut state).await {
                warn!(%trace_id, stage = %spec.stage, error = %e, "Pipeline::run: aborting");
                self.reporter.stage_failed(spec.stage, &e.to_string());
                return Err(e);
            }
        }

        let outcome = state.finish(trace_id)?;
        info!(
            trace_id = %outcome.trace_id,
            findings = outcome.findings.len(),
            input_tokens = outcome.usage.input_tokens,
            output_tokens = outcome.usage.output_tokens,
            "Pipeline::run: complete"
        );
        self.reporter.run_finished();
        Ok(outcome)
    }

    async fn run_stage(
        &self,
        spec: &StageSpec,
        agent: &AgentDescriptor,
        state: &mut PipelineState,
    ) -> Result<(), PipelineError> {
        let stage = spec.stage;
        let context = (spec.project)(state)?;
        debug!(%stage, context_len = context.len(), "Pipeline::run_stage: projected context");

        self.reporter.stage_started(stage, stage.progress_message());

        let output = self
            .runner
            .run(agent, &context)
            .await
            .map_err(|source| PipelineError::Stage { stage, source })?;
        state.usage.add(&output.usage);

        let findings = (spec.accept)(state, output.value).map_err(|e| PipelineError::Stage {
            stage,
            source: AgentError::validation(&agent.name, e.to_string()),
        })?;
        for finding in findings {
            warn!(%stage, %finding, "Stage output finding");
            state.findings.push((stage, finding));
        }

        self.reporter.stage_completed(stage);
        Ok(())
    }
}
