use thiserror::Error;

use super::stage::Stage;
use crate::agent::AgentError;
use crate::prompts::PromptError;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: AgentError,
    },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Stage '{stage}' needs the {needs} record, which has not been produced")]
    MissingPrior { stage: Stage, needs: &'static str },
}

impl PipelineError {
    /// Stage the error is attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Stage { stage, .. } | PipelineError::MissingPrior { stage, .. } => Some(*stage),
            PipelineError::Prompt(_) => None,
        }
    }
}
