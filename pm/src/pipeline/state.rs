//! Accumulated pipeline state and the finished outcome

use serde::Serialize;

use super::error::PipelineError;
use super::stage::Stage;
use crate::llm::TokenUsage;
use crate::schema::{CalendarPlan, Finding, ProjectInputData, ProjectRoadmap, Record, SessionPlan};

/// Everything produced so far in one run
///
/// Each slot is filled exactly once, in stage order. Later stages read the
/// earlier slots through projections and never modify them.
#[derive(Debug, Default)]
pub struct PipelineState {
    pub brief: String,
    pub input: Option<ProjectInputData>,
    pub roadmap: Option<ProjectRoadmap>,
    pub sessions: Option<SessionPlan>,
    pub calendar: Option<CalendarPlan>,
    pub findings: Vec<(Stage, Finding)>,
    pub usage: TokenUsage,
}

impl PipelineState {
    pub fn new(brief: impl Into<String>) -> Self {
        Self {
            brief: brief.into(),
            ..Default::default()
        }
    }

    pub fn require_input(&self, stage: Stage) -> Result<&ProjectInputData, PipelineError> {
        self.input.as_ref().ok_or(PipelineError::MissingPrior {
            stage,
            needs: ProjectInputData::NAME,
        })
    }

    pub fn require_roadmap(&self, stage: Stage) -> Result<&ProjectRoadmap, PipelineError> {
        self.roadmap.as_ref().ok_or(PipelineError::MissingPrior {
            stage,
            needs: ProjectRoadmap::NAME,
        })
    }

    pub fn require_sessions(&self, stage: Stage) -> Result<&SessionPlan, PipelineError> {
        self.sessions.as_ref().ok_or(PipelineError::MissingPrior {
            stage,
            needs: SessionPlan::NAME,
        })
    }

    /// Convert a fully populated state into the run outcome
    pub fn finish(self, trace_id: String) -> Result<PipelineOutcome, PipelineError> {
        let missing = |needs| PipelineError::MissingPrior {
            stage: Stage::Calendar,
            needs,
        };
        Ok(PipelineOutcome {
            trace_id,
            input: self.input.ok_or_else(|| missing(ProjectInputData::NAME))?,
            roadmap: self.roadmap.ok_or_else(|| missing(ProjectRoadmap::NAME))?,
            sessions: self.sessions.ok_or_else(|| missing(SessionPlan::NAME))?,
            calendar: self.calendar.ok_or_else(|| missing(CalendarPlan::NAME))?,
            findings: self
                .findings
                .into_iter()
                .map(|(stage, finding)| StageFinding { stage, finding })
                .collect(),
            usage: self.usage,
        })
    }
}

/// A finding tagged with the stage whose output produced it
#[derive(Debug, Clone, Serialize)]
pub struct StageFinding {
    pub stage: Stage,
    #[serde(flatten)]
    pub finding: Finding,
}

/// Result of a run in which every stage completed
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub trace_id: String,
    pub input: ProjectInputData,
    pub roadmap: ProjectRoadmap,
    pub sessions: SessionPlan,
    pub calendar: CalendarPlan,
    pub findings: Vec<StageFinding>,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_the_missing_record() {
        let state = PipelineState::new("brief");
        match state.require_roadmap(Stage::Sessions) {
            Err(PipelineError::MissingPrior { stage, needs }) => {
                assert_eq!(stage, Stage::Sessions);
                assert_eq!(needs, "ProjectRoadmap");
            }
            other => panic!("expected MissingPrior, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_requires_every_record() {
        let state = PipelineState::new("brief");
        assert!(matches!(
            state.finish("trace".to_string()),
            Err(PipelineError::MissingPrior { .. })
        ));
    }
}
