//! Stage identities and the ordered stage table

use serde::Serialize;
use tracing::debug;

use super::context;
use super::error::PipelineError;
use super::state::PipelineState;
use crate::schema::{
    CalendarPlan, Finding, ProjectInputData, ProjectRoadmap, Record, SchemaError, SessionPlan, decode,
};

/// One step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ProjectInput,
    Roadmap,
    Sessions,
    Calendar,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 4] = [Stage::ProjectInput, Stage::Roadmap, Stage::Sessions, Stage::Calendar];

    /// Short key used in progress output and fixture files
    pub fn key(&self) -> &'static str {
        match self {
            Stage::ProjectInput => "input",
            Stage::Roadmap => "roadmap",
            Stage::Sessions => "sessions",
            Stage::Calendar => "calendar",
        }
    }

    pub fn agent_name(&self) -> &'static str {
        match self {
            Stage::ProjectInput => "ProjectInputAgent",
            Stage::Roadmap => "RoadmapPlannerAgent",
            Stage::Sessions => "SessionPlannerAgent",
            Stage::Calendar => "CalendarAgent",
        }
    }

    /// Tool the model calls to hand back this stage's record
    pub fn output_tool(&self) -> &'static str {
        match self {
            Stage::ProjectInput => "submit_project_input",
            Stage::Roadmap => "submit_roadmap",
            Stage::Sessions => "submit_session_plan",
            Stage::Calendar => "submit_calendar_plan",
        }
    }

    /// Prompt template name
    pub fn template(&self) -> &'static str {
        match self {
            Stage::ProjectInput => "project_input",
            Stage::Roadmap => "roadmap",
            Stage::Sessions => "sessions",
            Stage::Calendar => "calendar",
        }
    }

    pub fn record_name(&self) -> &'static str {
        match self {
            Stage::ProjectInput => ProjectInputData::NAME,
            Stage::Roadmap => ProjectRoadmap::NAME,
            Stage::Sessions => SessionPlan::NAME,
            Stage::Calendar => CalendarPlan::NAME,
        }
    }

    /// Status line shown while the stage runs
    pub fn progress_message(&self) -> &'static str {
        match self {
            Stage::ProjectInput => "Gathering project information...",
            Stage::Roadmap => "Planning project roadmap...",
            Stage::Sessions => "Planning sprint sessions...",
            Stage::Calendar => "Coordinating calendars...",
        }
    }

    /// The table entry describing how this stage runs
    pub fn spec(&self) -> &'static StageSpec {
        &STAGES[*self as usize]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "input" | "project_input" => Ok(Stage::ProjectInput),
            "roadmap" => Ok(Stage::Roadmap),
            "sessions" | "session" | "session_plan" => Ok(Stage::Sessions),
            "calendar" | "calendar_plan" => Ok(Stage::Calendar),
            _ => Err(format!(
                "Unknown stage: {}. Use: input, roadmap, sessions, or calendar",
                s
            )),
        }
    }
}

/// How one stage builds its context and stores its result
pub struct StageSpec {
    pub stage: Stage,
    /// JSON schema of the stage's record
    pub schema: fn() -> serde_json::Value,
    /// Context projection from the accumulated state
    pub project: fn(&PipelineState) -> Result<String, PipelineError>,
    /// Decode the external value, store the record, return its findings
    pub accept: fn(&mut PipelineState, serde_json::Value) -> Result<Vec<Finding>, SchemaError>,
}

/// The pipeline, in execution order
pub static STAGES: [StageSpec; 4] = [
    StageSpec {
        stage: Stage::ProjectInput,
        schema: ProjectInputData::json_schema,
        project: project_input_context,
        accept: accept::<ProjectInputData>,
    },
    StageSpec {
        stage: Stage::Roadmap,
        schema: ProjectRoadmap::json_schema,
        project: roadmap_context,
        accept: accept::<ProjectRoadmap>,
    },
    StageSpec {
        stage: Stage::Sessions,
        schema: SessionPlan::json_schema,
        project: sessions_context,
        accept: accept::<SessionPlan>,
    },
    StageSpec {
        stage: Stage::Calendar,
        schema: CalendarPlan::json_schema,
        project: calendar_context,
        accept: accept::<CalendarPlan>,
    },
];

/// A record with a home in the pipeline state
pub trait StageRecord: Record {
    fn slot(state: &mut PipelineState) -> &mut Option<Self>;
}

impl StageRecord for ProjectInputData {
    fn slot(state: &mut PipelineState) -> &mut Option<Self> {
        &mut state.input
    }
}

impl StageRecord for ProjectRoadmap {
    fn slot(state: &mut PipelineState) -> &mut Option<Self> {
        &mut state.roadmap
    }
}

impl StageRecord for SessionPlan {
    fn slot(state: &mut PipelineState) -> &mut Option<Self> {
        &mut state.sessions
    }
}

impl StageRecord for CalendarPlan {
    fn slot(state: &mut PipelineState) -> &mut Option<Self> {
        &mut state.calendar
    }
}

fn accept<T: StageRecord>(state: &mut PipelineState, value: serde_json::Value) -> Result<Vec<Finding>, SchemaError> {
    let record: T = decode(value)?;
    let findings = record.findings();
    debug!(record = T::NAME, findings = findings.len(), "accept: stored record");
    *T::slot(state) = Some(record);
    Ok(findings)
}

fn project_input_context(state: &PipelineState) -> Result<String, PipelineError> {
    Ok(state.brief.clone())
}

fn roadmap_context(state: &PipelineState) -> Result<String, PipelineError> {
    let input = state.require_input(Stage::Roadmap)?;
    Ok(context::roadmap_context(input))
}

fn sessions_context(state: &PipelineState) -> Result<String, PipelineError> {
    let input = state.require_input(Stage::Sessions)?;
    let roadmap = state.require_roadmap(Stage::Sessions)?;
    Ok(context::sessions_context(roadmap, input))
}

fn calendar_context(state: &PipelineState) -> Result<String, PipelineError> {
    let input = state.require_input(Stage::Calendar)?;
    let sessions = state.require_sessions(Stage::Calendar)?;
    Ok(context::calendar_context(sessions, input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_table_is_in_order() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(STAGES[i].stage, *stage);
            assert_eq!(stage.spec().stage, *stage);
        }
    }

    #[test]
    fn test_stage_from_str() {
        assert_eq!("input".parse::<Stage>().unwrap(), Stage::ProjectInput);
        assert_eq!("project-input".parse::<Stage>().unwrap(), Stage::ProjectInput);
        assert_eq!("Roadmap".parse::<Stage>().unwrap(), Stage::Roadmap);
        assert_eq!("sessions".parse::<Stage>().unwrap(), Stage::Sessions);
        assert_eq!("calendar".parse::<Stage>().unwrap(), Stage::Calendar);
        assert!("deploy".parse::<Stage>().is_err());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Roadmap.agent_name(), "RoadmapPlannerAgent");
        assert_eq!(Stage::Sessions.output_tool(), "submit_session_plan");
        assert_eq!(Stage::Calendar.record_name(), "CalendarPlan");
        assert_eq!(Stage::ProjectInput.to_string(), "input");
    }

    #[test]
    fn test_schemas_are_objects_with_required_fields() {
        for spec in &STAGES {
            let schema = (spec.schema)();
            assert_eq!(schema["type"], "object", "{}", spec.stage);
            assert!(schema["required"].as_array().is_some_and(|r| !r.is_empty()));
        }
    }

    #[test]
    fn test_project_input_context_is_the_brief() {
        let state = PipelineState::new("Plan a bakery website");
        assert_eq!((Stage::ProjectInput.spec().project)(&state).unwrap(), "Plan a bakery website");
    }

    #[test]
    fn test_projection_without_prior_output_is_an_error() {
        let state = PipelineState::new("brief");
        let err = (Stage::Sessions.spec().project)(&state).unwrap_err();
        assert!(matches!(err, PipelineError::MissingPrior { .. }));
    }
}
