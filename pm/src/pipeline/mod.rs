//! Staged planning pipeline
//!
//! brief -> ProjectInputData -> ProjectRoadmap -> SessionPlan -> CalendarPlan

pub mod context;
mod driver;
mod error;
mod stage;
mod state;
pub mod summary;

pub use driver::Pipeline;
pub use error::PipelineError;
pub use stage::{STAGES, Stage, StageRecord, StageSpec};
pub use state::{PipelineOutcome, PipelineState, StageFinding};
