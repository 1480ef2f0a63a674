//! Progress reporting
//!
//! The pipeline announces stage boundaries to a [`ProgressReporter`]. A
//! reporter only observes: it returns nothing and cannot change the outcome
//! of a stage.

use std::sync::Mutex;

use colored::Colorize;
use tracing::{error, info};

use crate::pipeline::Stage;

/// Receives pipeline lifecycle notifications
pub trait ProgressReporter: Send + Sync {
    fn run_started(&self, trace_id: &str);
    fn stage_started(&self, stage: Stage, message: &str);
    fn stage_completed(&self, stage: Stage);
    fn stage_failed(&self, stage: Stage, error: &str);
    fn run_finished(&self);
}

/// Colored status lines on stderr
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn run_started(&self, trace_id: &str) {
        eprintln!("{}", format!("trace: {}", trace_id).dimmed());
    }

    fn stage_started(&self, _stage: Stage, message: &str) {
        eprintln!("{}", message.cyan());
    }

    fn stage_completed(&self, stage: Stage) {
        eprintln!("{} {}", "✓".green(), stage.agent_name());
    }

    fn stage_failed(&self, stage: Stage, error: &str) {
        eprintln!("{} {}: {}", "✗".red(), stage.agent_name(), error);
    }

    fn run_finished(&self) {
        eprintln!();
    }
}

/// Logs lifecycle events only; nothing reaches the console
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn run_started(&self, trace_id: &str) {
        info!(%trace_id, "Pipeline run started");
    }

    fn stage_started(&self, stage: Stage, message: &str) {
        info!(%stage, "{}", message);
    }

    fn stage_completed(&self, stage: Stage) {
        info!(%stage, "Stage completed");
    }

    fn stage_failed(&self, stage: Stage, error: &str) {
        error!(%stage, %error, "Stage failed");
    }

    fn run_finished(&self) {
        info!("Pipeline run finished");
    }
}

/// A lifecycle event captured by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    RunStarted(String),
    StageStarted(Stage, String),
    StageCompleted(Stage),
    StageFailed(Stage, String),
    RunFinished,
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl ProgressReporter for RecordingReporter {
    fn run_started(&self, trace_id: &str) {
        self.push(ProgressEvent::RunStarted(trace_id.to_string()));
    }

    fn stage_started(&self, stage: Stage, message: &str) {
        self.push(ProgressEvent::StageStarted(stage, message.to_string()));
    }

    fn stage_completed(&self, stage: Stage) {
        self.push(ProgressEvent::StageCompleted(stage));
    }

    fn stage_failed(&self, stage: Stage, error: &str) {
        self.push(ProgressEvent::StageFailed(stage, error.to_string()));
    }

    fn run_finished(&self) {
        self.push(ProgressEvent::RunFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.run_started("trace-1");
        reporter.stage_started(Stage::ProjectInput, "Gathering project information...");
        reporter.stage_completed(Stage::ProjectInput);
        reporter.stage_failed(Stage::Roadmap, "boom");

        assert_eq!(
            reporter.events(),
            vec![
                ProgressEvent::RunStarted("trace-1".to_string()),
                ProgressEvent::StageStarted(Stage::ProjectInput, "Gathering project information...".to_string()),
                ProgressEvent::StageCompleted(Stage::ProjectInput),
                ProgressEvent::StageFailed(Stage::Roadmap, "boom".to_string()),
            ]
        );
    }
}
