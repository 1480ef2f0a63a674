//! Plain-text plan summary

use std::fmt::Write;

use super::state::PipelineOutcome;

/// Render the console summary of a completed run
pub fn render_text(outcome: &PipelineOutcome) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_summary(&mut out, outcome);
    out
}

fn write_summary(out: &mut String, outcome: &PipelineOutcome) -> std::fmt::Result {
    let input = &outcome.input;
    writeln!(out, "=== Project Plan Summary ===")?;
    writeln!(out)?;
    writeln!(out, "Project: {}", input.project_name)?;
    writeln!(out, "Timeline: {} to {}", input.start_date, input.end_date)?;
    writeln!(out)?;
    writeln!(out, "Team Members:")?;
    for member in &input.team_members {
        writeln!(out, "- {} ({})", member.name, member.role)?;
    }

    writeln!(out)?;
    writeln!(out, "=== Roadmap ===")?;
    writeln!(out, "Total Phases: {}", outcome.roadmap.phases.len())?;
    writeln!(out, "Total Epics: {}", outcome.roadmap.epics.len())?;

    writeln!(out)?;
    writeln!(out, "=== Sprint Plan ===")?;
    writeln!(out, "Total Sprints: {}", outcome.sessions.total_sprints)?;
    writeln!(out, "Recurring Events:")?;
    for event in &outcome.sessions.recurring_events {
        writeln!(out, "- {} ({})", event.event_type, event.frequency)?;
    }

    writeln!(out)?;
    writeln!(out, "=== Calendar ===")?;
    writeln!(out, "Scheduled Events: {}", outcome.calendar.scheduled_events.len())?;

    if !outcome.calendar.unresolved_conflicts.is_empty() {
        writeln!(out)?;
        writeln!(out, "Unresolved Conflicts:")?;
        for conflict in &outcome.calendar.unresolved_conflicts {
            writeln!(out, "- {}", conflict)?;
        }
    }

    if !outcome.findings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Notes:")?;
        for note in &outcome.findings {
            writeln!(out, "- [{}] {}", note.stage, note.finding)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TokenUsage;
    use crate::pipeline::{Stage, StageFinding};
    use crate::schema::*;

    fn date(m: u32, d: u32) -> String {
        format!("2024-{:02}-{:02}", m, d)
    }

    fn outcome() -> PipelineOutcome {
        PipelineOutcome {
            trace_id: "trace".to_string(),
            input: ProjectInputData {
                project_name: "Alpha".to_string(),
                start_date: date(1, 1),
                end_date: date(3, 31),
                team_members: vec![
                    TeamMember {
                        name: "Ana".to_string(),
                        role: "PM".to_string(),
                        hourly_rate: 80.0,
                        available_hours_per_week: 30.0,
                    },
                    TeamMember {
                        name: "Ben".to_string(),
                        role: "Developer".to_string(),
                        hourly_rate: 70.0,
                        available_hours_per_week: 40.0,
                    },
                ],
                total_budget_hours: 500.0,
                total_budget_cost: 40000.0,
                constraints: vec![],
            },
            roadmap: ProjectRoadmap {
                phases: vec!["Discovery".to_string(), "Build".to_string()],
                epics: vec![],
                total_estimated_hours: 480.0,
                risk_factors: vec![],
            },
            sessions: SessionPlan {
                sprints: vec![],
                recurring_events: vec![
                    SessionEvent {
                        event_type: SessionEventType::Standup,
                        duration_minutes: 15,
                        required_attendees: vec![],
                        frequency: EventFrequency::Daily,
                        description: String::new(),
                    },
                    SessionEvent {
                        event_type: SessionEventType::MilestoneReview,
                        duration_minutes: 60,
                        required_attendees: vec![],
                        frequency: EventFrequency::BiWeekly,
                        description: String::new(),
                    },
                ],
                milestones: vec![],
                total_sprints: 6,
            },
            calendar: CalendarPlan {
                scheduled_events: vec![],
                unresolved_conflicts: vec![],
                recommendations: vec![],
            },
            findings: vec![],
            usage: TokenUsage::default(),
        }
    }

    #[test]
    fn test_render_text_exact() {
        let expected = "\
=== Project Plan Summary ===

Project: Alpha
Timeline: 2024-01-01 to 2024-03-31

Team Members:
- Ana (PM)
- Ben (Developer)

=== Roadmap ===
Total Phases: 2
Total Epics: 0

=== Sprint Plan ===
Total Sprints: 6
Recurring Events:
- standup (daily)
- milestone_review (bi-weekly)

=== Calendar ===
Scheduled Events: 0
";
        assert_eq!(render_text(&outcome()), expected);
    }

    #[test]
    fn test_render_text_conflicts_and_notes() {
        let mut outcome = outcome();
        outcome.calendar.unresolved_conflicts = vec!["Ana double-booked on Monday".to_string()];
        outcome.findings = vec![StageFinding {
            stage: Stage::Sessions,
            finding: Finding::new("total_sprints", "is 6 but 0 sprints are listed"),
        }];

        let text = render_text(&outcome);
        assert!(text.ends_with(
            "Scheduled Events: 0\n\nUnresolved Conflicts:\n- Ana double-booked on Monday\n\nNotes:\n- [sessions] total_sprints: is 6 but 0 sprints are listed\n"
        ));
    }
}
