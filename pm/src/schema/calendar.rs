//! Calendar plan record

use serde::{Deserialize, Serialize};

use super::{Finding, Record, string_array};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub attendees: Vec<String>,
    pub event_type: String,
    pub description: String,
    /// Recurrence rule (e.g. an RRULE), absent for one-off events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarPlan {
    pub scheduled_events: Vec<CalendarEvent>,
    pub unresolved_conflicts: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Record for CalendarPlan {
    const NAME: &'static str = "CalendarPlan";

    fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "scheduled_events": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "start_time": { "type": "string", "description": "ISO 8601 date-time" },
                            "end_time": { "type": "string", "description": "ISO 8601 date-time" },
                            "attendees": string_array("Attendee names"),
                            "event_type": { "type": "string" },
                            "description": { "type": "string" },
                            "recurrence": { "type": "string", "description": "Optional recurrence rule" }
                        },
                        "required": ["title", "start_time", "end_time", "attendees", "event_type", "description"]
                    }
                },
                "unresolved_conflicts": string_array("Scheduling conflicts that could not be resolved"),
                "recommendations": string_array("Suggestions such as alternative times")
            },
            "required": ["scheduled_events", "unresolved_conflicts", "recommendations"]
        })
    }

    fn findings(&self) -> Vec<Finding> {
        self.scheduled_events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attendees.is_empty())
            .map(|(i, e)| {
                Finding::new(
                    format!("scheduled_events[{}].attendees", i),
                    format!("event '{}' has no attendees", e.title),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::decode;

    #[test]
    fn test_recurrence_is_optional() {
        let plan: CalendarPlan = decode(serde_json::json!({
            "scheduled_events": [
                {
                    "title": "Kickoff",
                    "start_time": "2024-01-02T09:00:00",
                    "end_time": "2024-01-02T10:00:00",
                    "attendees": ["Ana"],
                    "event_type": "milestone_review",
                    "description": "Kick off the project"
                },
                {
                    "title": "Standup",
                    "start_time": "2024-01-02T09:30:00",
                    "end_time": "2024-01-02T09:45:00",
                    "attendees": [],
                    "event_type": "standup",
                    "description": "Daily sync",
                    "recurrence": "FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR"
                }
            ],
            "unresolved_conflicts": [],
            "recommendations": ["Keep standups short"]
        }))
        .unwrap();

        assert!(plan.scheduled_events[0].recurrence.is_none());
        assert!(plan.scheduled_events[1].recurrence.is_some());

        let findings = plan.findings();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "scheduled_events[1].attendees");
    }
}
