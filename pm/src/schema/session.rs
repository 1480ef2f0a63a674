//! Session plan record: sprints and recurring ceremonies

use serde::{Deserialize, Serialize};

use super::{Finding, Record, check_date_range, check_non_negative, string_array, whole_number};

/// Kind of recurring ceremony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventType {
    Standup,
    SprintPlanning,
    BacklogRefinement,
    MilestoneReview,
}

impl SessionEventType {
    pub const ALL: [SessionEventType; 4] = [
        SessionEventType::Standup,
        SessionEventType::SprintPlanning,
        SessionEventType::BacklogRefinement,
        SessionEventType::MilestoneReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEventType::Standup => "standup",
            SessionEventType::SprintPlanning => "sprint_planning",
            SessionEventType::BacklogRefinement => "backlog_refinement",
            SessionEventType::MilestoneReview => "milestone_review",
        }
    }
}

impl std::fmt::Display for SessionEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a ceremony happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFrequency {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "bi-weekly", alias = "biweekly", alias = "bi_weekly")]
    BiWeekly,
    #[serde(rename = "once")]
    Once,
}

impl EventFrequency {
    pub const ALL: [EventFrequency; 4] = [
        EventFrequency::Daily,
        EventFrequency::Weekly,
        EventFrequency::BiWeekly,
        EventFrequency::Once,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventFrequency::Daily => "daily",
            EventFrequency::Weekly => "weekly",
            EventFrequency::BiWeekly => "bi-weekly",
            EventFrequency::Once => "once",
        }
    }
}

impl std::fmt::Display for EventFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_type: SessionEventType,
    #[serde(deserialize_with = "whole_number")]
    pub duration_minutes: u32,
    pub required_attendees: Vec<String>,
    pub frequency: EventFrequency,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    #[serde(deserialize_with = "whole_number")]
    pub sprint_number: u32,
    pub start_date: String,
    pub end_date: String,
    /// Story titles from the roadmap
    pub stories: Vec<String>,
    pub planned_hours: f64,
    pub team_members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub sprints: Vec<Sprint>,
    pub recurring_events: Vec<SessionEvent>,
    pub milestones: Vec<String>,
    /// Expected to equal `sprints.len()`
    #[serde(deserialize_with = "whole_number")]
    pub total_sprints: u32,
}

impl SessionPlan {
    /// Sum of planned hours over all sprints
    pub fn planned_hours(&self) -> f64 {
        self.sprints.iter().map(|s| s.planned_hours).sum()
    }

    /// Event types of the recurring ceremonies, in plan order
    pub fn event_types(&self) -> Vec<SessionEventType> {
        self.recurring_events.iter().map(|e| e.event_type).collect()
    }
}

impl Record for SessionPlan {
    const NAME: &'static str = "SessionPlan";

    fn json_schema() -> serde_json::Value {
        let event_types: Vec<&str> = SessionEventType::ALL.iter().map(|t| t.as_str()).collect();
        let frequencies: Vec<&str> = EventFrequency::ALL.iter().map(|f| f.as_str()).collect();
        serde_json::json!({
            "type": "object",
            "properties": {
                "sprints": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "sprint_number": { "type": "integer" },
                            "start_date": { "type": "string", "format": "date", "description": "YYYY-MM-DD" },
                            "end_date": { "type": "string", "format": "date", "description": "YYYY-MM-DD" },
                            "stories": string_array("Titles of roadmap stories in this sprint"),
                            "planned_hours": { "type": "number" },
                            "team_members": string_array("Names of participating team members")
                        },
                        "required": [
                            "sprint_number", "start_date", "end_date",
                            "stories", "planned_hours", "team_members"
                        ]
                    }
                },
                "recurring_events": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "event_type": { "type": "string", "enum": event_types },
                            "duration_minutes": { "type": "integer" },
                            "required_attendees": string_array("Names of required attendees"),
                            "frequency": { "type": "string", "enum": frequencies },
                            "description": { "type": "string" }
                        },
                        "required": [
                            "event_type", "duration_minutes", "required_attendees",
                            "frequency", "description"
                        ]
                    }
                },
                "milestones": string_array("Milestone labels"),
                "total_sprints": { "type": "integer" }
            },
            "required": ["sprints", "recurring_events", "milestones", "total_sprints"]
        })
    }

    fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        if self.total_sprints as usize != self.sprints.len() {
            findings.push(Finding::new(
                "total_sprints",
                format!(
                    "total_sprints is {} but {} sprints are listed",
                    self.total_sprints,
                    self.sprints.len()
                ),
            ));
        }
        for (i, sprint) in self.sprints.iter().enumerate() {
            check_date_range(
                &mut findings,
                &format!("sprints[{}].", i),
                &sprint.start_date,
                &sprint.end_date,
            );
            check_non_negative(&mut findings, format!("sprints[{}].planned_hours", i), sprint.planned_hours);
        }
        findings
    }
}
