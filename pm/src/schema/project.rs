//! Project input record produced by the first stage

use serde::{Deserialize, Serialize};

use super::{Finding, Record, check_date_range, check_non_negative, string_array};

/// A person available to the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub hourly_rate: f64,
    pub available_hours_per_week: f64,
}

/// Root input for every later stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInputData {
    pub project_name: String,
    /// As written by the model; expected `YYYY-MM-DD`
    pub start_date: String,
    pub end_date: String,
    pub team_members: Vec<TeamMember>,
    pub total_budget_hours: f64,
    pub total_budget_cost: f64,
    pub constraints: Vec<String>,
}

impl ProjectInputData {
    /// Team member names in roster order
    pub fn member_names(&self) -> Vec<&str> {
        self.team_members.iter().map(|m| m.name.as_str()).collect()
    }
}

impl Record for ProjectInputData {
    const NAME: &'static str = "ProjectInputData";

    fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "project_name": { "type": "string", "description": "Short project name" },
                "start_date": { "type": "string", "format": "date", "description": "Start date, YYYY-MM-DD" },
                "end_date": { "type": "string", "format": "date", "description": "End date, YYYY-MM-DD" },
                "team_members": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "role": { "type": "string" },
                            "hourly_rate": { "type": "number", "description": "Cost per hour" },
                            "available_hours_per_week": { "type": "number" }
                        },
                        "required": ["name", "role", "hourly_rate", "available_hours_per_week"]
                    }
                },
                "total_budget_hours": { "type": "number" },
                "total_budget_cost": { "type": "number" },
                "constraints": string_array("Specific constraints or requirements")
            },
            "required": [
                "project_name", "start_date", "end_date", "team_members",
                "total_budget_hours", "total_budget_cost", "constraints"
            ]
        })
    }

    fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        check_date_range(&mut findings, "", &self.start_date, &self.end_date);
        check_non_negative(&mut findings, "total_budget_hours".to_string(), self.total_budget_hours);
        check_non_negative(&mut findings, "total_budget_cost".to_string(), self.total_budget_cost);
        for (i, member) in self.team_members.iter().enumerate() {
            check_non_negative(&mut findings, format!("team_members[{}].hourly_rate", i), member.hourly_rate);
            check_non_negative(
                &mut findings,
                format!("team_members[{}].available_hours_per_week", i),
                member.available_hours_per_week,
            );
        }
        findings
    }
}
