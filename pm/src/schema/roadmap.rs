//! Roadmap record: phases, epics and stories

use serde::{Deserialize, Serialize};

use super::{Finding, Record, check_non_negative, string_array, whole_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub description: String,
    pub estimated_hours: f64,
    pub assigned_to: String,
    /// Titles of stories this one waits on
    pub dependencies: Vec<String>,
    #[serde(deserialize_with = "whole_number")]
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    pub title: String,
    pub description: String,
    pub stories: Vec<Story>,
    /// Expected to be one of [`ProjectRoadmap::phases`]
    pub phase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRoadmap {
    pub phases: Vec<String>,
    pub epics: Vec<Epic>,
    pub total_estimated_hours: f64,
    pub risk_factors: Vec<String>,
}

impl ProjectRoadmap {
    /// Number of stories across all epics
    pub fn story_count(&self) -> usize {
        self.epics.iter().map(|e| e.stories.len()).sum()
    }
}

impl Record for ProjectRoadmap {
    const NAME: &'static str = "ProjectRoadmap";

    fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "phases": string_array("Ordered phase names"),
                "epics": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "phase": { "type": "string", "description": "One of the phase names above" },
                            "stories": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string" },
                                        "description": { "type": "string" },
                                        "estimated_hours": { "type": "number" },
                                        "assigned_to": { "type": "string", "description": "Team member name" },
                                        "dependencies": string_array("Titles of stories this depends on"),
                                        "priority": { "type": "integer", "description": "1 is highest" }
                                    },
                                    "required": [
                                        "title", "description", "estimated_hours",
                                        "assigned_to", "dependencies", "priority"
                                    ]
                                }
                            }
                        },
                        "required": ["title", "description", "stories", "phase"]
                    }
                },
                "total_estimated_hours": { "type": "number" },
                "risk_factors": string_array("Risks that could affect delivery")
            },
            "required": ["phases", "epics", "total_estimated_hours", "risk_factors"]
        })
    }

    fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (i, epic) in self.epics.iter().enumerate() {
            if !self.phases.iter().any(|p| p == &epic.phase) {
                findings.push(Finding::new(
                    format!("epics[{}].phase", i),
                    format!("phase '{}' of epic '{}' is not listed in phases", epic.phase, epic.title),
                ));
            }
            for (j, story) in epic.stories.iter().enumerate() {
                check_non_negative(
                    &mut findings,
                    format!("epics[{}].stories[{}].estimated_hours", i, j),
                    story.estimated_hours,
                );
            }
        }
        check_non_negative(&mut findings, "total_estimated_hours".to_string(), self.total_estimated_hours);
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::decode;

    fn roadmap_json() -> serde_json::Value {
        serde_json::json!({
            "phases": ["Discovery", "Build"],
            "epics": [
                {
                    "title": "Research",
                    "description": "Understand users",
                    "phase": "Discovery",
                    "stories": [{
                        "title": "Interviews",
                        "description": "Talk to five users",
                        "estimated_hours": 12.5,
                        "assigned_to": "Ana",
                        "dependencies": [],
                        "priority": 1
                    }]
                },
                {
                    "title": "Launch",
                    "description": "Ship it",
                    "phase": "Release",
                    "stories": []
                }
            ],
            "total_estimated_hours": 120,
            "risk_factors": ["scope creep"]
        })
    }

    #[test]
    fn test_decode_roadmap() {
        let roadmap: ProjectRoadmap = decode(roadmap_json()).unwrap();
        assert_eq!(roadmap.phases, vec!["Discovery", "Build"]);
        assert_eq!(roadmap.epics.len(), 2);
        assert_eq!(roadmap.story_count(), 1);
        assert_eq!(roadmap.total_estimated_hours, 120.0);
    }

    #[test]
    fn test_unknown_phase_is_a_finding_not_an_error() {
        let roadmap: ProjectRoadmap = decode(roadmap_json()).unwrap();
        let findings = roadmap.findings();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].path, "epics[1].phase");
        assert!(findings[0].message.contains("'Release'"));
        // The record itself is left untouched
        assert_eq!(roadmap.epics[1].phase, "Release");
    }

    #[test]
    fn test_integral_float_priority_is_accepted() {
        let mut value = roadmap_json();
        value["epics"][0]["stories"][0]["priority"] = serde_json::json!(2.0);
        let roadmap: ProjectRoadmap = decode(value).unwrap();
        assert_eq!(roadmap.epics[0].stories[0].priority, 2);
    }

    #[test]
    fn test_story_requires_priority() {
        let mut value = roadmap_json();
        value["epics"][0]["stories"][0]
            .as_object_mut()
            .unwrap()
            .remove("priority");
        assert!(decode::<ProjectRoadmap>(value).is_err());
    }
}
