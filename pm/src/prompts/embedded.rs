//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

/// Project-input stage instructions
pub const PROJECT_INPUT: &str = include_str!("../../prompts/project_input.pmt");

/// Roadmap stage instructions
pub const ROADMAP: &str = include_str!("../../prompts/roadmap.pmt");

/// Session-planning stage instructions
pub const SESSIONS: &str = include_str!("../../prompts/sessions.pmt");

/// Calendar stage instructions
pub const CALENDAR: &str = include_str!("../../prompts/calendar.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "project_input" => Some(PROJECT_INPUT),
        "roadmap" => Some(ROADMAP),
        "sessions" => Some(SESSIONS),
        "calendar" => Some(CALENDAR),
        _ => None,
    }
}
