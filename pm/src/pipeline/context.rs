//! Context projection: the text each stage receives from earlier output
//!
//! Only a small, fixed subset of fields is carried forward. Lists render as
//! bracketed, single-quoted literals (`['Ana', 'Ben']`) and numbers always
//! keep a decimal part (`500.0`), so the same records always produce
//! byte-identical context.

use crate::schema::{ProjectInputData, ProjectRoadmap, SessionPlan};

/// Context for the roadmap stage
pub fn roadmap_context(input: &ProjectInputData) -> String {
    format!(
        "Project: {}\nTimeline: {} to {}\nTeam: {}\nBudget Hours: {}\nConstraints: {}",
        input.project_name,
        input.start_date,
        input.end_date,
        list_literal(&input.member_names()),
        decimal(input.total_budget_hours),
        list_literal(&input.constraints),
    )
}

/// Context for the session-planning stage
pub fn sessions_context(roadmap: &ProjectRoadmap, input: &ProjectInputData) -> String {
    format!(
        "Roadmap Phases: {}\nTotal Hours: {}\nTeam Members: {}\nProject Timeline: {} to {}",
        list_literal(&roadmap.phases),
        decimal(roadmap.total_estimated_hours),
        list_literal(&input.member_names()),
        input.start_date,
        input.end_date,
    )
}

/// Context for the calendar stage
pub fn calendar_context(sessions: &SessionPlan, input: &ProjectInputData) -> String {
    let event_types: Vec<&str> = sessions.event_types().iter().map(|t| t.as_str()).collect();
    format!(
        "Session Plan: {} sprints\nTeam Members: {}\nEvents to Schedule: {}",
        sessions.sprints.len(),
        list_literal(&input.member_names()),
        list_literal(&event_types),
    )
}

/// Render strings as a bracketed list literal: `['a', 'b']`
pub fn list_literal<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| string_literal(s.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

/// Quote a string, preferring single quotes unless the text contains one
fn string_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Render a number the way a float literal reads: `500.0`, `12.5`, `1e+16`
pub fn decimal(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug keeps a trailing `.0` and switches to exponent form for very
    // large or small magnitudes; only the exponent spelling differs.
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}
