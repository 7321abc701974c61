//! Untrusted drafts as returned by the generative service.
//!
//! These types are separate from [`PlanItem`]: only
//! [`super::validate::validate`] turns a [`DraftItem`] into a plan item.

use serde::Deserialize;
use serde_json::Value;

use mentor_db::models::{Difficulty, PlanItem};

pub const DEFAULT_MENTOR_MESSAGE: &str = "Let's take a steady step forward.";
pub const DEFAULT_REASONING: &str = "A balanced selection from your syllabus.";

/// A plan proposal, not yet validated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanDraft {
    #[serde(default)]
    pub mentor_message: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub items: Vec<DraftItem>,
}

impl PlanDraft {
    /// The message to show, falling back when absent or blank.
    pub fn mentor_message(&self) -> &str {
        non_blank(self.mentor_message.as_deref()).unwrap_or(DEFAULT_MENTOR_MESSAGE)
    }

    pub fn reasoning(&self) -> &str {
        non_blank(self.reasoning.as_deref()).unwrap_or(DEFAULT_REASONING)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// One proposed plan entry. `allocated_time` defaults to zero when
/// missing, which the validator then drops.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DraftItem {
    pub topic_id: String,
    #[serde(default)]
    pub allocated_time: f64,
    #[serde(default)]
    pub reason: String,
}

impl From<PlanItem> for DraftItem {
    fn from(item: PlanItem) -> Self {
        Self {
            topic_id: item.topic_id,
            allocated_time: item.allocated_time,
            reason: item.reason,
        }
    }
}

/// A proposed new topic, before the subject reference is attached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestionDraft {
    pub name: String,
    pub difficulty: Difficulty,
    pub estimated_hours: f64,
}

/// Interpret a service response as a [`PlanDraft`].
///
/// Returns the reason on failure. A body that is not a JSON object is
/// rejected outright rather than read as an empty plan.
pub fn parse_plan_draft(value: Value) -> Result<PlanDraft, String> {
    if !value.is_object() {
        return Err(format!("expected a JSON object, got {}", json_kind(&value)));
    }
    serde_json::from_value(value).map_err(|e| format!("plan draft does not match schema: {e}"))
}

/// Interpret a service response as a list of [`SuggestionDraft`]s.
pub fn parse_suggestions(value: Value) -> Result<Vec<SuggestionDraft>, String> {
    if !value.is_array() {
        return Err(format!("expected a JSON array, got {}", json_kind(&value)));
    }
    serde_json::from_value(value).map_err(|e| format!("suggestions do not match schema: {e}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
