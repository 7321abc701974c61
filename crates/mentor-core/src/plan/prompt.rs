//! Prompt and response-schema construction for the drafting service.
//!
//! Pure string building: nothing here performs I/O. The prompt *requests*
//! the planning rules; the validator enforces them afterwards.

use serde_json::{Value, json};

use mentor_db::models::{Profile, Subject};

use super::context::{PlanningContext, TopicSets};

// ---------------------------------------------------------------------------
// Daily plan
// ---------------------------------------------------------------------------

const MENTOR_PERSONA: &str = "System Instruction: You are a senior teacher guiding a student \
    gently. Your tone is calm, non-judgmental, and sustainable.\n\n";

/// Build the instruction for drafting the plan described by `ctx`.
///
/// Pending topics carry only id, name and difficulty, never estimated hours.
pub fn build_plan_prompt(profile: &Profile, ctx: &PlanningContext, topics: &TopicSets<'_>) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(MENTOR_PERSONA);

    prompt.push_str("Context:\n");
    prompt.push_str(&format!(
        "- Target Planning Date: {} (Current Date: {})\n",
        ctx.target_date, ctx.today
    ));
    prompt.push_str(&format!("- Days to Exam: {}\n", ctx.days_to_exam));
    prompt.push_str(&format!(
        "- Daily Limit: {} hours\n",
        profile.daily_available_hours
    ));
    prompt.push_str(&format!(
        "- Preferred Time: {}\n",
        profile.preferred_study_time
    ));
    if ctx.missed_previous_day {
        prompt.push_str("- Missed Previous Day: Yes (Reduce load, be extra supportive)\n");
    } else {
        prompt.push_str("- Missed Previous Day: No\n");
    }
    if ctx.exam_mode {
        prompt.push_str(
            "- Exam Mode: Active (Focus on revision, shorter sessions, reassurance)\n",
        );
    } else {
        prompt.push_str("- Exam Mode: Inactive (Mix learning and progress)\n");
    }
    prompt.push('\n');

    let pending: Vec<Value> = topics
        .pending
        .iter()
        .map(|t| json!({ "id": t.id, "name": t.name, "difficulty": t.difficulty }))
        .collect();
    let completed: Vec<Value> = topics
        .completed
        .iter()
        .map(|t| json!({ "id": t.id, "name": t.name }))
        .collect();
    let priority: Vec<&str> = topics.priority.iter().map(|t| t.name.as_str()).collect();

    prompt.push_str(&format!(
        "Available Syllabus (Pending): {}\n",
        Value::from(pending)
    ));
    prompt.push_str(&format!(
        "Completed Topics (For Revision): {}\n",
        Value::from(completed)
    ));
    prompt.push_str(&format!("Priority (Marked Hard): {}\n\n", json!(priority)));

    prompt.push_str("Strict Requirements:\n");
    prompt.push_str("1. Only use topic IDs provided. NEVER hallucinate topic IDs or names.\n");
    prompt.push_str(&format!(
        "2. Total allocated_time must be <= {}.\n",
        profile.daily_available_hours
    ));
    prompt.push_str("3. Include at most 1 HARD difficulty topic per day.\n");
    prompt.push_str("4. If Missed Previous Day is true, reduce total time by 30%.\n");
    prompt.push_str(
        "5. If Exam Mode is active, prioritize revision of Completed Topics over new ones.\n",
    );
    prompt.push_str("6. Return a JSON object matching the provided schema.\n");

    prompt
}

/// Response schema for a plan draft.
pub fn plan_draft_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mentor_message": {
                "type": "STRING",
                "description": "A gentle, teacher-like message for the student."
            },
            "reasoning": {
                "type": "STRING",
                "description": "The logic for choosing these topics."
            },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "topic_id": { "type": "STRING" },
                        "allocated_time": { "type": "NUMBER" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["topic_id", "allocated_time", "reason"]
                }
            }
        },
        "required": ["mentor_message", "reasoning", "items"]
    })
}

// ---------------------------------------------------------------------------
// Topic suggestions
// ---------------------------------------------------------------------------

/// Build the instruction asking for 3-5 new topics extending `subject`.
pub fn build_suggestion_prompt(subject: &Subject, existing_names: &[&str]) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(&format!(
        "You are a senior academic mentor. Based on the subject \"{}\" and the following \
         existing topics already in the syllabus: [{}], suggest 3-5 new, academically \
         relevant topics that would naturally extend the student's learning journey.\n\n",
        subject.name,
        existing_names.join(", ")
    ));
    prompt.push_str("Strict Guidelines:\n");
    prompt.push_str(&format!(
        "1. Suggestions must strictly belong to the domain of \"{}\".\n",
        subject.name
    ));
    prompt.push_str("2. Do NOT suggest topics already in the syllabus.\n");
    prompt.push_str("3. Topic names should be concise and academic.\n");
    prompt.push_str(
        "4. Provide a difficulty (easy, medium, or hard) and an estimated_hours (1-10) for each.\n",
    );
    prompt.push_str("5. No motivational or conversational text in the JSON response.\n");
    prompt
}

/// Response schema for topic suggestions.
pub fn suggestion_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "difficulty": { "type": "STRING", "enum": ["easy", "medium", "hard"] },
                "estimated_hours": { "type": "NUMBER" }
            },
            "required": ["name", "difficulty", "estimated_hours"]
        }
    })
}
