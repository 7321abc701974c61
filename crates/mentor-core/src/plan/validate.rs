//! Deterministic validation of a plan draft.
//!
//! The only path from [`DraftItem`] to [`PlanItem`]. Rules run as one
//! ordered pass over the draft, preserving its order:
//!
//! 1. unknown topic ids are dropped;
//! 2. non-positive or non-finite times are dropped;
//! 3. only the first hard-difficulty item is eligible;
//! 4. an item is accepted only if it fits the remaining budget (no
//!    truncation).
//!
//! The hard counter advances when an item passes rule 3, even if rule 4
//! then rejects it.

use std::collections::HashMap;

use mentor_db::models::{Difficulty, PlanItem, Topic};

use super::draft::DraftItem;

/// Maximum hard-difficulty items per plan.
pub const MAX_HARD_ITEMS: usize = 1;

/// Slack on the budget comparison, so `3.0 * 0.7` still admits 2.1h.
pub const BUDGET_EPSILON: f64 = 1e-9;

/// Sanitize `draft` against the known `topics` and the day's `budget`.
pub fn validate<I>(draft: I, topics: &[Topic], budget: f64) -> Vec<PlanItem>
where
    I: IntoIterator<Item = DraftItem>,
{
    let by_id: HashMap<&str, &Topic> = topics.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut accepted = Vec::new();
    let mut used = 0.0_f64;
    let mut hard_count = 0usize;

    for item in draft {
        let Some(topic) = by_id.get(item.topic_id.as_str()) else {
            tracing::debug!(topic_id = %item.topic_id, "dropping draft item: unknown topic");
            continue;
        };

        if !item.allocated_time.is_finite() || item.allocated_time <= 0.0 {
            tracing::debug!(
                topic_id = %item.topic_id,
                allocated_time = item.allocated_time,
                "dropping draft item: allocated time must be positive"
            );
            continue;
        }

        if topic.difficulty == Difficulty::Hard {
            if hard_count >= MAX_HARD_ITEMS {
                tracing::debug!(topic_id = %item.topic_id, "dropping draft item: hard cap reached");
                continue;
            }
            hard_count += 1;
        }

        if used + item.allocated_time > budget + BUDGET_EPSILON {
            tracing::debug!(
                topic_id = %item.topic_id,
                allocated_time = item.allocated_time,
                used,
                budget,
                "dropping draft item: exceeds remaining budget"
            );
            continue;
        }

        used += item.allocated_time;
        accepted.push(PlanItem {
            subject_id: topic.subject_id.clone(),
            topic_id: topic.id.clone(),
            allocated_time: item.allocated_time,
            reason: item.reason,
        });
    }

    accepted
}
