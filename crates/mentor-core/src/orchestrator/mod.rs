//! Plan orchestrator: context, draft, validate (or fall back), persist.
//!
//! This is the only code that writes plans to the store.

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};

use mentor_db::models::{DailyPlan, PlanItem, Profile, Topic};

use crate::drafting::DraftingClient;
use crate::plan::context::{PlanningContext, TopicSets};
use crate::plan::draft::PlanDraft;
use crate::plan::validate::validate;
use crate::store::{self, Store, StudyState};
use crate::syllabus;

pub const FALLBACK_MESSAGE: &str = "I'm here for you. Technology can be unpredictable, but our \
    journey continues. Let's focus on one simple step while things stabilize.";
pub const FALLBACK_REASONING: &str = "Fallback triggered after definitive API failure.";
pub const FALLBACK_ITEM_REASON: &str = "Picking the next logical step from your syllabus.";

/// Hours given to the single fallback item, before the daily cap.
pub const FALLBACK_MAX_HOURS: f64 = 1.5;

// ---------------------------------------------------------------------------
// Plan assembly (no I/O besides the drafting call)
// ---------------------------------------------------------------------------

/// Build a validated plan from an untrusted draft.
pub fn plan_from_draft(draft: PlanDraft, topics: &[Topic], ctx: &PlanningContext) -> DailyPlan {
    let mentor_message = draft.mentor_message().to_string();
    let reasoning = draft.reasoning().to_string();
    let items = validate(draft.items, topics, ctx.effective_budget());
    DailyPlan {
        date: ctx.target_date,
        mentor_message,
        reasoning,
        items,
        completed: false,
        preview_flag: ctx.is_preview(),
    }
}

/// The plan used when drafting failed for good: the first pending topic,
/// or nothing. Not validated; it is built from known topics directly.
pub fn fallback_plan(profile: &Profile, sets: &TopicSets<'_>, ctx: &PlanningContext) -> DailyPlan {
    let items = sets
        .pending
        .first()
        .map(|t| PlanItem {
            subject_id: t.subject_id.clone(),
            topic_id: t.id.clone(),
            allocated_time: FALLBACK_MAX_HOURS.min(profile.daily_available_hours),
            reason: FALLBACK_ITEM_REASON.to_string(),
        })
        .into_iter()
        .collect();

    DailyPlan {
        date: ctx.target_date,
        mentor_message: FALLBACK_MESSAGE.to_string(),
        reasoning: FALLBACK_REASONING.to_string(),
        items,
        completed: false,
        preview_flag: ctx.is_preview(),
    }
}

/// Produce the plan for `target_date` (default `today`) without persisting.
///
/// Never fails: a drafting failure is logged and replaced by
/// [`fallback_plan`].
pub async fn build_daily_plan(
    drafter: &DraftingClient,
    profile: &Profile,
    topics: &[Topic],
    history: &[DailyPlan],
    target_date: Option<NaiveDate>,
    today: NaiveDate,
) -> DailyPlan {
    let ctx = PlanningContext::new(profile, history, target_date, today);
    let sets = TopicSets::from_topics(topics);

    tracing::debug!(
        date = %ctx.target_date,
        days_to_exam = ctx.days_to_exam,
        missed_previous_day = ctx.missed_previous_day,
        exam_mode = ctx.exam_mode,
        budget = ctx.effective_budget(),
        pending = sets.pending.len(),
        "planning context computed"
    );

    match drafter.draft_plan(profile, &sets, &ctx).await {
        Ok(draft) => {
            let drafted = draft.items.len();
            let plan = plan_from_draft(draft, topics, &ctx);
            tracing::info!(
                date = %plan.date,
                drafted,
                accepted = plan.items.len(),
                hours = plan.total_hours(),
                "plan drafted and validated"
            );
            plan
        }
        Err(e) => {
            tracing::error!(date = %ctx.target_date, error = %e, "plan drafting failed definitively, using fallback");
            fallback_plan(profile, &sets, &ctx)
        }
    }
}

// ---------------------------------------------------------------------------
// Store-backed operations
// ---------------------------------------------------------------------------

fn require_profile(state: &StudyState) -> Result<&Profile> {
    match &state.profile {
        Some(p) => Ok(p),
        None => bail!("no profile found; run onboarding first"),
    }
}

/// Build the plan for `target_date` from stored state and persist it.
pub async fn generate_daily_plan(
    store: &dyn Store,
    drafter: &DraftingClient,
    target_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DailyPlan> {
    let state = store::load_state(store).await?;
    let profile = require_profile(&state)?;
    let plan = build_daily_plan(
        drafter,
        profile,
        &state.topics,
        &state.history,
        target_date,
        today,
    )
    .await;

    store
        .save_plan(&plan)
        .await
        .with_context(|| format!("failed to save plan for {}", plan.date))?;
    Ok(plan)
}

/// Today's plan: the stored one, or a freshly generated one when none
/// exists or `force` is set.
pub async fn today_plan(
    store: &dyn Store,
    drafter: &DraftingClient,
    today: NaiveDate,
    force: bool,
) -> Result<DailyPlan> {
    if !force {
        if let Some(plan) = store.get_plan(today).await? {
            tracing::debug!(date = %today, "using stored plan");
            return Ok(plan);
        }
    }
    generate_daily_plan(store, drafter, None, today).await
}

/// A preview of tomorrow's plan.
///
/// Only offered once today's plan exists and is completed, and only while
/// tomorrow has no plan yet. The preview is returned, not stored.
pub async fn tomorrow_preview(
    store: &dyn Store,
    drafter: &DraftingClient,
    today: NaiveDate,
) -> Result<Option<DailyPlan>> {
    let state = store::load_state(store).await?;
    let profile = require_profile(&state)?;

    if !state.plan_for(today).is_some_and(|p| p.completed) {
        tracing::debug!(date = %today, "today's plan is not completed, no preview");
        return Ok(None);
    }
    let tomorrow = today + Duration::days(1);
    if state.plan_for(tomorrow).is_some() {
        tracing::debug!(date = %tomorrow, "plan already exists, no preview");
        return Ok(None);
    }

    let preview = build_daily_plan(
        drafter,
        profile,
        &state.topics,
        &state.history,
        Some(tomorrow),
        today,
    )
    .await;
    Ok(Some(preview))
}

/// Result of [`complete_topic`].
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub topic: Topic,
    /// Today's plan, when this completion finished it.
    pub completed_plan: Option<DailyPlan>,
}

/// Mark a topic done and, if that finishes today's plan, mark the plan
/// completed too.
pub async fn complete_topic(store: &dyn Store, topic_id: &str, today: NaiveDate) -> Result<Completion> {
    let mut topics = store.list_topics().await.context("failed to load topics")?;
    let Some(slot) = topics.iter_mut().find(|t| t.id == topic_id) else {
        bail!("topic not found: {topic_id}");
    };
    *slot = syllabus::mark_topic_done(slot);
    let topic = slot.clone();

    if !store.update_topic(&topic).await? {
        bail!("topic disappeared while updating: {topic_id}");
    }
    tracing::info!(
        topic_id = %topic.id,
        exposure_count = topic.exposure_count,
        confidence_score = topic.confidence_score,
        "topic marked done"
    );

    let completed_plan = match store.get_plan(today).await? {
        Some(mut plan) if !plan.completed && syllabus::plan_is_complete(&plan, &topics) => {
            plan.completed = true;
            store
                .save_plan(&plan)
                .await
                .with_context(|| format!("failed to save plan for {today}"))?;
            tracing::info!(date = %today, "daily plan completed");
            Some(plan)
        }
        _ => None,
    };

    Ok(Completion {
        topic,
        completed_plan,
    })
}

#[cfg(test)]
mod tests {
    use mentor_db::models::{Difficulty, TopicStatus};

    use super::*;
    use crate::plan::draft::DraftItem;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn profile(hours: f64) -> Profile {
        Profile {
            exam_date: day(30),
            daily_available_hours: hours,
            preferred_study_time: "morning".to_string(),
            onboarding_completed: true,
        }
    }

    fn topic(id: &str, status: TopicStatus) -> Topic {
        Topic {
            id: id.to_string(),
            subject_id: "math".to_string(),
            name: id.to_string(),
            difficulty: Difficulty::Medium,
            estimated_hours: 2.0,
            status,
            is_hard_marked: false,
            exposure_count: 0,
            confidence_score: 0,
        }
    }

    #[test]
    fn fallback_picks_first_pending_and_caps_hours() {
        let topics = vec![
            topic("done", TopicStatus::Done),
            topic("first", TopicStatus::Pending),
            topic("second", TopicStatus::Pending),
        ];
        let sets = TopicSets::from_topics(&topics);

        let p = profile(1.0);
        let ctx = PlanningContext::new(&p, &[], None, day(1));
        let plan = fallback_plan(&p, &sets, &ctx);
        assert_eq!(plan.mentor_message, FALLBACK_MESSAGE);
        assert_eq!(plan.reasoning, FALLBACK_REASONING);
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].topic_id, "first");
        assert_eq!(plan.items[0].allocated_time, 1.0);
        assert_eq!(plan.items[0].reason, FALLBACK_ITEM_REASON);

        let p = profile(4.0);
        let plan = fallback_plan(&p, &sets, &ctx);
        assert_eq!(plan.items[0].allocated_time, 1.5);
    }

    #[test]
    fn fallback_without_pending_topics_is_empty() {
        let topics = vec![topic("done", TopicStatus::Done)];
        let sets = TopicSets::from_topics(&topics);
        let p = profile(4.0);
        let ctx = PlanningContext::new(&p, &[], Some(day(2)), day(1));

        let plan = fallback_plan(&p, &sets, &ctx);
        assert!(plan.items.is_empty());
        assert!(plan.preview_flag);
        assert!(!plan.completed);
    }

    #[test]
    fn draft_defaults_carry_into_the_plan() {
        let topics = vec![topic("t1", TopicStatus::Pending)];
        let p = profile(4.0);
        let ctx = PlanningContext::new(&p, &[], None, day(1));
        let draft = PlanDraft {
            mentor_message: None,
            reasoning: Some("Because.".to_string()),
            items: vec![DraftItem {
                topic_id: "t1".to_string(),
                allocated_time: 5.0,
                reason: "too long".to_string(),
            }],
        };

        let plan = plan_from_draft(draft, &topics, &ctx);
        assert_eq!(plan.mentor_message, "Let's take a steady step forward.");
        assert_eq!(plan.reasoning, "Because.");
        assert!(plan.items.is_empty());
        assert!(!plan.preview_flag);
    }
}
