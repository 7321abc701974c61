//! End-to-end planning scenarios against the in-memory store.

mod common;

use std::time::Duration;

use serde_json::json;

use mentor_core::orchestrator::{
    FALLBACK_MESSAGE, FALLBACK_REASONING, complete_topic, generate_daily_plan, today_plan,
    tomorrow_preview,
};
use mentor_core::store::{MemoryStore, Store};
use mentor_db::models::{DailyPlan, TopicStatus};

use common::{
    ScriptedService, date, draft, drafter, quick_drafter, rate_limited, seeded_store,
};

fn topic_ids(plan: &DailyPlan) -> Vec<&str> {
    plan.items.iter().map(|i| i.topic_id.as_str()).collect()
}

fn stored_plan(day: chrono::NaiveDate, completed: bool) -> DailyPlan {
    DailyPlan {
        date: day,
        mentor_message: "earlier".to_string(),
        reasoning: "earlier".to_string(),
        items: vec![],
        completed,
        preview_flag: false,
    }
}

#[tokio::test]
async fn budget_fills_in_draft_order() {
    let store = seeded_store();
    let service = ScriptedService::new(vec![Ok(draft(&[
        ("math-hard", 2.0),
        ("math-medium", 2.0),
        ("phys-easy", 1.0),
    ]))]);
    let today = date(2026, 4, 1);

    let plan = generate_daily_plan(&store, &drafter(service), None, today)
        .await
        .unwrap();

    assert_eq!(topic_ids(&plan), vec!["math-hard", "math-medium"]);
    assert_eq!(plan.total_hours(), 4.0);
    assert_eq!(plan.mentor_message, "Scripted message.");
    assert_eq!(plan.items[0].subject_id, "math");
    assert!(!plan.preview_flag);
    assert!(!plan.completed);
    assert_eq!(store.get_plan(today).await.unwrap(), Some(plan));
}

#[tokio::test]
async fn missed_day_reduces_budget() {
    let store = seeded_store();
    let today = date(2026, 4, 2);
    store.save_plan(&stored_plan(date(2026, 4, 1), false)).await.unwrap();

    let service = ScriptedService::new(vec![Ok(draft(&[("math-medium", 3.0)]))]);
    let plan = generate_daily_plan(&store, &drafter(service.clone()), None, today)
        .await
        .unwrap();

    assert!(plan.items.is_empty());
    assert!(service.prompts()[0].contains("Missed Previous Day: Yes"));
}

#[tokio::test]
async fn unknown_topic_is_dropped() {
    let store = seeded_store();
    let service = ScriptedService::new(vec![Ok(draft(&[("ghost-1", 1.0), ("phys-medium", 1.0)]))]);

    let plan = generate_daily_plan(&store, &drafter(service), None, date(2026, 4, 1))
        .await
        .unwrap();
    assert_eq!(topic_ids(&plan), vec!["phys-medium"]);
    assert_eq!(plan.items[0].subject_id, "phys");
}

#[tokio::test(start_paused = true)]
async fn rate_limit_exhaustion_falls_back() {
    let store = seeded_store();
    let service = ScriptedService::always(Err(rate_limited()));
    let started = tokio::time::Instant::now();

    let plan = generate_daily_plan(&store, &drafter(service.clone()), None, date(2026, 4, 1))
        .await
        .unwrap();

    assert_eq!(service.calls(), 3);
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(plan.mentor_message, FALLBACK_MESSAGE);
    assert_eq!(plan.reasoning, FALLBACK_REASONING);
    assert_eq!(topic_ids(&plan), vec!["math-medium"]);
    assert_eq!(plan.items[0].allocated_time, 1.5);
    // The fallback is persisted like any other plan.
    assert!(store.get_plan(date(2026, 4, 1)).await.unwrap().is_some());
}

#[tokio::test]
async fn second_hard_item_is_dropped_regardless_of_budget() {
    let store = seeded_store();
    let service = ScriptedService::new(vec![Ok(draft(&[("math-hard", 1.0), ("phys-hard", 1.0)]))]);

    let plan = generate_daily_plan(&store, &drafter(service), None, date(2026, 4, 1))
        .await
        .unwrap();
    assert_eq!(topic_ids(&plan), vec!["math-hard"]);
}

#[tokio::test]
async fn malformed_draft_takes_the_fallback_without_retrying() {
    let store = seeded_store();
    let service = ScriptedService::new(vec![Ok(json!(["not", "an", "object"]))]);

    let plan = generate_daily_plan(&store, &drafter(service.clone()), None, date(2026, 4, 1))
        .await
        .unwrap();
    assert_eq!(service.calls(), 1);
    assert_eq!(plan.reasoning, FALLBACK_REASONING);
}

#[tokio::test]
async fn today_plan_reuses_stored_plan_unless_forced() {
    let store = seeded_store();
    let today = date(2026, 4, 1);
    let service = ScriptedService::new(vec![
        Ok(draft(&[("math-medium", 1.0)])),
        Ok(draft(&[("phys-medium", 2.0)])),
    ]);
    let client = drafter(service.clone());

    let first = today_plan(&store, &client, today, false).await.unwrap();
    let again = today_plan(&store, &client, today, false).await.unwrap();
    assert_eq!(first, again);
    assert_eq!(service.calls(), 1);

    let forced = today_plan(&store, &client, today, true).await.unwrap();
    assert_eq!(topic_ids(&forced), vec!["phys-medium"]);
    assert_eq!(store.list_plans().await.unwrap(), vec![forced]);
}

#[tokio::test]
async fn planning_requires_a_profile() {
    let store = MemoryStore::new();
    let service = ScriptedService::new(vec![]);

    let err = today_plan(&store, &drafter(service.clone()), date(2026, 4, 1), false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no profile"), "got: {err}");
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn preview_requires_completed_today_and_no_plan_tomorrow() {
    let store = seeded_store();
    let today = date(2026, 4, 1);
    let service = ScriptedService::new(vec![Ok(draft(&[("phys-medium", 1.0)]))]);
    let client = drafter(service.clone());

    // No plan today.
    assert!(tomorrow_preview(&store, &client, today).await.unwrap().is_none());

    // Plan today, not completed.
    store.save_plan(&stored_plan(today, false)).await.unwrap();
    assert!(tomorrow_preview(&store, &client, today).await.unwrap().is_none());
    assert_eq!(service.calls(), 0);

    // Completed today: a preview for tomorrow, not persisted.
    store.save_plan(&stored_plan(today, true)).await.unwrap();
    let preview = tomorrow_preview(&store, &client, today).await.unwrap().unwrap();
    assert_eq!(preview.date, date(2026, 4, 2));
    assert!(preview.preview_flag);
    assert_eq!(topic_ids(&preview), vec!["phys-medium"]);
    assert!(store.get_plan(date(2026, 4, 2)).await.unwrap().is_none());
    assert!(service.prompts()[0].contains("Target Planning Date: 2026-04-02 (Current Date: 2026-04-01)"));

    // Tomorrow already planned.
    store.save_plan(&stored_plan(date(2026, 4, 2), false)).await.unwrap();
    assert!(tomorrow_preview(&store, &client, today).await.unwrap().is_none());
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn completing_the_last_topic_completes_the_plan() {
    let store = seeded_store();
    let today = date(2026, 4, 1);
    let service = ScriptedService::new(vec![Ok(draft(&[
        ("math-medium", 1.0),
        ("phys-medium", 1.0),
    ]))]);
    today_plan(&store, &quick_drafter(service), today, false).await.unwrap();

    let first = complete_topic(&store, "math-medium", today).await.unwrap();
    assert_eq!(first.topic.status, TopicStatus::Done);
    assert_eq!(first.topic.exposure_count, 1);
    assert_eq!(first.topic.confidence_score, 100);
    assert!(first.completed_plan.is_none());
    assert!(!store.get_plan(today).await.unwrap().unwrap().completed);

    let second = complete_topic(&store, "phys-medium", today).await.unwrap();
    assert!(second.completed_plan.is_some_and(|p| p.completed));
    assert!(store.get_plan(today).await.unwrap().unwrap().completed);
}

#[tokio::test]
async fn completing_an_unknown_topic_fails() {
    let store = seeded_store();
    let err = complete_topic(&store, "nope", date(2026, 4, 1)).await.unwrap_err();
    assert!(err.to_string().contains("topic not found"), "got: {err}");
}
