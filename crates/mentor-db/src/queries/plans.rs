//! Database query functions for the `daily_plans` table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::models::DailyPlan;

const PLAN_COLUMNS: &str = "date, mentor_message, reasoning, items, completed, preview_flag";

/// List the whole plan history, oldest first.
pub async fn list_plans(pool: &PgPool) -> Result<Vec<DailyPlan>> {
    let query = format!("SELECT {PLAN_COLUMNS} FROM daily_plans ORDER BY date");
    let plans = sqlx::query_as::<_, DailyPlan>(&query)
        .fetch_all(pool)
        .await
        .context("failed to list plans")?;

    Ok(plans)
}

/// Fetch the plan for a given date.
pub async fn get_plan(pool: &PgPool, date: NaiveDate) -> Result<Option<DailyPlan>> {
    let query = format!("SELECT {PLAN_COLUMNS} FROM daily_plans WHERE date = $1");
    let plan = sqlx::query_as::<_, DailyPlan>(&query)
        .bind(date)
        .fetch_optional(pool)
        .await
        .context("failed to fetch plan")?;

    Ok(plan)
}

/// Insert the plan, or replace the existing plan for the same date.
///
/// Last writer wins; there is no conflict check.
pub async fn upsert_plan(pool: &PgPool, plan: &DailyPlan) -> Result<()> {
    sqlx::query(
        "INSERT INTO daily_plans (date, mentor_message, reasoning, items, completed, preview_flag) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (date) DO UPDATE SET \
             mentor_message = EXCLUDED.mentor_message, \
             reasoning = EXCLUDED.reasoning, \
             items = EXCLUDED.items, \
             completed = EXCLUDED.completed, \
             preview_flag = EXCLUDED.preview_flag",
    )
    .bind(plan.date)
    .bind(&plan.mentor_message)
    .bind(&plan.reasoning)
    .bind(Json(&plan.items))
    .bind(plan.completed)
    .bind(plan.preview_flag)
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert plan for {}", plan.date))?;

    Ok(())
}
