//! CLI handlers for `mentor plan` subcommands and `mentor history`.
//!
//! Implements:
//! - `mentor plan today [--force]` -- show or generate today's plan
//! - `mentor plan preview`         -- preview tomorrow once today is done
//! - `mentor plan show [date]`     -- show a stored plan
//! - `mentor history`              -- list every stored plan

use anyhow::{Context, Result};
use chrono::NaiveDate;

use mentor_core::orchestrator;
use mentor_core::store::Store;

use crate::PlanCommands;
use crate::config::LlmConfig;
use crate::render;

// -----------------------------------------------------------------------
// Public entry points
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(
    command: PlanCommands,
    store: &dyn Store,
    llm: &LlmConfig,
    today: NaiveDate,
) -> Result<()> {
    let text = match command {
        PlanCommands::Today { force } => cmd_today(store, llm, today, force).await?,
        PlanCommands::Preview => cmd_preview(store, llm, today).await?,
        PlanCommands::Show { date } => show_plan(store, date.unwrap_or(today)).await?,
    };
    print!("{text}");
    Ok(())
}

pub async fn cmd_history(store: &dyn Store) -> Result<()> {
    print!("{}", history_text(store).await?);
    Ok(())
}

// -----------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------

async fn cmd_today(store: &dyn Store, llm: &LlmConfig, today: NaiveDate, force: bool) -> Result<String> {
    let drafter = llm.drafting_client()?;
    let plan = orchestrator::today_plan(store, &drafter, today, force).await?;
    let topics = store.list_topics().await.context("failed to load topics")?;
    Ok(render::plan(&plan, &topics))
}

async fn cmd_preview(store: &dyn Store, llm: &LlmConfig, today: NaiveDate) -> Result<String> {
    let drafter = llm.drafting_client()?;
    match orchestrator::tomorrow_preview(store, &drafter, today).await? {
        Some(preview) => {
            let topics = store.list_topics().await.context("failed to load topics")?;
            Ok(render::plan(&preview, &topics))
        }
        None => Ok(
            "No preview: finish today's plan first, or tomorrow already has a plan.\n".to_string(),
        ),
    }
}

async fn show_plan(store: &dyn Store, date: NaiveDate) -> Result<String> {
    let plan = store
        .get_plan(date)
        .await
        .with_context(|| format!("failed to load plan for {date}"))?;
    match plan {
        Some(plan) => {
            let topics = store.list_topics().await.context("failed to load topics")?;
            Ok(render::plan(&plan, &topics))
        }
        None => Ok(format!("No plan for {date}.\n")),
    }
}

async fn history_text(store: &dyn Store) -> Result<String> {
    let plans = store.list_plans().await.context("failed to load plans")?;
    Ok(render::history(&plans))
}
