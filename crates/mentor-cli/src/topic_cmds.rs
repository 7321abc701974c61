//! CLI handlers for `mentor topic` subcommands.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use mentor_core::orchestrator;
use mentor_core::store::Store;
use mentor_core::syllabus::service;

use crate::TopicCommands;
use crate::render;

pub async fn run_topic_command(command: TopicCommands, store: &dyn Store, today: NaiveDate) -> Result<()> {
    let text = match command {
        TopicCommands::List => list_topics(store).await?,
        TopicCommands::Done { id } => mark_done(store, &id, today).await?,
        TopicCommands::Hard { id } => toggle_hard(store, &id).await?,
    };
    print!("{text}");
    Ok(())
}

async fn list_topics(store: &dyn Store) -> Result<String> {
    let subjects = store.list_subjects().await.context("failed to load subjects")?;
    let topics = store.list_topics().await.context("failed to load topics")?;
    Ok(render::topics(&subjects, &topics))
}

async fn mark_done(store: &dyn Store, topic_id: &str, today: NaiveDate) -> Result<String> {
    let completion = orchestrator::complete_topic(store, topic_id, today).await?;
    let topic = &completion.topic;

    let mut out = format!(
        "Marked {} done (exposure {}, confidence {}%).\n",
        topic.name, topic.exposure_count, topic.confidence_score
    );
    if completion.completed_plan.is_some() {
        let _ = writeln!(
            out,
            "Today's plan is complete. Run `mentor plan preview` to see tomorrow."
        );
    }
    Ok(out)
}

async fn toggle_hard(store: &dyn Store, topic_id: &str) -> Result<String> {
    let topic = service::toggle_topic_hard(store, topic_id).await?;
    let state = if topic.is_hard_marked { "marked" } else { "unmarked" };
    Ok(format!("{} {state} as hard.\n", topic.name))
}
