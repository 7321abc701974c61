//! CLI handler for `mentor suggest <subject-id> [--approve]`.

use std::fmt::Write;

use anyhow::{Context, Result, bail};

use mentor_core::drafting::DraftingClient;
use mentor_core::store::Store;
use mentor_core::syllabus::service;

use crate::config::LlmConfig;
use crate::render;

pub async fn run_suggest(store: &dyn Store, llm: &LlmConfig, subject_id: &str, approve: bool) -> Result<()> {
    let drafter = llm.drafting_client()?;
    print!("{}", suggest(store, &drafter, subject_id, approve).await?);
    Ok(())
}

async fn suggest(
    store: &dyn Store,
    drafter: &DraftingClient,
    subject_id: &str,
    approve: bool,
) -> Result<String> {
    let subjects = store.list_subjects().await.context("failed to load subjects")?;
    let Some(subject) = subjects.iter().find(|s| s.id == subject_id) else {
        bail!("subject not found: {subject_id}");
    };

    let suggestions = service::fetch_suggestions(store, drafter, subject_id).await?;
    let mut out = render::suggestions(&subject.name, &suggestions);

    if approve && !suggestions.is_empty() {
        out.push('\n');
        for suggestion in &suggestions {
            let topic = service::approve_suggestion(store, suggestion).await?;
            let _ = writeln!(out, "Added {} as {}.", topic.name, topic.id);
        }
    }
    Ok(out)
}
