//! Store-backed syllabus operations.

use anyhow::{Context, Result, bail};

use mentor_db::models::{Topic, TopicSuggestion};

use crate::drafting::DraftingClient;
use crate::store::Store;

/// Load a topic or fail with a not-found error.
pub async fn require_topic(store: &dyn Store, topic_id: &str) -> Result<Topic> {
    let topics = store.list_topics().await.context("failed to load topics")?;
    match topics.into_iter().find(|t| t.id == topic_id) {
        Some(topic) => Ok(topic),
        None => bail!("topic not found: {topic_id}"),
    }
}

/// Flip the hard mark on a topic and persist it.
pub async fn toggle_topic_hard(store: &dyn Store, topic_id: &str) -> Result<Topic> {
    let topic = super::toggle_hard_mark(&require_topic(store, topic_id).await?);
    if !store.update_topic(&topic).await? {
        bail!("topic disappeared while updating: {topic_id}");
    }
    tracing::info!(topic_id = %topic.id, is_hard_marked = topic.is_hard_marked, "hard mark toggled");
    Ok(topic)
}

/// Ask the drafting service for new topics in `subject_id`.
///
/// A failed fetch is logged and yields an empty list; an unknown subject
/// is an error.
pub async fn fetch_suggestions(
    store: &dyn Store,
    drafter: &DraftingClient,
    subject_id: &str,
) -> Result<Vec<TopicSuggestion>> {
    let subjects = store.list_subjects().await.context("failed to load subjects")?;
    let Some(subject) = subjects.into_iter().find(|s| s.id == subject_id) else {
        bail!("subject not found: {subject_id}");
    };
    let topics = store.list_topics().await.context("failed to load topics")?;

    match drafter.suggest_related_topics(&subject, &topics).await {
        Ok(suggestions) => {
            tracing::info!(subject_id, count = suggestions.len(), "suggestions fetched");
            Ok(suggestions)
        }
        Err(e) => {
            tracing::error!(subject_id, error = %e, "failed to generate topic suggestions");
            Ok(Vec::new())
        }
    }
}

/// Add an accepted suggestion to the syllabus as a pending topic.
pub async fn approve_suggestion(store: &dyn Store, suggestion: &TopicSuggestion) -> Result<Topic> {
    let subjects = store.list_subjects().await.context("failed to load subjects")?;
    if !subjects.iter().any(|s| s.id == suggestion.subject_id) {
        bail!("subject not found: {}", suggestion.subject_id);
    }

    let hours = suggestion.estimated_hours;
    if !(hours.is_finite() && hours > 0.0) {
        bail!(
            "suggestion {:?} must have positive estimated_hours, got {hours}",
            suggestion.name
        );
    }

    let topic = super::approve_suggestion(suggestion);
    store
        .add_topic(&topic)
        .await
        .with_context(|| format!("failed to add topic {:?}", topic.name))?;
    tracing::info!(topic_id = %topic.id, name = %topic.name, "suggestion approved");
    Ok(topic)
}
