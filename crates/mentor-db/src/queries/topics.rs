//! Database query functions for the `topics` table.

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{Topic, TopicRecord};

const TOPIC_COLUMNS: &str = "id, subject_id, name, difficulty, estimated_hours, status, \
                             is_hard_marked, exposure_count, confidence_score";

/// List all topics in insertion order, with confidence normalized.
pub async fn list_topics(pool: &PgPool) -> Result<Vec<Topic>> {
    let query = format!("SELECT {TOPIC_COLUMNS} FROM topics ORDER BY position");
    let records = sqlx::query_as::<_, TopicRecord>(&query)
        .fetch_all(pool)
        .await
        .context("failed to list topics")?;

    Ok(records.into_iter().map(Topic::from).collect())
}

/// Fetch a single topic by ID.
pub async fn get_topic(pool: &PgPool, id: &str) -> Result<Option<Topic>> {
    let query = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = $1");
    let record = sqlx::query_as::<_, TopicRecord>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch topic")?;

    Ok(record.map(Topic::from))
}

/// Insert a topic, replacing any existing topic with the same id.
pub async fn insert_topic(pool: &PgPool, topic: &Topic) -> Result<()> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;
    upsert_in_tx(&mut tx, topic, UPSERT_KEEP_POSITION).await?;
    tx.commit().await.context("failed to commit transaction")?;
    Ok(())
}

/// Overwrite every mutable field of an existing topic.
///
/// Returns the number of rows affected (0 when the topic does not exist).
pub async fn update_topic(pool: &PgPool, topic: &Topic) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE topics SET subject_id = $2, name = $3, difficulty = $4, estimated_hours = $5, \
             status = $6, is_hard_marked = $7, exposure_count = $8, confidence_score = $9 \
         WHERE id = $1",
    )
    .bind(&topic.id)
    .bind(&topic.subject_id)
    .bind(&topic.name)
    .bind(topic.difficulty)
    .bind(topic.estimated_hours)
    .bind(topic.status)
    .bind(topic.is_hard_marked)
    .bind(topic.exposure_count)
    .bind(topic.confidence_score)
    .execute(pool)
    .await
    .with_context(|| format!("failed to update topic {:?}", topic.id))?;

    Ok(result.rows_affected())
}

/// Replace the whole topic collection in a single transaction.
///
/// Afterwards the topics list in the order given, including ones that
/// already existed.
pub async fn replace_topics(pool: &PgPool, topics: &[Topic]) -> Result<()> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let ids: Vec<&str> = topics.iter().map(|t| t.id.as_str()).collect();
    sqlx::query("DELETE FROM topics WHERE NOT (id = ANY($1))")
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .context("failed to delete removed topics")?;

    for topic in topics {
        upsert_in_tx(&mut tx, topic, UPSERT_REORDER).await?;
    }

    tx.commit().await.context("failed to commit transaction")?;
    Ok(())
}

const UPSERT_SQL: &str = "INSERT INTO topics (id, subject_id, name, difficulty, estimated_hours, \
         status, is_hard_marked, exposure_count, confidence_score) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
     ON CONFLICT (id) DO UPDATE SET \
         subject_id = EXCLUDED.subject_id, name = EXCLUDED.name, \
         difficulty = EXCLUDED.difficulty, estimated_hours = EXCLUDED.estimated_hours, \
         status = EXCLUDED.status, is_hard_marked = EXCLUDED.is_hard_marked, \
         exposure_count = EXCLUDED.exposure_count, confidence_score = EXCLUDED.confidence_score";

/// An existing row keeps its place in the list.
const UPSERT_KEEP_POSITION: &str = "";

/// An existing row moves to the end, as if freshly inserted.
const UPSERT_REORDER: &str = ", position = DEFAULT";

async fn upsert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    topic: &Topic,
    position_clause: &str,
) -> Result<()> {
    let query = format!("{UPSERT_SQL}{position_clause}");
    sqlx::query(&query)
        .bind(&topic.id)
        .bind(&topic.subject_id)
        .bind(&topic.name)
        .bind(topic.difficulty)
        .bind(topic.estimated_hours)
        .bind(topic.status)
        .bind(topic.is_hard_marked)
        .bind(topic.exposure_count)
        .bind(topic.confidence_score)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("failed to upsert topic {:?}", topic.id))?;

    Ok(())
}
