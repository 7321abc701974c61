//! Database query functions for the `subjects` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::Subject;

/// List all subjects in insertion order.
pub async fn list_subjects(pool: &PgPool) -> Result<Vec<Subject>> {
    let subjects = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects ORDER BY position")
        .fetch_all(pool)
        .await
        .context("failed to list subjects")?;

    Ok(subjects)
}

/// Replace the whole subject collection.
///
/// Subjects absent from `subjects` are deleted (their topics cascade);
/// the rest are inserted or renamed, and every subject takes its place
/// from the order of `subjects`. Runs in a single transaction.
pub async fn replace_subjects(pool: &PgPool, subjects: &[Subject]) -> Result<()> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let ids: Vec<&str> = subjects.iter().map(|s| s.id.as_str()).collect();
    sqlx::query("DELETE FROM subjects WHERE NOT (id = ANY($1))")
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .context("failed to delete removed subjects")?;

    for subject in subjects {
        sqlx::query(
            "INSERT INTO subjects (id, name) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, position = DEFAULT",
        )
        .bind(&subject.id)
        .bind(&subject.name)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("failed to upsert subject {:?}", subject.id))?;
    }

    tx.commit().await.context("failed to commit transaction")?;
    Ok(())
}
