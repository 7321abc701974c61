//! Database query functions for the singleton `profile` row.

use anyhow::{Context, Result, bail};
use sqlx::PgPool;

use crate::models::Profile;

/// Fetch the profile, if onboarding has written one.
pub async fn get_profile(pool: &PgPool) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        "SELECT exam_date, daily_available_hours, preferred_study_time, onboarding_completed \
         FROM profile WHERE id = 1",
    )
    .fetch_optional(pool)
    .await
    .context("failed to fetch profile")?;

    Ok(profile)
}

/// Insert or replace the profile. Returns the stored row.
pub async fn upsert_profile(pool: &PgPool, profile: &Profile) -> Result<Profile> {
    if !(profile.daily_available_hours > 0.0) {
        bail!(
            "daily_available_hours must be positive, got {}",
            profile.daily_available_hours
        );
    }

    let stored = sqlx::query_as::<_, Profile>(
        "INSERT INTO profile (id, exam_date, daily_available_hours, preferred_study_time, onboarding_completed) \
         VALUES (1, $1, $2, $3, $4) \
         ON CONFLICT (id) DO UPDATE SET \
             exam_date = EXCLUDED.exam_date, \
             daily_available_hours = EXCLUDED.daily_available_hours, \
             preferred_study_time = EXCLUDED.preferred_study_time, \
             onboarding_completed = EXCLUDED.onboarding_completed \
         RETURNING exam_date, daily_available_hours, preferred_study_time, onboarding_completed",
    )
    .bind(profile.exam_date)
    .bind(profile.daily_available_hours)
    .bind(&profile.preferred_study_time)
    .bind(profile.onboarding_completed)
    .fetch_one(pool)
    .await
    .context("failed to upsert profile")?;

    Ok(stored)
}
