//! CLI handler for `mentor onboard <file>`.

use anyhow::{Context, Result};

use mentor_core::store::Store;
use mentor_core::syllabus::import::{apply_onboarding, parse_syllabus_toml};

/// Read a syllabus TOML file, validate it, and replace the stored profile
/// and syllabus with it.
pub async fn run_onboard(store: &dyn Store, file_path: &str) -> Result<()> {
    print!("{}", onboard(store, file_path).await?);
    Ok(())
}

async fn onboard(store: &dyn Store, file_path: &str) -> Result<String> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read syllabus file: {file_path}"))?;
    let onboarding = parse_syllabus_toml(&content)
        .with_context(|| format!("failed to parse syllabus file: {file_path}"))?;

    apply_onboarding(store, &onboarding).await?;

    let pending = onboarding.topics.iter().filter(|t| !t.is_done()).count();
    Ok(format!(
        "Onboarding complete.\n\n  Exam date:    {}\n  Daily hours:  {}\n  Subjects:     {}\n  Topics:       {} ({pending} pending)\n\nNext: run `mentor plan today`.\n",
        onboarding.profile.exam_date,
        onboarding.profile.daily_available_hours,
        onboarding.subjects.len(),
        onboarding.topics.len(),
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mentor_core::store::MemoryStore;

    use super::*;

    const SYLLABUS: &str = r#"
[profile]
exam_date = "2026-06-30"
daily_available_hours = 3

[[subjects]]
id = "math"
name = "Mathematics"

[[subjects.topics]]
name = "Limits"
status = "done"

[[subjects.topics]]
name = "Integrals"
difficulty = "hard"
"#;

    #[tokio::test]
    async fn onboard_writes_profile_and_syllabus() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SYLLABUS.as_bytes()).unwrap();
        let store = MemoryStore::new();

        let text = onboard(&store, file.path().to_str().unwrap()).await.unwrap();
        assert!(text.contains("Topics:       2 (1 pending)"));

        let profile = store.get_profile().await.unwrap().unwrap();
        assert!(profile.onboarding_completed);
        assert_eq!(profile.daily_available_hours, 3.0);
        assert_eq!(store.list_subjects().await.unwrap().len(), 1);
        assert_eq!(store.list_topics().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_file_leaves_store_untouched() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[profile]\nexam_date = \"soon\"\n").unwrap();
        let store = MemoryStore::new();

        let err = onboard(&store, file.path().to_str().unwrap()).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse syllabus file"));
        assert!(store.get_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = onboard(&MemoryStore::new(), "/nonexistent/syllabus.toml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read syllabus file"));
    }
}
