//! Configuration file management for mentor.
//!
//! Provides a TOML-based config file at `~/.config/mentor/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use mentor_core::drafting::{DraftingClient, GeminiService};
use mentor_db::config::DbConfig;

pub const API_KEY_ENV: &str = "MENTOR_API_KEY";
pub const MODEL_ENV: &str = "MENTOR_MODEL";
pub const BASE_URL_ENV: &str = "MENTOR_LLM_BASE_URL";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub llm: LlmSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the mentor config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/mentor` or `~/.config/mentor`,
/// never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("mentor");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("mentor")
}

/// Return the path to the mentor config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse config file")
}

/// Serialize and write the config file to `path`, creating parent dirs as
/// needed. Sets file permissions to 0600 on Unix.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    // The file may hold an API key.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Settings for the generative service.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LlmConfig {
    /// Build a drafting client, failing when no API key is configured.
    pub fn drafting_client(&self) -> Result<DraftingClient> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!(
                "API key not found; set {API_KEY_ENV} or run `mentor init --api-key <KEY>`"
            );
        };
        let service = GeminiService::new(api_key, &self.model).with_base_url(&self.base_url);
        Ok(DraftingClient::new(Arc::new(service)))
    }
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct MentorConfig {
    pub db_config: DbConfig,
    pub llm: LlmConfig,
}

impl MentorConfig {
    /// Resolve configuration from the CLI flag, the process environment,
    /// and the config file (if present).
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let path = config_path();
        let file = if path.exists() {
            Some(load_config_from(&path)?)
        } else {
            None
        };
        Ok(Self::resolve_with(
            cli_db_url,
            |key| std::env::var(key).ok(),
            file.as_ref(),
        ))
    }

    /// The resolution chain over an explicit environment and file.
    ///
    /// - DB URL: `cli_db_url` > `MENTOR_DATABASE_URL` > `database.url` > default
    /// - API key: `MENTOR_API_KEY` > `llm.api_key` > none
    /// - model: `MENTOR_MODEL` > `llm.model` > default
    /// - base URL: `MENTOR_LLM_BASE_URL` > `llm.base_url` > default
    pub fn resolve_with<E>(cli_db_url: Option<&str>, env: E, file: Option<&ConfigFile>) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let db_url = cli_db_url
            .map(str::to_string)
            .or_else(|| env(DbConfig::ENV_VAR))
            .or_else(|| file.map(|f| f.database.url.clone()))
            .unwrap_or_else(|| DbConfig::DEFAULT_URL.to_string());

        let llm_file = file.map(|f| &f.llm);
        let llm = LlmConfig {
            api_key: env(API_KEY_ENV)
                .filter(|k| !k.is_empty())
                .or_else(|| llm_file.and_then(|l| l.api_key.clone())),
            model: env(MODEL_ENV)
                .or_else(|| llm_file.and_then(|l| l.model.clone()))
                .unwrap_or_else(|| GeminiService::DEFAULT_MODEL.to_string()),
            base_url: env(BASE_URL_ENV)
                .or_else(|| llm_file.and_then(|l| l.base_url.clone()))
                .unwrap_or_else(|| GeminiService::DEFAULT_BASE_URL.to_string()),
        };

        Self {
            db_config: DbConfig::new(db_url),
            llm,
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
