use std::env;

/// Where the study database lives.
///
/// The CLI resolves the URL from its flag, the environment, and the config
/// file; [`DbConfig::from_env`] covers the environment-only case used by
/// scripts and tests.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL, optionally with a `?query`.
    pub database_url: String,
}

impl DbConfig {
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/mentor";

    pub const ENV_VAR: &str = "MENTOR_DATABASE_URL";

    /// `MENTOR_DATABASE_URL`, or [`Self::DEFAULT_URL`] when unset.
    pub fn from_env() -> Self {
        Self::new(env::var(Self::ENV_VAR).unwrap_or_else(|_| Self::DEFAULT_URL.to_owned()))
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Split off the `?query` suffix, if any.
    fn split_query(&self) -> (&str, &str) {
        match self.database_url.find('?') {
            Some(pos) => self.database_url.split_at(pos),
            None => (self.database_url.as_str(), ""),
        }
    }

    /// The database name: the last path segment, ignoring any query string.
    ///
    /// `None` for URLs that stop at `host:port`.
    pub fn database_name(&self) -> Option<&str> {
        let (base, _) = self.split_query();
        let (authority_end, name) = base.rsplit_once('/')?;
        if authority_end.ends_with('/') || name.is_empty() || name.contains(':') {
            return None;
        }
        Some(name)
    }

    /// Same server and query options, pointed at the `postgres` database.
    /// `CREATE DATABASE` for the study database is issued from there.
    pub fn maintenance_url(&self) -> String {
        let (base, query) = self.split_query();
        match (self.database_name(), base.rfind('/')) {
            (Some(_), Some(pos)) => format!("{}/postgres{query}", &base[..pos]),
            _ => format!("{}/postgres{query}", base.trim_end_matches('/')),
        }
    }

    /// The URL with any password replaced by `***`, for messages and logs.
    pub fn redacted_url(&self) -> String {
        let url = &self.database_url;
        let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
            return url.clone();
        };
        let rest = &url[scheme_end..];
        let Some(at) = rest.find('@') else {
            return url.clone();
        };
        match rest[..at].find(':') {
            Some(colon) => format!(
                "{}{}:***{}",
                &url[..scheme_end],
                &rest[..colon],
                &rest[at..]
            ),
            None => url.clone(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
