//! Decorator configuration
//!
//! Configuration loaded from `.bb-pr-decorator.toml`. The access token may be
//! left out of the file and supplied through `BITBUCKET_TOKEN` instead.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::config_file::{find_config_file, read_config_file};
use crate::error::ConfigError;
use crate::statuses::ClosedStatuses;

/// Environment variable consulted when the config has no token
pub const TOKEN_ENV_VAR: &str = "BITBUCKET_TOKEN";

/// Configuration of one Bitbucket Server decoration target
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DecoratorConfig {
    /// Base URL of the Bitbucket Server instance (e.g., "https://bitbucket.example.com")
    #[serde(default)]
    pub base_url: String,

    /// Access token sent as bearer token
    #[serde(default, skip_serializing)]
    pub token: String,

    /// Slug of the repository the pull request belongs to
    #[serde(default)]
    pub repository_slug: String,

    /// Owner slug for personal repositories (`/users/{slug}`)
    #[serde(default)]
    pub user_slug: Option<String>,

    /// Project key for project repositories (`/projects/{key}`)
    #[serde(default)]
    pub project_key: Option<String>,

    /// Slug of the account the decorator posts as; identifies its old comments
    #[serde(default)]
    pub comment_author_slug: Option<String>,

    /// Optional side effects of a run
    #[serde(default)]
    pub features: FeatureFlags,

    /// Issue statuses that are never decorated
    #[serde(default)]
    pub closed_statuses: ClosedStatuses,

    /// Activities requested per page when looking for old comments
    #[serde(default = "default_activity_page_size")]
    pub activity_page_size: u32,

    /// Upper bound on activity pages scanned per run
    #[serde(default = "default_max_activity_pages")]
    pub max_activity_pages: u32,

    /// Timeout of a single HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Key of the Code Insights report the decorator owns on each commit
    #[serde(default = "default_insights_report_key")]
    pub insights_report_key: String,
}

/// Switches for the side effects of a decoration run
///
/// Read once at the start of a run.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Post the analysis summary as a general comment
    #[serde(default = "enabled")]
    pub summary_comment: bool,

    /// Post one anchored comment per open issue
    #[serde(default = "enabled")]
    pub file_comments: bool,

    /// Delete comments left by the previous run (needs `comment_author_slug`)
    #[serde(default = "enabled")]
    pub delete_old_comments: bool,

    /// Publish a Code Insights report with one annotation per open issue
    /// (needs the analysed commit and Bitbucket Server 5.15 or later)
    #[serde(default)]
    pub code_insights: bool,
}

fn enabled() -> bool {
    true
}

fn default_activity_page_size() -> u32 {
    250
}

fn default_max_activity_pages() -> u32 {
    20
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_insights_report_key() -> String {
    "bb-pr-decorator".to_string()
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            summary_comment: true,
            file_comments: true,
            delete_old_comments: true,
            code_insights: false,
        }
    }
}

impl FeatureFlags {
    /// All side effects switched off
    pub fn disabled() -> Self {
        Self {
            summary_comment: false,
            file_comments: false,
            delete_old_comments: false,
            code_insights: false,
        }
    }
}

impl Default for DecoratorConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            repository_slug: String::new(),
            user_slug: None,
            project_key: None,
            comment_author_slug: None,
            features: FeatureFlags::default(),
            closed_statuses: ClosedStatuses::default(),
            activity_page_size: default_activity_page_size(),
            max_activity_pages: default_max_activity_pages(),
            request_timeout_secs: default_request_timeout_secs(),
            insights_report_key: default_insights_report_key(),
        }
    }
}

impl DecoratorConfig {
    /// Load the config from `path`, or from the default locations
    ///
    /// Falls back to defaults if no file is found. The token from
    /// `BITBUCKET_TOKEN` is used when the file has none.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(find_config_file) {
            Some(path) => {
                let content = read_config_file(&path)?;
                let config = Self::from_toml_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))?;
                log::info!("Loaded decorator config from {:?}", path);
                config
            }
            None => {
                log::debug!("No config file found, using default decorator config");
                Self::default()
            }
        };

        config.apply_env_token(std::env::var(TOKEN_ENV_VAR).ok());
        Ok(config)
    }

    /// Parse a config from TOML
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Use `token` unless the config already has one
    pub fn apply_env_token(&mut self, token: Option<String>) {
        if !self.token.trim().is_empty() {
            return;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            log::debug!("Using token from {}", TOKEN_ENV_VAR);
            self.token = token;
        }
    }

    /// Check the properties every run needs
    ///
    /// The repository owner is checked when the endpoints are resolved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingProperty("base_url"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidProperty {
                name: "base_url",
                reason: format!("'{}' is not an http(s) URL", base_url),
            });
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingProperty("token"));
        }
        if self.repository_slug.trim().is_empty() {
            return Err(ConfigError::MissingProperty("repository_slug"));
        }
        if self.activity_page_size == 0 {
            return Err(ConfigError::InvalidProperty {
                name: "activity_page_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_activity_pages == 0 {
            return Err(ConfigError::InvalidProperty {
                name: "max_activity_pages",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.features.code_insights && self.insights_report_key.trim().is_empty() {
            return Err(ConfigError::MissingProperty("insights_report_key"));
        }
        Ok(())
    }

    /// Configured comment author, if it is not blank
    ///
    /// The slug is returned as configured; comments are matched on it exactly.
    pub fn comment_author(&self) -> Option<&str> {
        self.comment_author_slug
            .as_deref()
            .filter(|slug| !slug.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
