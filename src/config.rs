//! Extraction configuration.
//!
//! Settings come from an optional YAML file (`repomap.yaml`), then CLI flags
//! and environment variables override individual fields.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["repomap.yaml", ".repomap.yaml"];

pub const DEFAULT_API_BASE: &str = "https://gitlab.com/api/v4";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_PER_PAGE: u32 = 1000;
pub const DEFAULT_OUTPUT: &str = "repo_metadata.json";

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("project id is required")]
    MissingProjectId,
    #[error("per_page must be between 1 and 10000, got {0}")]
    InvalidPerPage(u32),
    #[error("api_base must be an http(s) URL, got {0:?}")]
    InvalidApiBase(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub gitlab: GitLabConfig,
    /// Where the metadata document is written.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

/// Remote repository host settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitLabConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub project_id: String,
    /// Private token. Usually supplied through `GITLAB_TOKEN` rather than the file.
    #[serde(default, skip_serializing)]
    pub token: String,
    /// Branch reference used for raw file fetches.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Page size for the recursive tree listing.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            project_id: String::new(),
            token: String::new(),
            branch: default_branch(),
            per_page: default_per_page(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gitlab: GitLabConfig::default(),
            output: default_output(),
        }
    }
}

impl Config {
    /// Default configuration targeting one project.
    pub fn for_project(token: &str, project_id: &str) -> Self {
        let mut config = Self::default();
        config.gitlab.token = token.to_string();
        config.gitlab.project_id = project_id.to_string();
        config
    }

    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. An empty document gives the defaults.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Look for a config file in the current directory.
    pub fn discover() -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Check the settings needed before any network call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gitlab.project_id.trim().is_empty() {
            return Err(ConfigError::MissingProjectId);
        }
        if self.gitlab.per_page == 0 || self.gitlab.per_page > 10_000 {
            return Err(ConfigError::InvalidPerPage(self.gitlab.per_page));
        }
        let base = self.gitlab.api_base.as_str();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidApiBase(self.gitlab.api_base.clone()));
        }
        Ok(())
    }
}
