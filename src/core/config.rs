//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Endpoint the final payload is posted to unless configured otherwise
pub const DEFAULT_SUBMIT_URL: &str = "https://udyam-backend.up.railway.app/api/submit";

/// File name of the per-directory config
pub const LOCAL_CONFIG_FILE: &str = ".udyam.yaml";

/// Udyam configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Submission endpoint
    pub submit_url: Option<String>,

    /// Form document to use instead of the built-in one
    pub schema: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut files = Vec::new();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/udyam/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            files.push(global_path);
        }

        // 3. Local config (./.udyam.yaml)
        files.push(Self::local_config_path());

        // 4. Environment variables
        Self::from_sources(&files, |key| std::env::var(key).ok())
    }

    /// Merge the given files in order, then environment overrides
    ///
    /// Missing or unparseable files are skipped.
    pub fn from_sources(files: &[PathBuf], env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        for path in files {
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_yml::from_str::<Config>(&contents) {
                    Ok(file_config) => config.merge(file_config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file")
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file")
                }
            }
        }

        if let Some(url) = env("UDYAM_SUBMIT_URL") {
            config.submit_url = Some(url);
        }
        if let Some(schema) = env("UDYAM_SCHEMA") {
            config.schema = Some(PathBuf::from(schema));
        }

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "udyam")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.submit_url.is_some() {
            self.submit_url = other.submit_url;
        }
        if other.schema.is_some() {
            self.schema = other.schema;
        }
    }

    /// Apply command-line overrides, which take precedence over everything
    pub fn with_overrides(mut self, submit_url: Option<String>, schema: Option<PathBuf>) -> Self {
        self.merge(Config { submit_url, schema });
        self
    }

    pub fn submit_url(&self) -> &str {
        self.submit_url.as_deref().unwrap_or(DEFAULT_SUBMIT_URL)
    }

    pub fn schema_path(&self) -> Option<&Path> {
        self.schema.as_deref()
    }
}
