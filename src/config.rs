//! Runtime configuration.
//!
//! Configuration comes from an optional TOML file plus a small set of
//! environment overrides. Anything more elaborate (layered merging, per-project
//! profiles) belongs to the embedding application.

use crate::workflow::approval::DEFAULT_REVIEW_BODY;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Environment variable overriding [`AtelierConfig::store_root`].
pub const STORE_ROOT_ENV: &str = "ATELIER_STORE_ROOT";
/// Environment variable overriding [`AtelierConfig::output`].
pub const OUTPUT_ENV: &str = "ATELIER_OUTPUT";

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Human-readable progress and messages.
    #[default]
    Text,
    /// Machine-readable output; progress chatter is suppressed.
    Json,
}

impl OutputMode {
    /// Returns whether output must stay machine-readable.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl TryFrom<&str> for OutputMode {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidOutputMode(value.to_owned())),
        }
    }
}

/// Settings for the approval workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    /// Body used for pull request reviews and fallback comments.
    pub review_body: String,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            review_body: DEFAULT_REVIEW_BODY.to_owned(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    /// Directory holding workspace, task and backlog records.
    pub store_root: Utf8PathBuf,
    /// Git repository that owns the workspace worktrees.
    pub repository_root: Utf8PathBuf,
    /// Output rendering mode.
    pub output: OutputMode,
    /// Whether interactive menus may be shown.
    pub interactive: bool,
    /// Approval workflow settings.
    pub approval: ApprovalConfig,
}

impl Default for AtelierConfig {
    fn default() -> Self {
        Self {
            store_root: Utf8PathBuf::from(".atelier"),
            repository_root: Utf8PathBuf::from("."),
            output: OutputMode::Text,
            interactive: true,
            approval: ApprovalConfig::default(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The output mode override is not recognised.
    #[error("unknown output mode '{0}', expected 'text' or 'json'")]
    InvalidOutputMode(String),
}

impl AtelierConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads configuration from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] for I/O failures other than a missing
    /// file, and [`ConfigError::Parse`] for malformed content.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };
        let Some(file_name) = path.file_name() else {
            return Ok(Self::default());
        };
        let read_error = |source: io::Error| ConfigError::Read {
            path: path.to_owned(),
            source,
        };

        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(read_error(err)),
        };
        match dir.read_to_string(file_name) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(read_error(err)),
        }
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOutputMode`] when `ATELIER_OUTPUT` holds
    /// an unknown value.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOutputMode`] when the output override
    /// holds an unknown value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(root) = lookup(STORE_ROOT_ENV).filter(|value| !value.trim().is_empty()) {
            self.store_root = Utf8PathBuf::from(root.trim());
        }
        if let Some(mode) = lookup(OUTPUT_ENV) {
            self.output = OutputMode::try_from(mode.as_str())?;
        }
        Ok(self)
    }
}
