//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/qtree/qtree.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `QTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::transformer::DEFAULT_TITLE_SUFFIX;
use crate::domain::TreeTransformer;
use crate::util::path::expand_env_vars;

/// Unified configuration for qtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `<id>.json` question-tree documents
    pub content_dir: PathBuf,
    /// Suffix for generated titles: `"<content id> <suffix>"`
    pub title_suffix: String,
    /// Description used when a document has no summary/description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_description: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content/trees"),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
            default_description: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub content_dir: Option<PathBuf>,
    pub title_suffix: Option<String>,
    pub default_description: Option<String>,
}

/// Get the XDG config directory for qtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "qtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("qtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.content_dir.to_string_lossy().as_ref());
        self.content_dir = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            content_dir: overlay
                .content_dir
                .clone()
                .unwrap_or_else(|| self.content_dir.clone()),
            title_suffix: overlay
                .title_suffix
                .clone()
                .unwrap_or_else(|| self.title_suffix.clone()),
            default_description: overlay
                .default_description
                .clone()
                .or_else(|| self.default_description.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!("load: explicit config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply QTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("QTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("content_dir") {
            settings.content_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("title_suffix") {
            settings.title_suffix = val;
        }
        if let Ok(val) = config.get_string("default_description") {
            settings.default_description = Some(val);
        }

        Ok(settings)
    }

    /// Transformer configured from these settings.
    pub fn transformer(&self) -> TreeTransformer {
        TreeTransformer::new()
            .with_title_suffix(self.title_suffix.clone())
            .with_default_description(self.default_description.clone())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
