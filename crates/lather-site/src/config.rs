#![forbid(unsafe_code)]

//! Site configuration.
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables. Every field has a default, so an empty file (or no file) is a
//! valid configuration.
//!
//! ```toml
//! # lather.toml
//! content_dir = "public/data"
//! unit = "oz"
//!
//! [recipe]
//! empty_message = "Add a fat to get started."
//!
//! [ui]
//! toast_duration_ms = 3000
//! viewport = [1280, 800]
//!
//! [log]
//! filter = "lather=debug"
//! json = true
//! ```
//!
//! Environment overrides: `LATHER_CONTENT_DIR`, `LATHER_UNIT`.

use std::path::{Path, PathBuf};

use lather_core::geometry::{Rect, Size};
use lather_widgets::TooltipPlacement;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{Result, SiteError};

/// Variable overriding [`SiteConfig::content_dir`].
pub const ENV_CONTENT_DIR: &str = "LATHER_CONTENT_DIR";
/// Variable overriding [`SiteConfig::unit`].
pub const ENV_UNIT: &str = "LATHER_UNIT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the JSON content files.
    pub content_dir: PathBuf,
    /// Weight unit shown next to quantities.
    pub unit: String,
    pub recipe: RecipeConfig,
    pub ui: UiSettings,
    pub log: LogConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("data"),
            unit: "g".to_string(),
            recipe: RecipeConfig::default(),
            ui: UiSettings::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeConfig {
    /// Shown in place of rows when the recipe is empty.
    pub empty_message: String,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            empty_message: "No fats added yet. Pick a fat to start your recipe.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Lifetime of notification toasts; 0 keeps them until dismissed.
    pub toast_duration_ms: u64,
    /// Region made inert while a side panel is open.
    pub main_content_id: String,
    /// Width and height glossary tooltips are kept inside.
    pub viewport: [i32; 2],
    /// Width and height reserved for a glossary tooltip.
    pub tooltip_size: [i32; 2],
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            toast_duration_ms: 4000,
            main_content_id: "main-content".to_string(),
            viewport: [1280, 800],
            tooltip_size: [280, 120],
        }
    }
}

impl UiSettings {
    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Placement of a tooltip next to `anchor`.
    #[must_use]
    pub fn tooltip_placement(&self, anchor: Rect) -> TooltipPlacement {
        let [vw, vh] = self.viewport;
        let [tw, th] = self.tooltip_size;
        TooltipPlacement::new(anchor, Rect::from_size(vw, vh), Size::new(tw, th))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `LATHER_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl SiteConfig {
    pub fn from_toml_str(s: &str, origin: &Path) -> Result<Self> {
        toml::from_str(s).map_err(|source| SiteError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, path)
    }

    /// Load `path` if given, apply environment overrides, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(SiteError::ConfigInvalid { problems });
        }
        tracing::debug!(
            content_dir = %config.content_dir.display(),
            unit = %config.unit,
            "config loaded"
        );
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(dir) = get(ENV_CONTENT_DIR) {
            self.content_dir = PathBuf::from(dir);
        }
        if let Some(unit) = get(ENV_UNIT) {
            self.unit = unit.trim().to_string();
        }
    }

    /// Problems with the configuration. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.content_dir.as_os_str().is_empty() {
            errors.push("content_dir must not be empty".to_string());
        }
        if self.unit.trim().is_empty() {
            errors.push("unit must not be empty".to_string());
        } else if self.unit.chars().count() > 8 {
            errors.push(format!("unit {:?} is longer than 8 characters", self.unit));
        }
        if self.ui.main_content_id.trim().is_empty() {
            errors.push("ui.main_content_id must not be empty".to_string());
        }
        for (name, [w, h]) in [("viewport", self.ui.viewport), ("tooltip_size", self.ui.tooltip_size)] {
            if w <= 0 || h <= 0 {
                errors.push(format!("ui.{name} must be positive, got [{w}, {h}]"));
            }
        }
        if self.ui.toast_duration_ms > 60_000 {
            errors.push(format!(
                "ui.toast_duration_ms {} exceeds 60000",
                self.ui.toast_duration_ms
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        let config = SiteConfig::from_toml_str("", Path::new("lather.toml")).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SiteConfig::from_toml_str(
            "unit = \"oz\"\n[ui]\ntoast_duration_ms = 0\n[log]\njson = true\n",
            Path::new("lather.toml"),
        )
        .unwrap();
        assert_eq!(config.unit, "oz");
        assert_eq!(config.ui.toast_duration(), Duration::ZERO);
        assert_eq!(config.ui.main_content_id, "main-content");
        assert!(config.log.json);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let mut config = SiteConfig::default();
        config.apply_env(|key| match key {
            ENV_CONTENT_DIR => Some("site/data".to_string()),
            ENV_UNIT => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.content_dir, PathBuf::from("site/data"));
        assert_eq!(config.unit, "g");
    }

    #[test]
    fn validate_lists_every_problem() {
        let config = SiteConfig {
            content_dir: PathBuf::new(),
            unit: String::new(),
            ui: UiSettings {
                toast_duration_ms: 120_000,
                tooltip_size: [280, 0],
                ..UiSettings::default()
            },
            ..SiteConfig::default()
        };
        assert_eq!(config.validate().len(), 4);
    }

    #[test]
    fn bad_toml_names_the_file() {
        let error = SiteConfig::from_toml_str("unit = [", Path::new("conf/lather.toml")).unwrap_err();
        assert!(error.to_string().starts_with("invalid config conf"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lather.toml");
        std::fs::write(&path, "content_dir = \"content\"\n").unwrap();
        let config = SiteConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.content_dir, PathBuf::from("content"));
    }
}
