//! Configuration management for emtag.
//!
//! Parses `emtag.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## File Format
//!
//! ```toml
//! [emphasis]
//! "_" = "u"
//! "__" = "b"
//! "*" = "i"
//! "**" = "strong"
//!
//! [markdown]
//! gfm = true
//! ```
//!
//! Keys in `[emphasis]` other than the four markers, and values that are not
//! strings, are ignored rather than rejected.

use std::path::{Path, PathBuf};

use emtag_core::{EmphasisOptions, Marker};
use serde::{Deserialize, Deserializer};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "emtag.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only set values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Per-marker tag overrides.
    pub emphasis: EmphasisOptions,
    /// Override GFM flag.
    pub gfm: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output tag per emphasis marker.
    #[serde(deserialize_with = "deserialize_emphasis")]
    pub emphasis: EmphasisOptions,
    /// Markdown parser configuration.
    pub markdown: MarkdownConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown parser configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read the `[emphasis]` table, keeping only marker keys with string values.
fn deserialize_emphasis<'de, D>(deserializer: D) -> Result<EmphasisOptions, D::Error>
where
    D: Deserializer<'de>,
{
    let value = toml::Value::deserialize(deserializer)?;
    let Some(table) = value.as_table() else {
        return Ok(EmphasisOptions::new());
    };
    Ok(EmphasisOptions::from_pairs(
        table
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|tag| (key, tag))),
    ))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `emtag.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        for (marker, tag) in settings.emphasis.iter() {
            self.emphasis.set(marker, tag);
        }
        if let Some(gfm) = settings.gfm {
            self.markdown.gfm = gfm;
        }
    }

    /// Configured tag for one marker.
    #[must_use]
    pub fn tag_for(&self, marker: Marker) -> Option<&str> {
        self.emphasis.get(marker)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file starting at `start` and walking up.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.emphasis.is_empty());
        assert!(config.markdown.gfm);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.emphasis.is_empty());
        assert!(config.markdown.gfm);
    }

    #[test]
    fn test_parse_emphasis_table() {
        let toml = r#"
[emphasis]
"_" = "u"
"__" = "b"
"*" = "i"
"**" = "strong"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tag_for(Marker::Underscore), Some("u"));
        assert_eq!(config.tag_for(Marker::DoubleUnderscore), Some("b"));
        assert_eq!(config.tag_for(Marker::Asterisk), Some("i"));
        assert_eq!(config.tag_for(Marker::DoubleAsterisk), Some("strong"));
    }

    #[test]
    fn test_partial_emphasis_table() {
        let toml = r#"
[emphasis]
"*" = "i"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tag_for(Marker::Asterisk), Some("i"));
        assert_eq!(config.tag_for(Marker::Underscore), None);
    }

    #[test]
    fn test_unknown_keys_and_non_strings_ignored() {
        let toml = r#"
[emphasis]
"_" = 3
"~~" = "del"
"*" = "i"
"__" = ""
"**" = { tag = "b" }
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let entries: Vec<_> = config.emphasis.iter().collect();
        assert_eq!(entries, vec![(Marker::Asterisk, "i")]);
    }

    #[test]
    fn test_non_table_emphasis_ignored() {
        let config: Config = toml::from_str(r#"emphasis = "i""#).unwrap();
        assert!(config.emphasis.is_empty());
    }

    #[test]
    fn test_parse_markdown_config() {
        let toml = r"
[markdown]
gfm = false
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.markdown.gfm);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result: Result<Config, _> = toml::from_str("[markdown\ngfm = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings_overrides_markers() {
        let mut config: Config = toml::from_str(
            r#"
[emphasis]
"_" = "u"
"*" = "i"
"#,
        )
        .unwrap();
        let settings = CliSettings {
            emphasis: EmphasisOptions::new().with(Marker::Asterisk, "cite"),
            gfm: Some(false),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.tag_for(Marker::Asterisk), Some("cite"));
        assert_eq!(config.tag_for(Marker::Underscore), Some("u")); // Unchanged
        assert!(!config.markdown.gfm);
    }

    #[test]
    fn test_apply_empty_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.emphasis.is_empty());
        assert!(config.markdown.gfm);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[emphasis]\n\"__\" = \"b\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.tag_for(Marker::DoubleUnderscore), Some("b"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[emphasis\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[emphasis]\n\"_\" = \"u\"\n").unwrap();
        let settings = CliSettings {
            emphasis: EmphasisOptions::new().with(Marker::Underscore, "em"),
            gfm: None,
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.tag_for(Marker::Underscore), Some("em"));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_from(&nested), Some(path));
    }
}
