// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[cloud]` - Default shape, geometry, color scheme and layout seed
//! - `[text]` - Optional stopwords and extra segmentation words
//! - `[font]` - Path to a CJK-capable font
//! - `[export]` - JPEG quality and legend length
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `CLOUD_LENS_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use cloud_lens::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.cloud.color_scheme = Some("plasma".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::ShapeKind;
use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Word cloud generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloudConfig {
    /// Shape of the cloud (square, rectangle or circle).
    #[serde(
        default,
        deserialize_with = "deserialize_shape",
        serialize_with = "serialize_shape"
    )]
    pub shape: ShapeKind,

    /// Canvas width for squares and rectangles.
    #[serde(default = "default_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Canvas height for squares and rectangles.
    #[serde(default = "default_height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Circle radius. Takes precedence over width/height for circles.
    #[serde(default = "default_radius", skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,

    /// Color scheme name (e.g., "viridis", "tab10").
    #[serde(
        default = "default_color_scheme",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_scheme: Option<String>,

    /// Maximum number of words drawn.
    #[serde(default = "default_max_words", skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,

    /// Fixed layout seed. A fresh seed is used per generation when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::default(),
            width: default_width(),
            height: default_height(),
            radius: default_radius(),
            color_scheme: default_color_scheme(),
            max_words: default_max_words(),
            seed: None,
        }
    }
}

/// Tokenizer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TextConfig {
    /// Tokens removed before counting. Empty unless the user lists some.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stopwords: Vec<String>,

    /// Extra words added to the Han segmentation dictionary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_words: Vec<String>,
}

/// Font settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FontConfig {
    /// Path to a TrueType/OpenType font able to draw Han characters.
    /// System font directories are searched when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// JPEG quality (1 to 100).
    #[serde(
        default = "default_jpeg_quality",
        skip_serializing_if = "Option::is_none"
    )]
    pub jpeg_quality: Option<u8>,

    /// Number of words listed in the legend panel.
    #[serde(
        default = "default_legend_top_words",
        skip_serializing_if = "Option::is_none"
    )]
    pub legend_top_words: Option<usize>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            legend_top_words: default_legend_top_words(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub font: FontConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_width() -> Option<u32> {
    Some(DEFAULT_WIDTH)
}

fn default_height() -> Option<u32> {
    Some(DEFAULT_HEIGHT)
}

fn default_radius() -> Option<u32> {
    Some(DEFAULT_RADIUS)
}

fn default_color_scheme() -> Option<String> {
    Some(DEFAULT_COLOR_SCHEME.to_string())
}

fn default_max_words() -> Option<usize> {
    Some(DEFAULT_MAX_WORDS)
}

fn default_jpeg_quality() -> Option<u8> {
    Some(DEFAULT_JPEG_QUALITY)
}

fn default_legend_top_words() -> Option<usize> {
    Some(LEGEND_TOP_WORDS)
}

fn deserialize_shape<'de, D>(deserializer: D) -> std::result::Result<ShapeKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    raw.parse::<ShapeKind>().map_err(D::Error::custom)
}

fn serialize_shape<S>(shape: &ShapeKind, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(shape.as_str())
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!(
                            "ignoring unreadable settings file {}: {}",
                            path.display(),
                            err
                        )),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
