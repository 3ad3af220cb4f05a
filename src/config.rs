//! Configuration file handling for ascii-art.
//!
//! Loads configuration from `~/.config/ascii-art/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::matching::DEFAULT_CHARSET;
use crate::output::{OutputKind, DEFAULT_FONT, DEFAULT_HTML_PATH};
use crate::raster::CacheKeying;

/// Starting resolution when neither the config nor the CLI sets one.
pub const DEFAULT_RESOLUTION: u32 = 128;

/// Configuration file structure for ascii-art.
/// Loaded from ~/.config/ascii-art/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    #[serde(default = "default_charset")]
    pub charset: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            charset: default_charset(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub kind: OutputKind,
    #[serde(default = "default_html_path")]
    pub html_path: PathBuf,
    #[serde(default = "default_font")]
    pub font: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: OutputKind::default(),
            html_path: default_html_path(),
            font: default_font(),
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct CacheConfig {
    #[serde(default)]
    pub keying: CacheKeying,
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

fn default_charset() -> String {
    DEFAULT_CHARSET.iter().collect()
}

fn default_html_path() -> PathBuf {
    PathBuf::from(DEFAULT_HTML_PATH)
}

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-art").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-art/config.toml")
        })
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ascii-art configuration

[render]
# Starting resolution (characters per row); clamped to the image's bounds
resolution = 128
# Starting character set
charset = "0123456789"

[output]
# Output method: console, html
kind = "console"
# File written by the html output
html_path = "out.html"
# Font family used by the html output
font = "Courier New"

[cache]
# How rendered images are recognized by the brightness cache:
#   identity - each loaded image is its own entry
#   content  - images with identical pixels share an entry
keying = "identity"
"#;
