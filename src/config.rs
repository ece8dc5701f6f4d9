use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DiscoveryConfig {
    /// Directory scanned for task module documents.
    #[serde(default = "default_root")]
    pub root: String,
    /// Glob matched against paths relative to `root`.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_root() -> String {
    "tasks".to_string()
}

fn default_pattern() -> String {
    "**/*.{toml,json}".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            pattern: default_pattern(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UiConfig {
    /// Width in columns of the task panel overlay.
    #[serde(default = "default_panel_width")]
    pub panel_width: u16,
    /// Panel height as a percentage of the terminal height, clamped to 10..=100.
    #[serde(default = "default_panel_height_pct")]
    pub panel_height_pct: u16,
}

fn default_panel_width() -> u16 {
    42
}

fn default_panel_height_pct() -> u16 {
    70
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            panel_width: default_panel_width(),
            panel_height_pct: default_panel_height_pct(),
        }
    }
}

impl UiConfig {
    pub fn panel_height_pct_clamped(&self) -> u16 {
        self.panel_height_pct.clamp(10, 100)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// A missing file falls back to defaults; a present but malformed one is
    /// a hard error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
