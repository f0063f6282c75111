use anyhow::Context;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Runtime configuration for the overlay panel. Values are clamped to sane
/// ranges on load so the rest of the code never has to defend against a
/// zero-height panel or a negative offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub panel: PanelConfig,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        match Self::find_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let doc: ConfigDocument = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(doc.into())
    }

    /// First existing config file among the usual candidates, used both for
    /// the initial load and for arming the change watcher.
    pub fn find_path() -> Option<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join("config.toml"));
            candidates.push(current_dir.join("config").join("config.toml"));
            candidates.push(current_dir.join("config").join("music_lounge.toml"));
        }

        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("config.toml"));
                candidates.push(dir.join("config").join("config.toml"));
                candidates.push(dir.join("config").join("music_lounge.toml"));
            }
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub width: u32,
    pub height: u32,
    pub font_size: f32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 48,
            font_size: 11.0,
            offset_x: 12,
            offset_y: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeConfig {
    pub auto_theme: bool,
    /// Manual text color as an RRGGBB hex string, used when `auto_theme` is
    /// off or the system theme cannot be queried.
    pub text_color: String,
    pub bg_opacity: u8,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            auto_theme: true,
            text_color: "FFFFFF".to_string(),
            bg_opacity: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    panel: PanelSection,
    #[serde(default)]
    theme: ThemeSection,
}

impl From<ConfigDocument> for Config {
    fn from(value: ConfigDocument) -> Self {
        let defaults = PanelConfig::default();
        let panel = PanelConfig {
            width: value.panel.width.unwrap_or(defaults.width).max(100),
            height: value.panel.height.unwrap_or(defaults.height).max(24),
            font_size: value
                .panel
                .font_size
                .unwrap_or(defaults.font_size)
                .clamp(6.0, 48.0),
            offset_x: value.panel.offset_x.unwrap_or(defaults.offset_x),
            offset_y: value.panel.offset_y.unwrap_or(defaults.offset_y),
        };

        let theme_defaults = ThemeConfig::default();
        let theme = ThemeConfig {
            auto_theme: value.theme.auto_theme.unwrap_or(theme_defaults.auto_theme),
            text_color: value
                .theme
                .text_color
                .unwrap_or(theme_defaults.text_color),
            bg_opacity: value.theme.bg_opacity.unwrap_or(0).clamp(0, 255) as u8,
        };

        Config { panel, theme }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PanelSection {
    width: Option<u32>,
    height: Option<u32>,
    font_size: Option<f32>,
    offset_x: Option<u32>,
    offset_y: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ThemeSection {
    auto_theme: Option<bool>,
    text_color: Option<String>,
    bg_opacity: Option<u32>,
}
