use crate::error::ThemeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "gtk-theme-switcher";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search roots in priority order; `$HOME` is expanded.
    pub theme_paths: Vec<String>,
    /// Where the gtk-3.0/gtk-4.0 link trees and the marker live.
    pub config_path: String,
    pub marker_file: String,
    /// Name of the "no theme" entry.
    pub empty_theme: String,
    pub gsettings_schema: String,
    pub gsettings_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme_paths: vec![
                "/usr/share/themes".to_string(),
                "$HOME/.themes".to_string(),
                "$HOME/.local/share/themes".to_string(),
            ],
            config_path: "$HOME/.config".to_string(),
            marker_file: "gtk-theme-name".to_string(),
            // libadwaita skips loading a user theme with this name
            empty_theme: "Adwaita-empty".to_string(),
            gsettings_schema: "org.gnome.desktop.interface".to_string(),
            gsettings_key: "gtk-theme".to_string(),
        }
    }
}

/// Get app directory path (~/.config/gtk-theme-switcher)
pub fn get_app_dir(home: &str) -> PathBuf {
    if home.is_empty() {
        PathBuf::from(".config").join(APP_NAME)
    } else {
        PathBuf::from(home).join(".config").join(APP_NAME)
    }
}

/// Load configuration from `path`, falling back to defaults when it does
/// not exist
pub fn load_config(path: &Path) -> Result<AppConfig, ThemeError> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ThemeError::Config {
        path: path.to_path_buf(),
        source,
    })
}
