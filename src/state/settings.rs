use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use gpui::{App, AppContext, Entity, Global};
use serde::{Deserialize, Serialize};

/// Persisted application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Marketplace API endpoint
  pub api_url: String,
  /// Account API key; empty means unauthenticated browsing
  pub api_key: String,
  /// Container image tags offered in the reserve dialog, in order
  pub image_tags: Vec<String>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_url: "https://console.vast.ai".to_string(),
      api_key: String::new(),
      image_tags: Vec::new(),
    }
  }
}

impl Settings {
  /// Settings file location under the user config directory
  pub fn path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("berth").join("settings.json"))
  }

  /// Load settings from disk, falling back to defaults when the file is
  /// missing or unreadable
  pub fn load() -> Self {
    let Some(path) = Self::path() else {
      return Self::default();
    };

    match fs::read_to_string(&path) {
      Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed settings file {}: {e}", path.display());
        Self::default()
      }),
      Err(_) => Self::default(),
    }
  }

  pub fn save(&self) -> Result<()> {
    let path = Self::path().context("no config directory available")?;
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(self)?;
    fs::write(&path, contents)?;
    Ok(())
  }
}

/// Global settings holder
pub struct SettingsState {
  pub settings: Settings,
}

/// Global wrapper for `SettingsState`
pub struct GlobalSettingsState(pub Entity<SettingsState>);

impl Global for GlobalSettingsState {}

/// Initialize the global settings state from disk
pub fn init_settings(cx: &mut App) -> Entity<SettingsState> {
  let state = cx.new(|_cx| SettingsState {
    settings: Settings::load(),
  });
  cx.set_global(GlobalSettingsState(state.clone()));
  state
}

/// Get the global settings state entity
pub fn settings_state(cx: &App) -> Entity<SettingsState> {
  cx.global::<GlobalSettingsState>().0.clone()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.api_url, "https://console.vast.ai");
    assert!(settings.api_key.is_empty());
    assert!(settings.image_tags.is_empty());
  }

  #[test]
  fn test_settings_partial_file_fills_defaults() {
    let settings: Settings = serde_json::from_str(r#"{"api_key": "sk-123"}"#).unwrap();
    assert_eq!(settings.api_key, "sk-123");
    assert_eq!(settings.api_url, "https://console.vast.ai");
  }

  #[test]
  fn test_settings_round_trip() {
    let settings = Settings {
      api_url: "http://localhost:9000".to_string(),
      api_key: "key".to_string(),
      image_tags: vec!["img:v1".to_string(), "img:v2".to_string()],
    };
    let json = serde_json::to_string(&settings).unwrap();
    let back: Settings = serde_json::from_str(&json).unwrap();
    assert_eq!(back, settings);
  }

  #[test]
  fn test_settings_path_ends_with_app_file() {
    if let Some(path) = Settings::path() {
      assert!(path.ends_with("berth/settings.json"));
    }
  }
}
