//! Settings loader

use crate::error::{Error, Result};
use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// Settings loader for JSON and TOML files
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Settings(format!("Failed to read settings file: {}", e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(Error::Config(format!("Unknown settings format: {}", ext))),
        }
    }

    /// Load an explicit settings file, or fall back to the per-user file and
    /// then to the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Settings> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading settings from {:?}", path);
                Self::load(path)
            }
            _ => Ok(Settings::default()),
        }
    }

    /// Per-user settings location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ovpnui").join("settings.toml"))
    }

    /// Parse JSON settings
    pub fn from_json(content: &str) -> Result<Settings> {
        serde_json::from_str(content)
            .map_err(|e| Error::Settings(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML settings
    pub fn from_toml(content: &str) -> Result<Settings> {
        toml::from_str(content)
            .map_err(|e| Error::Settings(format!("Invalid TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_loading() {
        let toml = r#"
            [header]
            app_name = "Acme VPN"
            project_url = "https://vpn.example.com"

            [save]
            confirm_missing_material = false
        "#;
        let settings = SettingsLoader::from_toml(toml).unwrap();
        assert_eq!(settings.header.app_name, "Acme VPN");
        assert!(!settings.save.confirm_missing_material);
        assert_eq!(settings.save.extension, "ovpn");
    }

    #[test]
    fn test_json_loading() {
        let settings = SettingsLoader::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"save": {"extension": "conf"}}"#).unwrap();

        let settings = SettingsLoader::load(&path).unwrap();
        assert_eq!(settings.save.extension, "conf");
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(SettingsLoader::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(SettingsLoader::load_or_default(Some(&path)).is_err());
    }
}
