//! Settings type definitions
//!
//! These types describe how the editor renders and persists documents. They
//! never affect how a document is parsed.

use serde::{Deserialize, Serialize};

/// Root settings for OpenVPN UI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Header prepended to every saved document
    #[serde(default)]
    pub header: HeaderSettings,

    /// Save behaviour
    #[serde(default)]
    pub save: SaveSettings,
}

/// Header comment written at the top of serialized documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaderSettings {
    /// Application name shown on the first header line
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Project URL shown on the second header line
    #[serde(default = "default_project_url")]
    pub project_url: String,
}

impl HeaderSettings {
    /// Render the two header lines, newline terminated
    pub fn render(&self) -> String {
        format!("# Config created by {} #\n# {} #\n", self.app_name, self.project_url)
    }
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            project_url: default_project_url(),
        }
    }
}

fn default_app_name() -> String {
    "OpenVPN UI".to_string()
}

fn default_project_url() -> String {
    "https://github.com/vgezer/openvpnui".to_string()
}

/// Save configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveSettings {
    /// Ask before saving a document that lacks `ca`, `cert` or `key` material
    #[serde(default = "default_bool_true")]
    pub confirm_missing_material: bool,

    /// File extension offered for new documents
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            confirm_missing_material: true,
            extension: default_extension(),
        }
    }
}

fn default_bool_true() -> bool {
    true
}

fn default_extension() -> String {
    "ovpn".to_string()
}
