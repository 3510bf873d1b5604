//! OpenVPN UI Core Library
//!
//! This crate provides the pieces shared by the configuration model and the
//! front-end: the error type and the application settings.

pub mod error;
pub mod settings;

pub use error::{Error, Result};
pub use settings::{HeaderSettings, SaveSettings, Settings, SettingsLoader};

/// OpenVPN UI version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
