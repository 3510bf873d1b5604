//! Application settings

mod loader;
mod types;

pub use self::loader::SettingsLoader;
pub use self::types::{HeaderSettings, SaveSettings, Settings};
