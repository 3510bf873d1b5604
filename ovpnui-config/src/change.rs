//! Directive change commands
//!
//! Front-ends describe every edit as a `DirectiveChange` and hand it to
//! [`ConfigModel::apply`], instead of calling the individual mutators.

use crate::model::{ConfigModel, ModelEvent};
use crate::tags::{BlockTag, NO_CONTENT};

/// A single edit to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveChange {
    /// Write `name value`, replacing any active `name`
    Set { name: String, value: String },
    /// Write the flag `name`
    Enable(String),
    /// Remove the directive keyed by the first word of the given line
    Remove(String),
    /// Replace a block; `None` means no material was obtained
    Embed { tag: BlockTag, content: Option<String> },
    /// Remove a block
    Strip(BlockTag),
    /// Replace the raw text without re-scanning
    ReplaceText(String),
    /// Re-scan the current text
    Reparse,
    /// Reset to an empty document
    Clear,
    /// Write the built-in template
    Default,
}

impl DirectiveChange {
    /// `Set` for a non-empty value, otherwise `Remove` of the value
    /// directive `name`
    pub fn assign(name: &str, value: &str) -> Self {
        if value.is_empty() {
            DirectiveChange::Remove(format!("{} ", name))
        } else {
            DirectiveChange::Set {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
    }

    /// `Enable` or `Remove` for a flag directive
    pub fn toggle(name: &str, enabled: bool) -> Self {
        if enabled {
            DirectiveChange::Enable(name.to_string())
        } else {
            DirectiveChange::Remove(name.to_string())
        }
    }
}

impl ConfigModel {
    /// Apply one change
    pub fn apply(&mut self, change: DirectiveChange) {
        tracing::debug!("Applying {:?}", change);

        match change {
            DirectiveChange::Set { name, value } => self.add_line(&format!("{} {}", name, value)),
            DirectiveChange::Enable(name) => self.add_line(&name),
            DirectiveChange::Remove(key) => self.remove_line(&key),
            DirectiveChange::Embed { tag, content } => {
                self.add_tag(tag, content.as_deref().unwrap_or(NO_CONTENT))
            }
            DirectiveChange::Strip(tag) => {
                if self.remove_tag(tag) {
                    self.notify(ModelEvent::ParamsChanged);
                }
            }
            DirectiveChange::ReplaceText(text) => self.set_text(text),
            DirectiveChange::Reparse => self.reparse(),
            DirectiveChange::Clear => self.clear(),
            DirectiveChange::Default => self.initialize_default(),
        }
    }
}
