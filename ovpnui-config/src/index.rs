//! Active directive index
//!
//! One name-keyed map holds both value and flag directives. Keys are
//! whatever precedes the first space of a directive line, so lookups made
//! with a full line (`"remote host 1194"`) resolve to the same entry as the
//! bare name.

use std::collections::HashMap;

/// An active directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `name value`
    Value(String),
    /// `name`
    Flag,
}

/// Name-keyed index of active directives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveIndex {
    entries: HashMap<String, Directive>,
}

/// Everything before the first space, or the whole line
pub fn directive_key(line: &str) -> &str {
    match line.find(' ') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Everything after the first space, or the whole line
pub fn directive_value(line: &str) -> &str {
    match line.find(' ') {
        Some(pos) => &line[pos + 1..],
        None => line,
    }
}

impl DirectiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Record a value directive, replacing any previous value
    pub fn insert_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), Directive::Value(value.into()));
    }

    /// Record a flag directive; an existing entry is kept
    pub fn insert_flag(&mut self, name: impl Into<String>) {
        self.entries.entry(name.into()).or_insert(Directive::Flag);
    }

    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.entries.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(Directive::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn has_flag(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Directive::Flag))
    }

    /// A flag named exactly `line`, or a value directive keyed by the
    /// first word of `line`
    pub fn is_active(&self, line: &str) -> bool {
        self.has_flag(line) || self.value(directive_key(line)).is_some()
    }

    /// Drop the flag named `line` and the value keyed by its first word
    pub fn remove(&mut self, line: &str) {
        if self.has_flag(line) {
            self.entries.remove(line);
        }
        let key = directive_key(line);
        if self.value(key).is_some() {
            self.entries.remove(key);
        }
    }

    /// Active value directives, sorted by name.
    ///
    /// Embedded material containing a space is indexed like any other line,
    /// so a key such as `"\n<ca>-----BEGIN"` can appear here.
    pub fn values(&self) -> Vec<(&str, &str)> {
        let mut values: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(name, d)| match d {
                Directive::Value(value) => Some((name.as_str(), value.as_str())),
                Directive::Flag => None,
            })
            .collect();
        values.sort_unstable();
        values
    }

    /// Active flag directives, sorted by name
    pub fn flags(&self) -> Vec<&str> {
        let mut flags: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, d)| matches!(d, Directive::Flag))
            .map(|(name, _)| name.as_str())
            .collect();
        flags.sort_unstable();
        flags
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_value() {
        assert_eq!(directive_key("remote host 1194"), "remote");
        assert_eq!(directive_value("remote host 1194"), "host 1194");
        assert_eq!(directive_key("nobind"), "nobind");
        assert_eq!(directive_key("remote "), "remote");
    }

    #[test]
    fn test_active_by_line_or_name() {
        let mut index = DirectiveIndex::new();
        index.insert_value("remote", "host 1194");
        index.insert_flag("remote-random");

        assert!(index.is_active("remote"));
        assert!(index.is_active("remote other 1"));
        assert!(index.is_active("remote-random"));
        assert!(!index.is_active("nobind"));
    }

    #[test]
    fn test_remove_value_keeps_similar_flag() {
        let mut index = DirectiveIndex::new();
        index.insert_value("remote", "host 1194");
        index.insert_flag("remote-random");

        index.remove("remote ");
        assert!(!index.is_active("remote"));
        assert!(index.has_flag("remote-random"));
        assert_eq!(index.flags(), vec!["remote-random"]);
    }

    #[test]
    fn test_flag_does_not_replace_value() {
        let mut index = DirectiveIndex::new();
        index.insert_value("dev", "tun");
        index.insert_flag("dev");
        assert_eq!(index.value("dev"), Some("tun"));
    }
}
