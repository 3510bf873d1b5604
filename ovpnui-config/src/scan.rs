//! Document scan
//!
//! Rebuilds the derived state of a document from scratch. Matching is by raw
//! substring, not by tokens: a line is indexed as `proto` when it contains
//! `"proto "` anywhere, and as `nobind` when it contains `"nobind"` anywhere.

use crate::catalog::{FLAG_DIRECTIVES, VALUE_DIRECTIVES};
use crate::index::{directive_value, DirectiveIndex};
use crate::tags::BlockTags;

/// Result of scanning a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// Retained lines, each newline terminated
    pub retained: String,
    /// Recognized directives
    pub index: DirectiveIndex,
    /// Embedded blocks seen
    pub tags: BlockTags,
}

/// Scan `text` against the directive catalog.
///
/// Blank lines and lines starting with `#` or `;` are dropped; every other
/// line is retained in order. For value directives the last matching line
/// wins.
pub fn scan(text: &str) -> Scan {
    let mut result = Scan::default();

    for line in text.lines() {
        if line.is_empty() || is_comment(line) {
            continue;
        }

        result.tags.detect(line);

        for (name, _) in VALUE_DIRECTIVES {
            if contains_word_then_space(line, name) {
                result.index.insert_value(*name, directive_value(line));
            }
        }

        for name in FLAG_DIRECTIVES {
            if line.contains(name) && !result.index.has_flag(name) {
                result.index.insert_flag(*name);
            }
        }

        result.retained.push_str(line);
        result.retained.push('\n');
    }

    result
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

/// Equivalent to `line.contains(&format!("{name} "))`
fn contains_word_then_space(line: &str, name: &str) -> bool {
    line.match_indices(name)
        .any(|(pos, _)| line.as_bytes().get(pos + name.len()) == Some(&b' '))
}
