//! Embedded certificate/key blocks
//!
//! OpenVPN lets key material live inline, wrapped in `<tag>...</tag>`. The
//! model tracks three such tags and whether each is present.

use std::fmt;
use std::str::FromStr;

/// Marker meaning "no content was obtained" for a block
pub const NO_CONTENT: &str = "N/A";

/// Embedded block tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Ca,
    Cert,
    Key,
}

impl BlockTag {
    /// All tags, in document order
    pub const ALL: [BlockTag; 3] = [BlockTag::Ca, BlockTag::Cert, BlockTag::Key];

    pub fn name(self) -> &'static str {
        match self {
            BlockTag::Ca => "ca",
            BlockTag::Cert => "cert",
            BlockTag::Key => "key",
        }
    }

    /// `<tag>`
    pub fn open_marker(self) -> &'static str {
        match self {
            BlockTag::Ca => "<ca>",
            BlockTag::Cert => "<cert>",
            BlockTag::Key => "<key>",
        }
    }

    /// `</tag>`
    pub fn close_marker(self) -> &'static str {
        match self {
            BlockTag::Ca => "</ca>",
            BlockTag::Cert => "</cert>",
            BlockTag::Key => "</key>",
        }
    }

    /// Render a block line as appended to the document
    pub fn wrap(self, content: &str) -> String {
        format!("\n{}{}{}", self.open_marker(), content, self.close_marker())
    }

    fn slot(self) -> usize {
        match self {
            BlockTag::Ca => 0,
            BlockTag::Cert => 1,
            BlockTag::Key => 2,
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown block tag name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown block tag: {0} (expected ca, cert or key)")]
pub struct UnknownTag(pub String);

impl FromStr for BlockTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ca" => Ok(BlockTag::Ca),
            "cert" => Ok(BlockTag::Cert),
            "key" => Ok(BlockTag::Key),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

/// Active flags for the three block tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockTags {
    active: [bool; 3],
}

impl BlockTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, tag: BlockTag) -> bool {
        self.active[tag.slot()]
    }

    pub fn set(&mut self, tag: BlockTag, active: bool) {
        self.active[tag.slot()] = active;
    }

    /// Tags whose block is not present
    pub fn missing(&self) -> Vec<BlockTag> {
        BlockTag::ALL
            .into_iter()
            .filter(|tag| !self.is_active(*tag))
            .collect()
    }

    /// Mark every tag whose opening marker occurs in `line`
    pub(crate) fn detect(&mut self, line: &str) {
        for tag in BlockTag::ALL {
            if line.contains(tag.open_marker()) {
                self.set(tag, true);
            }
        }
    }
}
