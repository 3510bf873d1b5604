//! Configuration model
//!
//! `ConfigModel` owns the retained document text and the state derived from
//! it. Every load rebuilds the derived state from scratch; mutations keep the
//! text and the index in step without re-scanning.
//!
//! Listeners registered with [`ConfigModel::subscribe`] are called
//! synchronously once a mutation has completed, so they may query the model
//! freely. They must not try to mutate it.

use crate::catalog;
use crate::index::DirectiveIndex;
use crate::scan::scan;
use crate::source::{ConfigSink, ConfigSource, MaterialSource};
use crate::tags::{BlockTag, BlockTags, NO_CONTENT};
use ovpnui_core::HeaderSettings;
use std::fmt;
use thiserror::Error;

/// Canonical minimal client configuration written by
/// [`ConfigModel::initialize_default`], below the header
pub const DEFAULT_TEMPLATE: &str = concat!(
    "client\n",
    "dev tun\n",
    "proto udp\n",
    "remote example.org 1194\n",
    "resolv-retry infinite\n",
    "user nobody\n",
    "group nogroup\n",
    "ns-cert-type server\n",
    "comp-lzo\n",
    "nobind\n",
    "persist-key\n",
    "persist-tun\n",
    "verb 3\n",
);

/// Change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// The document was (re)loaded and the derived state rebuilt
    DocumentLoaded,
    /// A directive, block or the default template was written
    ParamsChanged,
}

/// Save failures; the model is never modified by a failed save
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Save declined, missing material: {}", join_tags(.missing))]
    Declined { missing: Vec<BlockTag> },

    #[error("Destination unwritable: {0}")]
    Unwritable(#[from] std::io::Error),
}

fn join_tags(tags: &[BlockTag]) -> String {
    tags.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
}

type Listener = Box<dyn Fn(&ConfigModel, ModelEvent)>;

/// In-memory OpenVPN client configuration
pub struct ConfigModel {
    text: String,
    index: DirectiveIndex,
    tags: BlockTags,
    header: HeaderSettings,
    revision: u64,
    listeners: Vec<Listener>,
}

// Manual Debug because listeners are closures
impl fmt::Debug for ConfigModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigModel")
            .field("text_len", &self.text.len())
            .field("index", &self.index)
            .field("tags", &self.tags)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ConfigModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigModel {
    /// Create an empty model with the default header
    pub fn new() -> Self {
        Self::with_header(HeaderSettings::default())
    }

    /// Create an empty model that writes `header` on serialization
    pub fn with_header(header: HeaderSettings) -> Self {
        Self {
            text: String::new(),
            index: DirectiveIndex::new(),
            tags: BlockTags::new(),
            header,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a change listener
    pub fn subscribe(&mut self, listener: impl Fn(&ConfigModel, ModelEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Number of notifications fired so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ============================================================
    // Loading
    // ============================================================

    /// Replace the document with `text`, dropping comments and blank lines,
    /// and rebuild the derived state
    pub fn load(&mut self, text: &str) {
        let scanned = scan(text);
        self.text = scanned.retained;
        self.index = scanned.index;
        self.tags = scanned.tags;

        tracing::debug!(
            "Loaded document: {} bytes retained, {} directive(s) indexed",
            self.text.len(),
            self.index.len()
        );
        self.notify(ModelEvent::DocumentLoaded);
    }

    /// Load from a collaborator. Returns `false` and leaves the model
    /// untouched when nothing was obtained.
    pub fn load_from(&mut self, source: &mut dyn ConfigSource) -> bool {
        match source.obtain() {
            Some(text) => {
                self.load(&text);
                true
            }
            None => {
                tracing::debug!("No document obtained, keeping current state");
                false
            }
        }
    }

    /// Re-run [`load`](Self::load) against the current text, e.g. after a
    /// manual edit through [`set_text`](Self::set_text)
    pub fn reparse(&mut self) {
        let text = std::mem::take(&mut self.text);
        self.load(&text);
    }

    /// Reset to an empty document
    pub fn clear(&mut self) {
        self.text.clear();
        self.reparse();
    }

    /// Replace the text with the header and [`DEFAULT_TEMPLATE`].
    ///
    /// The derived state is not rebuilt: queries keep answering for the
    /// previous document until [`reparse`](Self::reparse) is called.
    pub fn initialize_default(&mut self) {
        self.text = self.header.render();
        self.text.push_str(DEFAULT_TEMPLATE);
        self.notify(ModelEvent::ParamsChanged);
    }

    /// Header followed by the retained text
    pub fn serialize(&self) -> String {
        let mut out = self.header.render();
        out.push_str(&self.text);
        out
    }

    // ============================================================
    // Directives
    // ============================================================

    /// Append a directive line (`"name value"` or `"name"`), replacing an
    /// active directive with the same key
    pub fn add_line(&mut self, line: &str) {
        self.insert_line(line);
        self.notify(ModelEvent::ParamsChanged);
    }

    /// Remove the directive keyed by the first word of `line`. No-op unless
    /// that directive is active.
    ///
    /// The text removed starts at the first raw occurrence of the key (with
    /// its trailing space, if `line` has one) and runs through the next
    /// newline. The occurrence is not required to start a line, so a key
    /// that also appears inside an earlier value is cut from there.
    pub fn remove_line(&mut self, line: &str) {
        if self.erase_line(line) {
            self.notify(ModelEvent::ParamsChanged);
        }
    }

    fn insert_line(&mut self, line: &str) {
        if self.index.is_active(line) {
            self.erase_line(line);
        }

        match line.find(' ') {
            Some(pos) if pos > 0 => self.index.insert_value(&line[..pos], &line[pos + 1..]),
            _ => self.index.insert_flag(line),
        }

        self.text.push_str(line);
        self.text.push('\n');
        tracing::debug!("Added directive line {:?}", line);
    }

    fn erase_line(&mut self, line: &str) -> bool {
        if !self.index.is_active(line) {
            return false;
        }
        self.index.remove(line);

        let needle = match line.find(' ') {
            Some(pos) if pos > 0 => &line[..=pos],
            _ => line,
        };

        if let Some(start) = self.text.find(needle) {
            let end = self.text[start..]
                .find('\n')
                .map(|offset| start + offset + 1)
                .unwrap_or(self.text.len());
            self.text.replace_range(start..end, "");
            tracing::debug!("Removed directive {:?}", needle.trim_end());
        }
        true
    }

    // ============================================================
    // Embedded blocks
    // ============================================================

    /// Replace the `tag` block with `content`. [`NO_CONTENT`] is ignored.
    ///
    /// The wrapped block goes through the same path as a directive line, so
    /// material containing a space is also indexed as a value keyed by its
    /// first word (e.g. `"\n<ca>-----BEGIN"`). That entry outlives the block
    /// and shows up in [`DirectiveIndex::values`].
    pub fn add_tag(&mut self, tag: BlockTag, content: &str) {
        if content == NO_CONTENT {
            tracing::debug!("No {} material obtained, leaving document unchanged", tag);
            return;
        }

        self.remove_tag(tag);
        self.insert_line(&tag.wrap(content));
        self.tags.set(tag, true);
        self.notify(ModelEvent::ParamsChanged);
    }

    /// Embed material obtained from a collaborator. Returns `false` when
    /// nothing was obtained.
    pub fn embed_from(&mut self, tag: BlockTag, source: &mut dyn MaterialSource) -> bool {
        match source.obtain_bytes() {
            Some(bytes) => {
                self.add_tag(tag, &String::from_utf8_lossy(&bytes));
                true
            }
            None => false,
        }
    }

    /// Delete the first `<tag>...</tag>` span (and the newline after it) and
    /// clear the tag's flag. Text is left alone unless both markers are
    /// found in order.
    ///
    /// The newline that [`BlockTag::wrap`] puts in front of an embedded block
    /// is not removed, so replacing a block repeatedly in one session leaves
    /// one blank line per replacement until the next load drops them.
    ///
    /// Returns `true` when text was deleted or the flag was cleared.
    pub fn remove_tag(&mut self, tag: BlockTag) -> bool {
        let open = self.text.find(tag.open_marker());
        let close = self.text.find(tag.close_marker());

        let removed = match (open, close) {
            (Some(start), Some(close)) if close > start => {
                let mut end = close + tag.close_marker().len();
                if self.text[end..].starts_with('\n') {
                    end += 1;
                }
                self.text.replace_range(start..end, "");
                tracing::debug!("Removed <{}> block", tag);
                true
            }
            _ => {
                tracing::debug!("No complete <{}> block to remove", tag);
                false
            }
        };

        let was_active = self.tags.is_active(tag);
        self.tags.set(tag, false);
        removed || was_active
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Current value of a value directive
    pub fn value(&self, key: &str) -> Option<&str> {
        self.index.value(key)
    }

    /// Catalog default for a value directive
    pub fn default_value(&self, key: &str) -> Option<&'static str> {
        catalog::default_value(key)
    }

    /// Whether a flag named `key`, or a value directive keyed by its first
    /// word, is active
    pub fn is_active(&self, key: &str) -> bool {
        self.index.is_active(key)
    }

    pub fn is_tag_active(&self, tag: BlockTag) -> bool {
        self.tags.is_active(tag)
    }

    /// Override a tag flag without touching the text
    pub fn set_tag_active(&mut self, tag: BlockTag, active: bool) {
        self.tags.set(tag, active);
    }

    /// Tags with no block present
    pub fn missing_material(&self) -> Vec<BlockTag> {
        self.tags.missing()
    }

    pub fn index(&self) -> &DirectiveIndex {
        &self.index
    }

    /// Retained document text, without header
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text verbatim. Nothing is re-scanned and no listener is
    /// notified; call [`reparse`](Self::reparse) to apply the edit.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    // ============================================================
    // Saving
    // ============================================================

    /// Serialize into `sink`. When any block is missing, `confirm` is asked
    /// with the missing tags and a `false` answer aborts the save.
    pub fn save_to<F>(&self, sink: &mut dyn ConfigSink, confirm: F) -> Result<(), SaveError>
    where
        F: FnOnce(&[BlockTag]) -> bool,
    {
        let missing = self.missing_material();
        if !missing.is_empty() && !confirm(&missing) {
            tracing::info!("Save declined, missing material: {}", join_tags(&missing));
            return Err(SaveError::Declined { missing });
        }

        sink.persist(&self.serialize()).map_err(|e| {
            tracing::warn!("⚠️ Destination unwritable: {}", e);
            SaveError::Unwritable(e)
        })
    }

    pub(crate) fn notify(&mut self, event: ModelEvent) {
        self.revision += 1;
        let model: &ConfigModel = self;
        for listener in &model.listeners {
            listener(model, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const HEADER: &str = "# Config created by OpenVPN UI #\n# https://github.com/vgezer/openvpnui #\n";

    fn loaded(text: &str) -> ConfigModel {
        let mut model = ConfigModel::new();
        model.load(text);
        model
    }

    #[test]
    fn test_load_scenario() {
        let model = loaded("client\nproto udp\nremote vpn.example.com 1194\n# comment\n");
        assert!(model.is_active("client"));
        assert_eq!(model.value("proto"), Some("udp"));
        assert_eq!(model.value("remote"), Some("vpn.example.com 1194"));
        assert!(!model.serialize().contains("# comment"));
    }

    #[test]
    fn test_round_trip() {
        let text = "client\ndev tun\nproto tcp\nremote vpn.example.com 443\nnobind\nverb 4\n";
        let model = loaded(text);
        assert_eq!(model.serialize(), format!("{}{}", HEADER, text));
    }

    #[test]
    fn test_value_query_absent() {
        let model = loaded("client\n");
        assert_eq!(model.value("proto"), None);
        assert_eq!(model.default_value("proto"), Some("udp"));
    }

    #[test]
    fn test_add_line_twice_keeps_one() {
        let mut model = loaded("client\nproto udp\n");
        model.add_line("proto tcp");
        let once = model.text().to_string();
        model.add_line("proto tcp");

        assert_eq!(model.text(), once);
        assert_eq!(model.text(), "client\nproto tcp\n");
        assert_eq!(model.value("proto"), Some("tcp"));
    }

    #[test]
    fn test_add_flag() {
        let mut model = loaded("client\n");
        model.add_line("nobind");
        model.add_line("nobind");
        assert!(model.is_active("nobind"));
        assert_eq!(model.text(), "client\nnobind\n");
    }

    #[test]
    fn test_remove_inactive_is_noop() {
        let mut model = loaded("client\nproto udp\n");
        let revision = model.revision();
        let index = model.index().clone();

        model.remove_line("verb");

        assert_eq!(model.text(), "client\nproto udp\n");
        assert_eq!(model.index(), &index);
        assert_eq!(model.revision(), revision);
    }

    #[test]
    fn test_remove_remote_keeps_remote_random() {
        let mut model = loaded("client\nremote-random\nremote vpn.example.com 1194\nnobind\n");
        model.remove_line("remote ");

        assert!(!model.is_active("remote"));
        assert!(model.is_active("remote-random"));
        assert_eq!(model.text(), "client\nremote-random\nnobind\n");
    }

    #[test]
    fn test_remove_flag() {
        let mut model = loaded("client\nnobind\npersist-key\n");
        model.remove_line("nobind");
        assert!(!model.is_active("nobind"));
        assert_eq!(model.text(), "client\npersist-key\n");
    }

    #[test]
    fn test_remove_anchors_on_first_raw_match() {
        let mut model = loaded("http-proxy proxy-for-user 8080\nuser nobody\n");
        model.remove_line("user ");
        assert_eq!(model.text(), "http-proxy proxy-for-user nobody\n");
    }

    #[test]
    fn test_remove_last_line_without_newline() {
        let mut model = loaded("client\n");
        model.add_line("verb 3");
        model.set_text("client\nverb 3");
        model.remove_line("verb");
        assert_eq!(model.text(), "client\n");
    }

    #[test]
    fn test_tag_exclusivity() {
        let mut model = loaded("client\n");
        model.add_tag(BlockTag::Ca, "FIRST");
        model.add_tag(BlockTag::Ca, "SECOND");

        let text = model.text();
        assert_eq!(text.matches("<ca>").count(), 1);
        assert_eq!(text.matches("</ca>").count(), 1);
        assert!(text.contains("<ca>SECOND</ca>"));
        assert!(model.is_tag_active(BlockTag::Ca));
    }

    #[test]
    fn test_tag_sentinel_is_noop() {
        let mut model = loaded("client\n");
        let revision = model.revision();
        model.add_tag(BlockTag::Ca, NO_CONTENT);

        assert_eq!(model.text(), "client\n");
        assert!(!model.is_tag_active(BlockTag::Ca));
        assert_eq!(model.revision(), revision);
    }

    #[test]
    fn test_remove_tag_keeps_neighbours() {
        let mut model = loaded("client\n<ca>\nAAAA\n</ca>\nnobind\n");
        assert!(model.is_tag_active(BlockTag::Ca));

        model.remove_tag(BlockTag::Ca);
        assert_eq!(model.text(), "client\nnobind\n");
        assert!(!model.is_tag_active(BlockTag::Ca));
    }

    #[test]
    fn test_remove_absent_tag_leaves_text() {
        let mut model = loaded("client\n</key>\nnobind\n");
        model.set_tag_active(BlockTag::Key, true);
        model.remove_tag(BlockTag::Key);

        assert_eq!(model.text(), "client\n</key>\nnobind\n");
        assert!(!model.is_tag_active(BlockTag::Key));
    }

    #[test]
    fn test_remove_tag_reports_change() {
        let mut model = loaded("client\n<ca>x</ca>\n");
        assert!(model.remove_tag(BlockTag::Ca));
        assert!(!model.remove_tag(BlockTag::Ca));
        assert_eq!(model.text(), "client\n");
    }

    #[test]
    fn test_remove_tag_without_close_marker() {
        let mut model = loaded("<ca>\nAAAA\n");
        assert!(model.is_tag_active(BlockTag::Ca));

        assert!(model.remove_tag(BlockTag::Ca));
        assert_eq!(model.text(), "<ca>\nAAAA\n");
        assert!(!model.is_tag_active(BlockTag::Ca));
        assert!(!model.remove_tag(BlockTag::Ca));
    }

    #[test]
    fn test_remove_tag_close_before_open() {
        let mut model = loaded("</ca>\nclient\n<ca>\nAAAA\n");
        model.remove_tag(BlockTag::Ca);

        assert_eq!(model.text(), "</ca>\nclient\n<ca>\nAAAA\n");
        assert!(!model.is_tag_active(BlockTag::Ca));
    }

    #[test]
    fn test_reembed_leaves_blank_lines() {
        let mut model = loaded("client\n");
        model.add_tag(BlockTag::Ca, "X");
        model.add_tag(BlockTag::Ca, "Y");

        assert_eq!(model.text(), "client\n\n\n<ca>Y</ca>\n");
        model.reparse();
        assert_eq!(model.text(), "client\n<ca>Y</ca>\n");
    }

    #[test]
    fn test_embedded_material_with_space_is_indexed() {
        let mut model = loaded("client\n");
        model.add_tag(BlockTag::Ca, "PEM DATA");

        assert_eq!(model.value("\n<ca>PEM"), Some("DATA</ca>"));
    }

    #[test]
    fn test_embed_from_material() {
        let mut model = loaded("client\n");
        assert!(model.embed_from(BlockTag::Cert, &mut Some(b"PEM DATA".to_vec())));
        assert!(model.text().contains("<cert>PEM DATA</cert>"));

        let before = model.text().to_string();
        assert!(!model.embed_from(BlockTag::Cert, &mut None::<Vec<u8>>));
        assert_eq!(model.text(), before);
    }

    #[test]
    fn test_initialize_default() {
        let mut model = ConfigModel::new();
        model.initialize_default();

        assert_eq!(model.serialize(), format!("{}{}{}", HEADER, HEADER, DEFAULT_TEMPLATE));
        // Derived state is stale until an explicit reparse
        assert!(!model.is_active("client"));

        model.reparse();
        assert!(model.is_active("client"));
        assert_eq!(model.value("remote"), Some("example.org 1194"));
        assert_eq!(model.text(), DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_clear() {
        let mut model = loaded("client\nproto udp\n<ca>x</ca>\n");
        model.clear();

        assert_eq!(model.text(), "");
        assert!(model.index().is_empty());
        assert!(!model.is_tag_active(BlockTag::Ca));
        assert_eq!(model.serialize(), HEADER);
    }

    #[test]
    fn test_set_text_does_not_reparse() {
        let mut model = loaded("client\n");
        let revision = model.revision();
        model.set_text("nobind\n");

        assert!(model.is_active("client"));
        assert!(!model.is_active("nobind"));
        assert_eq!(model.revision(), revision);

        model.reparse();
        assert!(model.is_active("nobind"));
        assert!(!model.is_active("client"));
    }

    #[test]
    fn test_load_from_nothing_keeps_state() {
        let mut model = loaded("client\n");
        let revision = model.revision();

        assert!(!model.load_from(&mut None::<String>));
        assert_eq!(model.text(), "client\n");
        assert_eq!(model.revision(), revision);

        assert!(model.load_from(&mut Some("nobind\n".to_string())));
        assert_eq!(model.text(), "nobind\n");
    }

    #[test]
    fn test_listeners_see_completed_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut model = ConfigModel::new();
        {
            let seen = seen.clone();
            model.subscribe(move |m, event| {
                seen.borrow_mut().push((event, m.is_tag_active(BlockTag::Key), m.value("proto").map(String::from)));
            });
        }

        model.load("proto udp\n");
        model.add_tag(BlockTag::Key, "secret");
        model.add_line("proto tcp");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (ModelEvent::DocumentLoaded, false, Some("udp".to_string())));
        assert_eq!(seen[1], (ModelEvent::ParamsChanged, true, Some("udp".to_string())));
        assert_eq!(seen[2], (ModelEvent::ParamsChanged, true, Some("tcp".to_string())));
    }

    #[test]
    fn test_save_declined_without_material() {
        let model = loaded("client\n<ca>x</ca>\n");
        let mut sink = String::new();
        let mut asked = Vec::new();

        let result = model.save_to(&mut sink, |missing| {
            asked.extend_from_slice(missing);
            false
        });

        assert!(matches!(result, Err(SaveError::Declined { .. })));
        assert_eq!(asked, vec![BlockTag::Cert, BlockTag::Key]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_save_with_all_material_skips_confirmation() {
        let model = loaded("client\n<ca>a</ca>\n<cert>b</cert>\n<key>c</key>\n");
        let mut sink = String::new();

        model.save_to(&mut sink, |_| panic!("confirmation not expected")).unwrap();
        assert_eq!(sink, model.serialize());
    }

    #[test]
    fn test_custom_header() {
        let mut model = ConfigModel::with_header(HeaderSettings {
            app_name: "Acme VPN".to_string(),
            project_url: "https://vpn.example.com".to_string(),
        });
        model.load("client\n");
        assert_eq!(
            model.serialize(),
            "# Config created by Acme VPN #\n# https://vpn.example.com #\nclient\n"
        );
    }
}
