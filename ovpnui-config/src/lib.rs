//! OpenVPN UI Configuration Model
//!
//! This crate owns the in-memory representation of an OpenVPN client
//! configuration: the retained document text, the index of recognized
//! directives, and the `ca`/`cert`/`key` embedded-block flags.
//!
//! # Example
//!
//! ```rust
//! use ovpnui_config::{ConfigModel, DirectiveChange};
//!
//! let mut model = ConfigModel::new();
//! model.load("client\nproto udp\n# comment\n");
//! model.apply(DirectiveChange::Set { name: "verb".into(), value: "3".into() });
//!
//! assert!(model.is_active("client"));
//! assert_eq!(model.value("proto"), Some("udp"));
//! assert!(!model.serialize().contains("# comment"));
//! ```

pub mod catalog;
pub mod change;
pub mod index;
pub mod lexer;
pub mod model;
pub mod scan;
pub mod source;
pub mod tags;

pub use catalog::{DirectiveKind, FLAG_DIRECTIVES, VALUE_DIRECTIVES};
pub use change::DirectiveChange;
pub use index::{Directive, DirectiveIndex};
pub use lexer::{outline, tokenize, LineKind, OutlineLine, Token};
pub use model::{ConfigModel, ModelEvent, SaveError, DEFAULT_TEMPLATE};
pub use scan::{scan, Scan};
pub use source::{ConfigSink, ConfigSource, FileSink, FileSource, MaterialFile, MaterialSource};
pub use tags::{BlockTag, BlockTags, NO_CONTENT};
