//! livetree - rendered template trees for server-driven UI clients
//!
//! The server sends a compact, key-coded description of a rendered template
//! (static text interleaved with dynamic slots, repeated blocks and a table of
//! shared components) once on join, and partial diffs on every update after
//! that. This crate decodes both, merges diffs into the current tree and
//! materializes the tree into the markup string the view layer parses.
//!
//! ```ignore
//! use livetree::{decode_root_str, decode_root_diff_str, merge, render};
//!
//! let root = decode_root_str(r#"{"0": "a", "s": ["<b>", "</b>"]}"#)?;
//! let diff = decode_root_diff_str(r#"{"0": "c"}"#)?;
//! let next = merge(&root, diff)?;
//! assert_eq!(render(&next)?, "<b>c</b>");
//! ```

pub mod config;
pub mod decode;
pub mod diff;
pub mod document;
pub mod encoder;
pub mod error;
pub mod merge;
pub mod models;
pub mod render;
pub mod value;

pub use config::TreeConfig;
pub use decode::{
    decode_root, decode_root_diff, decode_root_diff_str, decode_root_diff_with_config,
    decode_root_str, decode_root_with_config,
};
pub use diff::{ChildDiff, ComponentDiff, FragmentDiff, PushEvent, RootDiff};
pub use document::Document;
pub use encoder::to_value;
pub use error::{
    DecodeError, EncodeError, ErrorCategory, ErrorContext, MergeError, RenderError, ResultExt,
    TreeError, TreeResult,
};
pub use merge::{merge, Merge};
pub use models::{
    Child, Component, ComponentId, Components, Fragment, FragmentKind, Root, Statics,
    TemplateKey, Templates,
};
pub use render::{render, render_fragment, render_with_config};
pub use value::Value;
