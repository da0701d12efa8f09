//! Error handling for the rendered-tree core.
//!
//! - **Leaf taxonomies**: [`DecodeError`] (payload shape), [`MergeError`]
//!   (diff does not fit the tree), [`RenderError`] (inconsistent tree) and
//!   [`EncodeError`] (outgoing value)
//! - **Unified Error Type**: [`TreeError`] wraps all four
//! - **Error Categories**: tell the caller whether to resynchronize
//! - **Error Context**: which diff and which part of the tree failed
//! - **Result Type Alias**: [`TreeResult<T>`]
//!
//! # Error Categories
//!
//! | Category | Source | Requires resync |
//! |----------|--------|-----------------|
//! | Protocol | DecodeError | Yes |
//! | State | MergeError | Yes |
//! | Encoding | EncodeError | No |
//! | Internal | RenderError | No |

mod category;
mod context;
mod decode;
mod encode;
mod merge;
mod render;
mod result;
mod tree_error;

pub use category::ErrorCategory;
pub use context::ErrorContext;
pub use decode::DecodeError;
pub use encode::EncodeError;
pub use merge::MergeError;
pub use render::RenderError;
pub use result::{ResultExt, TreeResult};
pub use tree_error::TreeError;
