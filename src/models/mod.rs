//! Persistent representation of a rendered template.
//!
//! A [`Root`] is decoded once per connection and then threaded through
//! [`merge`](crate::merge::merge) for every server update. Values are never
//! mutated in place where another owner could observe it; merging produces
//! the next tree.

mod component;
mod fragment;
mod root;

pub use component::{Component, ComponentId, Components};
pub use fragment::{Child, Fragment, FragmentKind, Statics, TemplateKey, Templates};
pub use root::Root;
