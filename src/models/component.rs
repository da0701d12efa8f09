use std::collections::BTreeMap;

use super::{Child, Statics};

/// Positive integer naming an entry of the component table.
pub type ComponentId = u32;

/// Flat component table of a root, ordered by ID.
pub type Components = BTreeMap<ComponentId, Component>;

/// Separately keyed fragment body, referenced through [`Child::ComponentId`].
///
/// Components always have the regular shape; a repeated block inside a
/// component is a nested comprehension child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub children: Vec<Child>,
    pub statics: Statics,
}

impl Component {
    pub fn new(children: Vec<Child>, statics: Statics) -> Self {
        Self { children, statics }
    }
}
