//! Incremental update format.
//!
//! Each diff type mirrors the tree type it applies to. Diffs are produced by
//! [`decode_root_diff`](crate::decode::decode_root_diff) and consumed by the
//! [`merge`](crate::merge) engine.

use std::collections::BTreeMap;

use crate::models::{Child, Component, ComponentId, Fragment, Templates};
use crate::value::Value;

/// Update for a [`Fragment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentDiff {
    /// Discard the current value and use this one
    ReplaceCurrent(Fragment),
    /// Patch existing children of a regular fragment by index
    UpdateRegular { children: BTreeMap<usize, ChildDiff> },
    /// New rows for a comprehension; templates are merged key by key
    UpdateComprehension {
        dynamics: Vec<Vec<Child>>,
        templates: Option<Templates>,
    },
}

impl FragmentDiff {
    /// Diff that patches the given child indices of a regular fragment.
    pub fn update_regular<I>(children: I) -> Self
    where
        I: IntoIterator<Item = (usize, ChildDiff)>,
    {
        FragmentDiff::UpdateRegular {
            children: children.into_iter().collect(),
        }
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, FragmentDiff::ReplaceCurrent(_))
    }
}

/// Update for a single child slot.
///
/// Scalars replace the child whatever it held before; only a fragment diff
/// patches in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildDiff {
    String(String),
    ComponentId(ComponentId),
    Fragment(FragmentDiff),
}

impl From<&str> for ChildDiff {
    fn from(s: &str) -> Self {
        ChildDiff::String(s.to_string())
    }
}

impl From<FragmentDiff> for ChildDiff {
    fn from(diff: FragmentDiff) -> Self {
        ChildDiff::Fragment(diff)
    }
}

/// Update for one entry of the component table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentDiff {
    ReplaceCurrent(Component),
    UpdateRegular { children: BTreeMap<usize, ChildDiff> },
}

impl ComponentDiff {
    pub fn is_replace(&self) -> bool {
        matches!(self, ComponentDiff::ReplaceCurrent(_))
    }
}

/// Event pushed by the server alongside a diff (`"e"`).
#[derive(Debug, Clone, PartialEq)]
pub struct PushEvent {
    pub name: String,
    pub payload: Value,
}

impl PushEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Update for a whole [`Root`](crate::models::Root).
///
/// Components not named in `components` are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RootDiff {
    pub fragment: FragmentDiff,
    pub components: BTreeMap<ComponentId, ComponentDiff>,
    pub title: Option<String>,
    pub events: Vec<PushEvent>,
}

impl RootDiff {
    pub fn new(fragment: FragmentDiff) -> Self {
        Self {
            fragment,
            components: BTreeMap::new(),
            title: None,
            events: Vec::new(),
        }
    }

    pub fn with_component(mut self, id: ComponentId, diff: ComponentDiff) -> Self {
        self.components.insert(id, diff);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_event(mut self, event: PushEvent) -> Self {
        self.events.push(event);
        self
    }

    /// True when applying the diff cannot change the tree.
    pub fn is_empty(&self) -> bool {
        matches!(&self.fragment, FragmentDiff::UpdateRegular { children } if children.is_empty())
            && self.components.is_empty()
            && self.title.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Statics;

    #[test]
    fn test_update_regular_helper() {
        let diff = FragmentDiff::update_regular([(0, "a".into()), (2, "b".into())]);
        match diff {
            FragmentDiff::UpdateRegular { children } => {
                assert_eq!(children.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
            }
            _ => panic!("Expected UpdateRegular"),
        }
    }

    #[test]
    fn test_root_diff_is_empty() {
        let empty = RootDiff::new(FragmentDiff::update_regular([]));
        assert!(empty.is_empty());

        let events_only = RootDiff::new(FragmentDiff::update_regular([]))
            .with_event(PushEvent::new("flash", Value::Null));
        assert!(events_only.is_empty());

        let titled = RootDiff::new(FragmentDiff::update_regular([])).with_title("t");
        assert!(!titled.is_empty());

        let replace = RootDiff::new(FragmentDiff::ReplaceCurrent(Fragment::regular(
            vec![],
            Statics::inline([""]),
        )));
        assert!(!replace.is_empty());
        assert!(replace.fragment.is_replace());
    }
}
