//! Applying diffs to trees.
//!
//! Every merge runs in two passes: [`Merge::check`] walks the diff against the
//! current value without touching it, then [`Merge::apply`] moves the diff's
//! contents into place. A failed check leaves the value exactly as it was, so
//! callers keep a usable tree whatever the server sends.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::diff::{ChildDiff, ComponentDiff, FragmentDiff, RootDiff};
use crate::error::MergeError;
use crate::models::{
    Child, Component, ComponentId, Components, Fragment, FragmentKind, Root, Statics,
};

/// A tree value that can absorb its diff type.
pub trait Merge: Sized {
    type Diff;

    /// Verify that `diff` fits `self` without modifying anything.
    fn check(&self, diff: &Self::Diff) -> Result<(), MergeError>;

    /// Move `diff` into `self`.
    ///
    /// Only call this with a diff that passed [`check`](Merge::check); on
    /// any other diff an error may leave `self` partially updated.
    fn apply(&mut self, diff: Self::Diff) -> Result<(), MergeError>;

    /// Apply `diff` in place, leaving `self` untouched on failure.
    fn merge_in_place(&mut self, diff: Self::Diff) -> Result<(), MergeError> {
        self.check(&diff)?;
        self.apply(diff)
    }

    /// Produce the merged value, leaving `self` untouched.
    fn merged(&self, diff: Self::Diff) -> Result<Self, MergeError>
    where
        Self: Clone,
    {
        self.check(&diff)?;
        let mut next = self.clone();
        next.apply(diff)?;
        Ok(next)
    }
}

/// Apply a server update to a root, producing the next root.
///
/// `root` is never modified; on error the caller still holds a valid tree.
pub fn merge(root: &Root, diff: RootDiff) -> Result<Root, MergeError> {
    root.merged(diff)
}

impl Merge for Fragment {
    type Diff = FragmentDiff;

    fn check(&self, diff: &FragmentDiff) -> Result<(), MergeError> {
        match (self, diff) {
            (_, FragmentDiff::ReplaceCurrent(_)) => Ok(()),
            (Fragment::Regular { children, .. }, FragmentDiff::UpdateRegular { children: updates }) => {
                check_children(children, updates)
            }
            (Fragment::Comprehension { .. }, FragmentDiff::UpdateComprehension { .. }) => Ok(()),
            (current, diff) => Err(type_mismatch(current, diff)),
        }
    }

    fn apply(&mut self, diff: FragmentDiff) -> Result<(), MergeError> {
        match (self, diff) {
            (current, FragmentDiff::ReplaceCurrent(fragment)) => {
                *current = fragment;
                Ok(())
            }
            (Fragment::Regular { children, .. }, FragmentDiff::UpdateRegular { children: updates }) => {
                apply_children(children, updates)
            }
            (
                Fragment::Comprehension {
                    dynamics,
                    templates,
                    ..
                },
                FragmentDiff::UpdateComprehension {
                    dynamics: rows,
                    templates: new_templates,
                },
            ) => {
                *dynamics = rows;
                if let Some(new_templates) = new_templates {
                    // Additive: keys absent from the diff survive, colliding keys take the new value
                    templates.get_or_insert_with(Default::default).extend(new_templates);
                }
                Ok(())
            }
            (current, diff) => Err(type_mismatch(current, &diff)),
        }
    }
}

impl Merge for Component {
    type Diff = ComponentDiff;

    fn check(&self, diff: &ComponentDiff) -> Result<(), MergeError> {
        match diff {
            ComponentDiff::ReplaceCurrent(_) => Ok(()),
            ComponentDiff::UpdateRegular { children } => check_children(&self.children, children),
        }
    }

    fn apply(&mut self, diff: ComponentDiff) -> Result<(), MergeError> {
        match diff {
            ComponentDiff::ReplaceCurrent(component) => {
                *self = component;
                Ok(())
            }
            ComponentDiff::UpdateRegular { children } => apply_children(&mut self.children, children),
        }
    }
}

/// Components keyed by ID; unknown IDs may only arrive as replacements.
///
/// A statics reference inside the diff names the component as it was before
/// the diff. Components sharing the statics of one the diff replaces keep
/// rendering the text they had.
impl Merge for Components {
    type Diff = BTreeMap<ComponentId, ComponentDiff>;

    fn check(&self, diffs: &Self::Diff) -> Result<(), MergeError> {
        diffs.iter().try_for_each(|(id, diff)| {
            match self.get(id) {
                Some(component) => component.check(diff)?,
                None if diff.is_replace() => {}
                None => return Err(MergeError::CreateComponentFromUpdate { id: *id }),
            }
            match diff {
                ComponentDiff::ReplaceCurrent(Component {
                    statics: Statics::ComponentRef(target),
                    ..
                }) if *target >= *id || !self.contains_key(target) => {
                    Err(MergeError::InvalidStaticsReference {
                        id: *id,
                        target: *target,
                    })
                }
                _ => Ok(()),
            }
        })
    }

    fn apply(&mut self, mut diffs: Self::Diff) -> Result<(), MergeError> {
        detach_shared_statics(self, &mut diffs);

        for (id, diff) in diffs {
            if let Some(component) = self.get_mut(&id) {
                trace!("Merging component {} (replace: {})", id, diff.is_replace());
                component.apply(diff)?;
                continue;
            }
            match diff {
                ComponentDiff::ReplaceCurrent(component) => {
                    trace!("Adding component {}", id);
                    self.insert(id, component);
                }
                ComponentDiff::UpdateRegular { .. } => {
                    return Err(MergeError::CreateComponentFromUpdate { id });
                }
            }
        }
        Ok(())
    }
}

impl Merge for Root {
    type Diff = RootDiff;

    fn check(&self, diff: &RootDiff) -> Result<(), MergeError> {
        self.fragment.check(&diff.fragment)?;
        self.components.check(&diff.components)
    }

    fn apply(&mut self, diff: RootDiff) -> Result<(), MergeError> {
        let RootDiff {
            fragment,
            components,
            title,
            ..
        } = diff;
        let touched = components.len();

        self.fragment.apply(fragment)?;
        self.components.apply(components)?;
        if title.is_some() {
            self.title = title;
        }

        debug!(
            "Merged diff: {} component(s) touched, {} in table",
            touched,
            self.components.len()
        );
        Ok(())
    }
}

/// Inline the statics of every reference whose chain passes through a
/// component the diff replaces, reading the table before any replacement.
fn detach_shared_statics(
    table: &mut Components,
    diffs: &mut BTreeMap<ComponentId, ComponentDiff>,
) {
    let replaced: BTreeSet<ComponentId> = diffs
        .iter()
        .filter(|(_, diff)| diff.is_replace())
        .map(|(id, _)| *id)
        .collect();
    if replaced.is_empty() {
        return;
    }

    let detached: Vec<(ComponentId, Statics)> = table
        .iter()
        .filter(|(id, _)| !replaced.contains(*id))
        .filter_map(|(id, component)| {
            detached_statics(table, &component.statics, &replaced).map(|statics| (*id, statics))
        })
        .collect();

    for diff in diffs.values_mut() {
        if let ComponentDiff::ReplaceCurrent(component) = diff {
            if let Some(statics) = detached_statics(table, &component.statics, &replaced) {
                component.statics = statics;
            }
        }
    }

    for (id, statics) in detached {
        if let Some(component) = table.get_mut(&id) {
            trace!("Detaching statics of component {}", id);
            component.statics = statics;
        }
    }
}

/// Resolved inline copy of `statics` when its reference chain reaches `replaced`.
fn detached_statics(
    table: &Components,
    statics: &Statics,
    replaced: &BTreeSet<ComponentId>,
) -> Option<Statics> {
    let Statics::ComponentRef(target) = statics else {
        return None;
    };
    let mut visited = Vec::new();
    let mut current = *target;
    let mut crosses = false;
    loop {
        if visited.contains(&current) {
            return None;
        }
        visited.push(current);
        crosses |= replaced.contains(&current);
        match &table.get(&current)?.statics {
            Statics::Inline(segments) => {
                return crosses.then(|| Statics::Inline(segments.clone()));
            }
            Statics::ComponentRef(next) => current = *next,
            Statics::Template(_) => return None,
        }
    }
}

fn check_children(
    children: &[Child],
    updates: &BTreeMap<usize, ChildDiff>,
) -> Result<(), MergeError> {
    updates.iter().try_for_each(|(&index, diff)| match children.get(index) {
        Some(child) => check_child(child, diff, index),
        None => Err(MergeError::AddChildToExisting {
            index,
            len: children.len(),
        }),
    })
}

fn apply_children(
    children: &mut [Child],
    updates: BTreeMap<usize, ChildDiff>,
) -> Result<(), MergeError> {
    let len = children.len();
    for (index, diff) in updates {
        let child = children
            .get_mut(index)
            .ok_or(MergeError::AddChildToExisting { index, len })?;
        apply_child(child, diff, index)?;
    }
    Ok(())
}

/// Scalars and replacements fit any child; patches need an existing fragment.
fn check_child(child: &Child, diff: &ChildDiff, index: usize) -> Result<(), MergeError> {
    match (child, diff) {
        (_, ChildDiff::String(_) | ChildDiff::ComponentId(_)) => Ok(()),
        (_, ChildDiff::Fragment(FragmentDiff::ReplaceCurrent(_))) => Ok(()),
        (Child::Fragment(fragment), ChildDiff::Fragment(diff)) => fragment.check(diff),
        (Child::String(_) | Child::ComponentId(_), ChildDiff::Fragment(_)) => {
            Err(MergeError::CreateChildFromUpdateFragment { index })
        }
    }
}

fn apply_child(child: &mut Child, diff: ChildDiff, index: usize) -> Result<(), MergeError> {
    match (child, diff) {
        (child, ChildDiff::String(s)) => *child = Child::String(s),
        (child, ChildDiff::ComponentId(id)) => *child = Child::ComponentId(id),
        (child, ChildDiff::Fragment(FragmentDiff::ReplaceCurrent(fragment))) => {
            *child = Child::Fragment(fragment)
        }
        (Child::Fragment(fragment), ChildDiff::Fragment(diff)) => fragment.apply(diff)?,
        (Child::String(_) | Child::ComponentId(_), ChildDiff::Fragment(_)) => {
            return Err(MergeError::CreateChildFromUpdateFragment { index });
        }
    }
    Ok(())
}

fn type_mismatch(current: &Fragment, diff: &FragmentDiff) -> MergeError {
    let expected = match diff {
        FragmentDiff::UpdateComprehension { .. } => FragmentKind::Comprehension,
        _ => FragmentKind::Regular,
    };
    MergeError::FragmentTypeMismatch {
        expected,
        found: current.kind(),
    }
}
