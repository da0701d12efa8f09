//! Reference checks on a freshly decoded root.
//!
//! Dangling component or template references are decode-time errors, so a
//! root that passes here renders without lookup failures. Shared statics are
//! resolved here too and held against the child count of every use.

use super::Path;
use crate::error::DecodeError;
use crate::models::{Child, ComponentId, Components, Fragment, Root, Statics, Templates};

pub(crate) fn root(root: &Root) -> Result<(), DecodeError> {
    let table = Path::root();
    let table = table.key("c");
    for (id, component) in &root.components {
        if let Statics::ComponentRef(target) = component.statics {
            // Shared statics point strictly backwards, which also rules out cycles
            if target >= *id || !root.components.contains_key(&target) {
                return Err(DecodeError::InvalidStaticsReference { id: *id, target });
            }
        }
    }

    let mut checker = Checker {
        components: &root.components,
        templates: Vec::new(),
    };
    checker.fragment(&root.fragment, &Path::root())?;

    for (id, component) in &root.components {
        let key = id.to_string();
        let path = table.key(&key);
        checker.templates.clear();
        let segments = checker.segments(&component.statics, &path)?;
        check_arity(segments, component.children.len(), &path)?;
        checker.children(&component.children, &path)?;
    }
    Ok(())
}

struct Checker<'a> {
    components: &'a Components,
    /// Templates of the enclosing comprehensions, innermost last
    templates: Vec<&'a Templates>,
}

impl<'a> Checker<'a> {
    fn fragment(&mut self, fragment: &'a Fragment, path: &Path<'_>) -> Result<(), DecodeError> {
        match fragment {
            Fragment::Regular { children, statics } => {
                let segments = self.segments(statics, path)?;
                check_arity(segments, children.len(), path)?;
                self.children(children, path)
            }
            Fragment::Comprehension {
                dynamics,
                statics,
                templates,
            } => {
                let pushed = templates.as_ref().map(|t| self.templates.push(t)).is_some();
                let result = self.segments(statics, path).and_then(|segments| {
                    let expected = segments.len().saturating_sub(1);
                    let d = path.key("d");
                    dynamics.iter().enumerate().try_for_each(|(r, row)| {
                        if row.len() != expected {
                            return Err(DecodeError::DynamicsArity {
                                path: path.to_string(),
                                row: r,
                                expected,
                                found: row.len(),
                            });
                        }
                        let row_path = d.index(r);
                        row.iter()
                            .enumerate()
                            .try_for_each(|(i, child)| self.child(child, &row_path.index(i)))
                    })
                });
                if pushed {
                    self.templates.pop();
                }
                result
            }
        }
    }

    fn children(&mut self, children: &'a [Child], path: &Path<'_>) -> Result<(), DecodeError> {
        for (i, child) in children.iter().enumerate() {
            let key = i.to_string();
            self.child(child, &path.key(&key))?;
        }
        Ok(())
    }

    fn child(&mut self, child: &'a Child, path: &Path<'_>) -> Result<(), DecodeError> {
        match child {
            Child::String(_) => Ok(()),
            Child::ComponentId(id) if self.components.contains_key(id) => Ok(()),
            Child::ComponentId(id) => Err(DecodeError::DanglingComponent { id: *id }),
            Child::Fragment(fragment) => self.fragment(fragment, path),
        }
    }

    /// Segments `statics` renders with at this point of the tree.
    fn segments(
        &self,
        statics: &'a Statics,
        path: &Path<'_>,
    ) -> Result<&'a [String], DecodeError> {
        match statics {
            Statics::Inline(segments) => Ok(segments.as_slice()),
            Statics::Template(key) => self
                .templates
                .iter()
                .rev()
                .copied()
                .find_map(|templates| templates.get(key))
                .map(Vec::as_slice)
                .ok_or_else(|| DecodeError::DanglingTemplate {
                    path: path.to_string(),
                    key: *key,
                }),
            Statics::ComponentRef(id) => self.shared_segments(*id, path),
        }
    }

    fn shared_segments(
        &self,
        id: ComponentId,
        path: &Path<'_>,
    ) -> Result<&'a [String], DecodeError> {
        let components: &'a Components = self.components;
        let mut visited = Vec::new();
        let mut current = id;
        loop {
            let component = components
                .get(&current)
                .ok_or(DecodeError::DanglingComponent { id: current })?;
            visited.push(current);
            match &component.statics {
                Statics::Inline(segments) => return Ok(segments.as_slice()),
                Statics::ComponentRef(target) if visited.contains(target) => {
                    return Err(DecodeError::InvalidStaticsReference {
                        id: current,
                        target: *target,
                    });
                }
                Statics::ComponentRef(target) => current = *target,
                Statics::Template(key) => {
                    return Err(DecodeError::DanglingTemplate {
                        path: path.to_string(),
                        key: *key,
                    });
                }
            }
        }
    }
}

fn check_arity(segments: &[String], children: usize, path: &Path<'_>) -> Result<(), DecodeError> {
    if segments.len() != children + 1 {
        return Err(DecodeError::StaticsArity {
            path: path.to_string(),
            expected: children + 1,
            found: segments.len(),
        });
    }
    Ok(())
}
