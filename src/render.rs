//! Materializing trees into markup.
//!
//! Rendering is a single depth-first pass writing into one output buffer.
//! Two stacks travel with it:
//!
//! - the **template stack**: templates of every enclosing comprehension, so a
//!   row fragment with `Statics::Template(k)` finds the nearest definition of
//!   `k`. A component body starts with an empty stack because templates never
//!   cross a component boundary.
//! - the **component stack**: IDs of the components currently being rendered,
//!   so a component that (transitively) contains itself is reported instead
//!   of recursing forever.

use crate::config::TreeConfig;
use crate::error::RenderError;
use crate::models::{Child, Component, ComponentId, Components, Fragment, Root, Statics, Templates};

/// Render a root with the default configuration.
pub fn render(root: &Root) -> Result<String, RenderError> {
    render_with_config(root, &TreeConfig::default())
}

/// Render a root, enforcing `config.max_depth` on fragment and component nesting.
pub fn render_with_config(root: &Root, config: &TreeConfig) -> Result<String, RenderError> {
    let mut renderer = Renderer::new(&root.components, config);
    renderer.fragment(&root.fragment)?;
    Ok(renderer.out)
}

/// Render a single fragment against an explicit component table.
pub fn render_fragment(fragment: &Fragment, components: &Components) -> Result<String, RenderError> {
    let config = TreeConfig::default();
    let mut renderer = Renderer::new(components, &config);
    renderer.fragment(fragment)?;
    Ok(renderer.out)
}

struct Renderer<'a> {
    components: &'a Components,
    max_depth: usize,
    out: String,
    templates: Vec<&'a Templates>,
    component_stack: Vec<ComponentId>,
    depth: usize,
}

impl<'a> Renderer<'a> {
    fn new(components: &'a Components, config: &TreeConfig) -> Self {
        Self {
            components,
            max_depth: config.max_depth,
            out: String::new(),
            templates: Vec::new(),
            component_stack: Vec::new(),
            depth: 0,
        }
    }

    fn fragment(&mut self, fragment: &'a Fragment) -> Result<(), RenderError> {
        self.enter()?;
        match fragment {
            Fragment::Regular { children, statics } => {
                let statics = self.resolve(statics)?;
                self.interleave(statics, children)?;
            }
            Fragment::Comprehension {
                dynamics,
                statics,
                templates,
            } => {
                if let Some(templates) = templates {
                    self.templates.push(templates);
                }
                let statics = self.resolve(statics)?;
                for row in dynamics {
                    self.interleave(statics, row)?;
                }
                if templates.is_some() {
                    self.templates.pop();
                }
            }
        }
        self.depth -= 1;
        Ok(())
    }

    fn child(&mut self, child: &'a Child) -> Result<(), RenderError> {
        match child {
            Child::String(text) => {
                self.out.push_str(text);
                Ok(())
            }
            Child::Fragment(fragment) => self.fragment(fragment),
            Child::ComponentId(id) => self.component(*id),
        }
    }

    fn component(&mut self, id: ComponentId) -> Result<(), RenderError> {
        if self.component_stack.contains(&id) {
            return Err(RenderError::ComponentCycle { id });
        }
        let component = self.lookup(id)?;

        self.enter()?;
        self.component_stack.push(id);
        let outer_templates = std::mem::take(&mut self.templates);

        let result = self
            .resolve(&component.statics)
            .and_then(|statics| self.interleave(statics, &component.children));

        self.templates = outer_templates;
        self.component_stack.pop();
        self.depth -= 1;
        result
    }

    /// Write `statics[0] child[0] statics[1] ... statics[n]`.
    fn interleave(&mut self, statics: &'a [String], children: &'a [Child]) -> Result<(), RenderError> {
        if statics.len() != children.len() + 1 {
            return Err(RenderError::StaticsArity {
                children: children.len(),
                found: statics.len(),
            });
        }
        for (segment, child) in statics.iter().zip(children) {
            self.out.push_str(segment);
            self.child(child)?;
        }
        if let Some(last) = statics.last() {
            self.out.push_str(last);
        }
        Ok(())
    }

    /// Follow template and component references down to inline segments.
    fn resolve(&self, statics: &'a Statics) -> Result<&'a [String], RenderError> {
        let mut visited: Vec<ComponentId> = Vec::new();
        let mut current = statics;
        loop {
            match current {
                Statics::Inline(segments) => return Ok(segments.as_slice()),
                Statics::Template(key) => {
                    return self
                        .templates
                        .iter()
                        .rev()
                        .copied()
                        .find_map(|templates| templates.get(key))
                        .map(Vec::as_slice)
                        .ok_or(RenderError::MissingTemplate { key: *key });
                }
                Statics::ComponentRef(id) => {
                    if visited.contains(id) {
                        return Err(RenderError::StaticsCycle { id: *id });
                    }
                    visited.push(*id);
                    current = &self.lookup(*id)?.statics;
                }
            }
        }
    }

    fn lookup(&self, id: ComponentId) -> Result<&'a Component, RenderError> {
        self.components
            .get(&id)
            .ok_or(RenderError::MissingComponent { id })
    }

    /// The root fragment sits at depth 0, like in decoding.
    fn enter(&mut self) -> Result<(), RenderError> {
        if self.depth > self.max_depth {
            return Err(RenderError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }
}
