use super::{Child, Component, ComponentId, Components, Fragment};

/// A whole rendered view: the top fragment plus its component table.
///
/// An absent `"c"` key on the wire decodes to an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub fragment: Fragment,
    pub components: Components,
    /// Latest page title sent by the server (`"t"`)
    pub title: Option<String>,
}

impl Root {
    pub fn new(fragment: Fragment) -> Self {
        Self {
            fragment,
            components: Components::new(),
            title: None,
        }
    }

    pub fn with_components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    pub fn with_component(mut self, id: ComponentId, component: Component) -> Self {
        self.components.insert(id, component);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Component IDs referenced from anywhere in the tree, in document order.
    pub fn referenced_components(&self) -> Vec<ComponentId> {
        let mut ids = Vec::new();
        collect_ids(self.fragment.children(), &mut ids);
        for component in self.components.values() {
            collect_ids(component.children.iter(), &mut ids);
        }
        ids
    }
}

fn collect_ids<'a>(children: impl Iterator<Item = &'a Child>, ids: &mut Vec<ComponentId>) {
    for child in children {
        match child {
            Child::ComponentId(id) => ids.push(*id),
            Child::Fragment(fragment) => collect_ids(fragment.children(), ids),
            Child::String(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Statics;

    #[test]
    fn test_referenced_components() {
        let inner = Fragment::regular(vec![Child::ComponentId(3)], Statics::inline(["", ""]));
        let root = Root::new(Fragment::regular(
            vec![Child::ComponentId(1), inner.into()],
            Statics::inline(["", "", ""]),
        ))
        .with_component(
            1,
            Component::new(vec![Child::ComponentId(2)], Statics::inline(["", ""])),
        );

        assert_eq!(root.referenced_components(), vec![1, 3, 2]);
    }

    #[test]
    fn test_builder() {
        let root = Root::new(Fragment::regular(vec![], Statics::inline(["x"]))).with_title("Home");
        assert_eq!(root.title.as_deref(), Some("Home"));
        assert!(root.components.is_empty());
        assert!(root.component(1).is_none());
    }
}
