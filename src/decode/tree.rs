//! Full tree decoding: roots, fragments, components.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use super::{
    child_index, json_type, position, Decoder, Object, Path, COMPONENT_KEYS, FRAGMENT_KEYS,
    ROOT_KEYS,
};
use crate::diff::PushEvent;
use crate::error::DecodeError;
use crate::models::{Child, Component, ComponentId, Components, Fragment, Root, Statics, Templates};

/// What a `"s"` value belongs to; integer statics mean different things for each.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StaticsOwner {
    Fragment,
    Component(ComponentId),
}

impl Decoder<'_> {
    pub(crate) fn root(&self, payload: &JsonValue) -> Result<Root, DecodeError> {
        let path = Path::root();
        let object = self.object(payload, &path)?;
        self.check_keys(object, ROOT_KEYS, &path)?;

        let fragment = self.fragment_from_object(object, &path, 0)?;
        let components = match object.get("c") {
            Some(value) => self.components(value, &path.key("c"))?,
            None => Components::new(),
        };
        let title = object.get("t").map(title).transpose()?;

        Ok(Root {
            fragment,
            components,
            title,
        })
    }

    pub(crate) fn fragment(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<Fragment, DecodeError> {
        let object = self.object(value, path)?;
        self.check_keys(object, FRAGMENT_KEYS, path)?;
        self.fragment_from_object(object, path, depth)
    }

    /// Shared by nested fragments and the root, whose object carries extra keys.
    pub(crate) fn fragment_from_object(
        &self,
        object: &Object,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<Fragment, DecodeError> {
        self.check_depth(depth, path)?;

        let statics_value = object.get("s").ok_or_else(|| DecodeError::MissingKey {
            path: path.to_string(),
            key: "s",
        })?;
        let statics = self.statics(statics_value, &path.key("s"), StaticsOwner::Fragment)?;

        let Some(dynamics_value) = object.get("d") else {
            let children = self.children(object, path, depth)?;
            check_statics_arity(&statics, children.len(), path)?;
            return Ok(Fragment::Regular { children, statics });
        };

        let dynamics = self.dynamics(dynamics_value, &path.key("d"), depth)?;
        if let Statics::Inline(segments) = &statics {
            let expected = segments.len() - 1;
            if let Some((row, found)) = dynamics
                .iter()
                .map(Vec::len)
                .enumerate()
                .find(|(_, len)| *len != expected)
            {
                return Err(DecodeError::DynamicsArity {
                    path: path.to_string(),
                    row,
                    expected,
                    found,
                });
            }
        }
        let templates = object
            .get("p")
            .map(|value| self.templates(value, &path.key("p")))
            .transpose()?;

        Ok(Fragment::Comprehension {
            dynamics,
            statics,
            templates,
        })
    }

    /// Children under numeric keys, which must run contiguously from 0.
    pub(crate) fn children(
        &self,
        object: &Object,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<Vec<Child>, DecodeError> {
        let mut indexed = BTreeMap::new();
        for (key, value) in object {
            if let Some(index) = position(key, path)? {
                indexed.insert(index, self.child(value, &path.key(key), depth)?);
            }
        }

        let mut children = Vec::with_capacity(indexed.len());
        for (expected, (index, child)) in indexed.into_iter().enumerate() {
            if index != expected {
                return Err(DecodeError::MissingChild {
                    path: path.to_string(),
                    index: expected,
                });
            }
            children.push(child);
        }
        Ok(children)
    }

    pub(crate) fn child(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<Child, DecodeError> {
        match value {
            JsonValue::String(s) => Ok(Child::String(s.clone())),
            JsonValue::Number(_) => Ok(Child::ComponentId(component_id_value(value, path)?)),
            JsonValue::Object(_) => Ok(Child::Fragment(self.fragment(value, path, depth + 1)?)),
            other => Err(DecodeError::InvalidChild {
                path: path.to_string(),
                found: json_type(other),
            }),
        }
    }

    pub(crate) fn dynamics(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<Vec<Vec<Child>>, DecodeError> {
        let rows = value.as_array().ok_or_else(|| DecodeError::InvalidChild {
            path: path.to_string(),
            found: json_type(value),
        })?;

        rows.iter()
            .enumerate()
            .map(|(r, row)| {
                let row_path = path.index(r);
                let cells = row.as_array().ok_or_else(|| DecodeError::InvalidChild {
                    path: row_path.to_string(),
                    found: json_type(row),
                })?;
                cells
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| self.child(cell, &row_path.index(i), depth))
                    .collect()
            })
            .collect()
    }

    pub(crate) fn statics(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
        owner: StaticsOwner,
    ) -> Result<Statics, DecodeError> {
        match value {
            JsonValue::Array(items) => {
                if items.is_empty() {
                    return Err(invalid_statics(path, "no segments"));
                }
                items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| invalid_statics(path, "segments must be strings"))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Statics::Inline)
            }
            JsonValue::Number(n) => {
                let n = n
                    .as_i64()
                    .ok_or_else(|| invalid_statics(path, "reference must be an integer"))?;
                match owner {
                    StaticsOwner::Fragment if n >= 0 => u32::try_from(n)
                        .map(Statics::Template)
                        .map_err(|_| invalid_statics(path, "template key out of range")),
                    StaticsOwner::Fragment => Ok(Statics::ComponentRef(reference_target(n, path)?)),
                    StaticsOwner::Component(id) => {
                        let target = reference_target(n, path)?;
                        if target == id {
                            return Err(DecodeError::InvalidStaticsReference { id, target });
                        }
                        Ok(Statics::ComponentRef(target))
                    }
                }
            }
            other => Err(DecodeError::InvalidStatics {
                path: path.to_string(),
                reason: format!("expected array or integer, found {}", json_type(other)),
            }),
        }
    }

    pub(crate) fn templates(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
    ) -> Result<Templates, DecodeError> {
        let object = self.object(value, path)?;
        let mut templates = Templates::new();
        for (key, segments) in object {
            let template_key = key
                .parse::<u32>()
                .ok()
                .filter(|_| child_index(key).is_some())
                .ok_or_else(|| DecodeError::InvalidTemplateKey {
                    path: path.to_string(),
                    key: key.clone(),
                })?;
            let entry_path = path.key(key);
            match self.statics(segments, &entry_path, StaticsOwner::Fragment)? {
                Statics::Inline(segments) => {
                    templates.insert(template_key, segments);
                }
                _ => return Err(invalid_statics(&entry_path, "templates must be inline")),
            }
        }
        Ok(templates)
    }

    pub(crate) fn components(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
    ) -> Result<Components, DecodeError> {
        let object = self.object(value, path)?;
        let mut components = Components::new();
        for (key, body) in object {
            let id = component_id_key(key)?;
            let body_path = path.key(key);
            let body = self.object(body, &body_path)?;
            components.insert(id, self.component(body, id, &body_path)?);
        }
        Ok(components)
    }

    pub(crate) fn component(
        &self,
        object: &Object,
        id: ComponentId,
        path: &Path<'_>,
    ) -> Result<Component, DecodeError> {
        self.check_keys(object, COMPONENT_KEYS, path)?;
        if object.contains_key("d") {
            return Err(DecodeError::UnexpectedComprehension {
                path: path.to_string(),
            });
        }
        let statics_value = object.get("s").ok_or_else(|| DecodeError::MissingKey {
            path: path.to_string(),
            key: "s",
        })?;
        let statics = self.statics(statics_value, &path.key("s"), StaticsOwner::Component(id))?;
        let children = self.children(object, path, 0)?;
        check_statics_arity(&statics, children.len(), path)?;
        Ok(Component { children, statics })
    }
}

pub(crate) fn check_statics_arity(
    statics: &Statics,
    children: usize,
    path: &Path<'_>,
) -> Result<(), DecodeError> {
    match statics {
        Statics::Inline(segments) if segments.len() != children + 1 => {
            Err(DecodeError::StaticsArity {
                path: path.to_string(),
                expected: children + 1,
                found: segments.len(),
            })
        }
        _ => Ok(()),
    }
}

pub(crate) fn title(value: &JsonValue) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(DecodeError::InvalidTitle {
            found: json_type(value),
        })
}

/// `"e"`: a list of `[name, payload]` pairs.
pub(crate) fn events(value: &JsonValue) -> Result<Vec<PushEvent>, DecodeError> {
    let items = value.as_array().ok_or(DecodeError::InvalidEvent {
        index: 0,
        reason: "events must be an array",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item.as_array().map(Vec::as_slice) {
            Some([name, payload]) => {
                let name = name.as_str().ok_or(DecodeError::InvalidEvent {
                    index,
                    reason: "event name must be a string",
                })?;
                Ok(PushEvent::new(name, payload.clone().into()))
            }
            _ => Err(DecodeError::InvalidEvent {
                index,
                reason: "event must be a [name, payload] pair",
            }),
        })
        .collect()
}

/// Component ID from a `"c"` table key.
pub(crate) fn component_id_key(key: &str) -> Result<ComponentId, DecodeError> {
    child_index(key)
        .and_then(|n| ComponentId::try_from(n).ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| DecodeError::InvalidComponentId {
            key: key.to_string(),
        })
}

/// Component ID from a child slot value.
pub(crate) fn component_id_value(
    value: &JsonValue,
    path: &Path<'_>,
) -> Result<ComponentId, DecodeError> {
    value
        .as_u64()
        .and_then(|n| ComponentId::try_from(n).ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| DecodeError::InvalidChild {
            path: path.to_string(),
            found: "number that is not a component ID",
        })
}

/// Absolute component ID named by a signed statics reference.
fn reference_target(n: i64, path: &Path<'_>) -> Result<ComponentId, DecodeError> {
    ComponentId::try_from(n.unsigned_abs())
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_statics(path, "component reference out of range"))
}

fn invalid_statics(path: &Path<'_>, reason: &str) -> DecodeError {
    DecodeError::InvalidStatics {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use serde_json::json;

    fn decode(payload: JsonValue) -> Result<Root, DecodeError> {
        Decoder::new(&TreeConfig::default()).root(&payload)
    }

    #[test]
    fn test_regular_children_by_type() {
        let root = decode(json!({
            "0": "text",
            "1": {"0": "inner", "s": ["<i>", "</i>"]},
            "2": 7,
            "s": ["a", "b", "c", "d"]
        }))
        .unwrap();

        match root.fragment {
            Fragment::Regular { children, statics } => {
                assert_eq!(children[0], Child::String("text".to_string()));
                assert!(matches!(children[1], Child::Fragment(Fragment::Regular { .. })));
                assert_eq!(children[2], Child::ComponentId(7));
                assert_eq!(statics, Statics::inline(["a", "b", "c", "d"]));
            }
            _ => panic!("Expected regular fragment"),
        }
    }

    #[test]
    fn test_comprehension_with_templates() {
        let root = decode(json!({
            "0": {
                "d": [[{"0": "x", "s": 0}], [{"0": "y", "s": 0}]],
                "s": ["<li>", "</li>"],
                "p": {"0": ["<b>", "</b>"]}
            },
            "s": ["", ""]
        }))
        .unwrap();

        let comprehension = root.fragment.children().next().and_then(Child::as_fragment).unwrap();
        match comprehension {
            Fragment::Comprehension {
                dynamics,
                templates,
                ..
            } => {
                assert_eq!(dynamics.len(), 2);
                let templates = templates.as_ref().unwrap();
                assert_eq!(templates[&0], vec!["<b>".to_string(), "</b>".to_string()]);
                assert_eq!(dynamics[0][0].as_fragment().unwrap().statics(), &Statics::Template(0));
            }
            _ => panic!("Expected comprehension"),
        }
    }

    #[test]
    fn test_negative_fragment_statics_is_component_ref() {
        let config = TreeConfig::default();
        let decoder = Decoder::new(&config);
        let path = Path::root();
        let statics = decoder
            .statics(&json!(-3), &path, StaticsOwner::Fragment)
            .unwrap();
        assert_eq!(statics, Statics::ComponentRef(3));
    }

    #[test]
    fn test_component_statics_sign_both_reference() {
        let config = TreeConfig::default();
        let decoder = Decoder::new(&config);
        let path = Path::root();
        let negative = decoder
            .statics(&json!(-1), &path, StaticsOwner::Component(2))
            .unwrap();
        let positive = decoder
            .statics(&json!(1), &path, StaticsOwner::Component(2))
            .unwrap();
        assert_eq!(negative, Statics::ComponentRef(1));
        assert_eq!(positive, Statics::ComponentRef(1));
    }

    #[test]
    fn test_component_self_reference_rejected() {
        let config = TreeConfig::default();
        let decoder = Decoder::new(&config);
        let path = Path::root();
        let err = decoder
            .statics(&json!(-2), &path, StaticsOwner::Component(2))
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidStaticsReference { id: 2, target: 2 }
        ));
    }

    #[test]
    fn test_missing_statics() {
        let err = decode(json!({"0": "a"})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingKey { key: "s", .. }));
    }

    #[test]
    fn test_statics_arity_mismatch() {
        let err = decode(json!({"0": "a", "s": ["only"]})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::StaticsArity {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_dynamics_arity_mismatch() {
        let err = decode(json!({
            "0": {"d": [["a"], ["b", "c"]], "s": ["", ""]},
            "s": ["", ""]
        }))
        .unwrap_err();
        match err {
            DecodeError::DynamicsArity {
                path,
                row,
                expected,
                found,
            } => {
                assert_eq!(path, "0");
                assert_eq!(row, 1);
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("Expected DynamicsArity, got {:?}", other),
        }
    }

    #[test]
    fn test_non_contiguous_children() {
        let err = decode(json!({"0": "a", "2": "c", "s": ["", "", "", ""]})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingChild { index: 1, .. }));
    }

    #[test]
    fn test_leading_zero_child_key_rejected() {
        let err = decode(json!({"0": "a", "1": "b", "01": "c", "s": ["", "", ""]})).unwrap_err();
        match err {
            DecodeError::InvalidChildKey { path, key } => {
                assert_eq!(path, "<root>");
                assert_eq!(key, "01");
            }
            other => panic!("Expected InvalidChildKey, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_child_type() {
        let err = decode(json!({"0": true, "s": ["", ""]})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidChild { found: "bool", .. }));
    }

    #[test]
    fn test_component_with_dynamics_rejected() {
        let err = decode(json!({
            "0": 1,
            "s": ["", ""],
            "c": {"1": {"d": [], "s": [""]}}
        }))
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedComprehension { .. }));
    }

    #[test]
    fn test_invalid_component_key() {
        let err = decode(json!({"s": [""], "c": {"zero": {"s": [""]}}})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidComponentId { .. }));
        let err = decode(json!({"s": [""], "c": {"0": {"s": [""]}}})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidComponentId { .. }));
    }

    #[test]
    fn test_title() {
        let root = decode(json!({"s": ["x"], "t": "Inbox"})).unwrap();
        assert_eq!(root.title.as_deref(), Some("Inbox"));
        let err = decode(json!({"s": ["x"], "t": 5})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTitle { found: "number" }));
    }

    #[test]
    fn test_events() {
        let events = events(&json!([["flash", {"kind": "info"}], ["scroll", null]])).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "flash");
        assert_eq!(
            events[0].payload.get("kind").and_then(|v| v.as_str()),
            Some("info")
        );
        assert!(events[1].payload.is_null());

        let err = super::events(&json!([["only-name"]])).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEvent { index: 0, .. }));
    }

    #[test]
    fn test_depth_limit() {
        let config = TreeConfig::default().with_max_depth(1);
        let decoder = Decoder::new(&config);
        let ok = json!({"0": {"0": "x", "s": ["", ""]}, "s": ["", ""]});
        assert!(decoder.root(&ok).is_ok());

        let too_deep = json!({"0": {"0": {"s": ["x"]}, "s": ["", ""]}, "s": ["", ""]});
        let err = decoder.root(&too_deep).unwrap_err();
        assert!(matches!(err, DecodeError::DepthLimitExceeded { limit: 1, .. }));
    }

    #[test]
    fn test_strict_keys() {
        let lenient = decode(json!({"s": ["x"], "r": 1, "future": true}));
        assert!(lenient.is_ok());

        let config = TreeConfig::default().with_strict_keys(true);
        let err = Decoder::new(&config)
            .root(&json!({"s": ["x"], "future": true}))
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownKey { ref key, .. } if key == "future"));
    }
}
