//! Diff decoding.
//!
//! A diff object with `"s"` carries a complete replacement; one with `"d"`
//! but no `"s"` updates a comprehension; anything else patches children of
//! a regular fragment by position.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use super::tree::{check_statics_arity, component_id_key, component_id_value, events, title};
use super::{
    json_type, position, Decoder, Object, Path, COMPONENT_KEYS, FRAGMENT_KEYS, ROOT_DIFF_KEYS,
};
use crate::diff::{ChildDiff, ComponentDiff, FragmentDiff, RootDiff};
use crate::error::DecodeError;
use crate::models::{ComponentId, Statics};

impl Decoder<'_> {
    pub(crate) fn root_diff(&self, payload: &JsonValue) -> Result<RootDiff, DecodeError> {
        let path = Path::root();
        let object = self.object(payload, &path)?;
        self.check_keys(object, ROOT_DIFF_KEYS, &path)?;

        let fragment = self.fragment_diff_from_object(object, &path, 0)?;
        let components = match object.get("c") {
            Some(value) => self.component_diffs(value, &path.key("c"))?,
            None => BTreeMap::new(),
        };
        let title = object.get("t").map(title).transpose()?;
        let events = object.get("e").map(events).transpose()?.unwrap_or_default();

        Ok(RootDiff {
            fragment,
            components,
            title,
            events,
        })
    }

    fn fragment_diff_from_object(
        &self,
        object: &Object,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<FragmentDiff, DecodeError> {
        self.check_depth(depth, path)?;

        if object.contains_key("s") {
            return self
                .fragment_from_object(object, path, depth)
                .map(FragmentDiff::ReplaceCurrent);
        }

        if let Some(dynamics) = object.get("d") {
            let dynamics = self.dynamics(dynamics, &path.key("d"), depth)?;
            let templates = object
                .get("p")
                .map(|value| self.templates(value, &path.key("p")))
                .transpose()?;
            return Ok(FragmentDiff::UpdateComprehension {
                dynamics,
                templates,
            });
        }

        self.child_diffs(object, path, depth)
            .map(|children| FragmentDiff::UpdateRegular { children })
    }

    fn child_diffs(
        &self,
        object: &Object,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<BTreeMap<usize, ChildDiff>, DecodeError> {
        let mut children = BTreeMap::new();
        for (key, value) in object {
            if let Some(index) = position(key, path)? {
                children.insert(index, self.child_diff(value, &path.key(key), depth)?);
            }
        }
        Ok(children)
    }

    fn child_diff(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
        depth: usize,
    ) -> Result<ChildDiff, DecodeError> {
        match value {
            JsonValue::String(s) => Ok(ChildDiff::String(s.clone())),
            JsonValue::Number(_) => component_id_value(value, path).map(ChildDiff::ComponentId),
            JsonValue::Object(object) => {
                self.check_keys(object, FRAGMENT_KEYS, path)?;
                self.fragment_diff_from_object(object, path, depth + 1)
                    .map(ChildDiff::Fragment)
            }
            other => Err(DecodeError::InvalidChild {
                path: path.to_string(),
                found: json_type(other),
            }),
        }
    }

    fn component_diffs(
        &self,
        value: &JsonValue,
        path: &Path<'_>,
    ) -> Result<BTreeMap<ComponentId, ComponentDiff>, DecodeError> {
        let object = self.object(value, path)?;
        let mut diffs = BTreeMap::new();
        let mut same_payload = Vec::new();
        for (key, body) in object {
            let id = component_id_key(key)?;
            let body_path = path.key(key);
            let body = self.object(body, &body_path)?;
            if body.get("s").and_then(JsonValue::as_i64).is_some_and(|n| n > 0) {
                same_payload.push(id);
            }
            diffs.insert(id, self.component_diff(body, id, &body_path)?);
        }

        // Positive references name components of this payload and are copied
        // in now; negative ones keep naming the table the diff is merged into.
        let resolved = same_payload
            .iter()
            .map(|&id| payload_statics(&diffs, &same_payload, id).map(|statics| (id, statics)))
            .collect::<Result<Vec<_>, _>>()?;
        for (id, statics) in resolved {
            if let Some(ComponentDiff::ReplaceCurrent(component)) = diffs.get_mut(&id) {
                let key = id.to_string();
                check_statics_arity(&statics, component.children.len(), &path.key(&key))?;
                component.statics = statics;
            }
        }
        Ok(diffs)
    }

    fn component_diff(
        &self,
        object: &Object,
        id: ComponentId,
        path: &Path<'_>,
    ) -> Result<ComponentDiff, DecodeError> {
        if object.contains_key("s") {
            return self
                .component(object, id, path)
                .map(ComponentDiff::ReplaceCurrent);
        }
        self.check_keys(object, COMPONENT_KEYS, path)?;
        if object.contains_key("d") {
            return Err(DecodeError::UnexpectedComprehension {
                path: path.to_string(),
            });
        }
        self.child_diffs(object, path, 0)
            .map(|children| ComponentDiff::UpdateRegular { children })
    }
}

/// Follow same-payload references from component `id` to the statics they end at.
fn payload_statics(
    diffs: &BTreeMap<ComponentId, ComponentDiff>,
    same_payload: &[ComponentId],
    id: ComponentId,
) -> Result<Statics, DecodeError> {
    let mut visited = Vec::new();
    let mut current = id;
    loop {
        visited.push(current);
        let Some(ComponentDiff::ReplaceCurrent(component)) = diffs.get(&current) else {
            return Err(DecodeError::InvalidStaticsReference {
                id,
                target: current,
            });
        };
        match &component.statics {
            Statics::ComponentRef(target) if same_payload.contains(&current) => {
                if visited.contains(target) {
                    return Err(DecodeError::InvalidStaticsReference {
                        id,
                        target: *target,
                    });
                }
                current = *target;
            }
            statics => return Ok(statics.clone()),
        }
    }
}
