//! Decoding of the key-coded wire format into tree and diff values.
//!
//! Payloads arrive as nested objects using the short keys `"s"` (statics),
//! `"d"` (dynamics), `"p"` (templates), `"c"` (components), `"t"` (title) and
//! `"e"` (events), with stringified integers as child positions. Decoding is
//! all-or-nothing: any shape error rejects the whole payload.

mod diff;
mod path;
mod tree;
mod validate;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::TreeConfig;
use crate::diff::RootDiff;
use crate::error::DecodeError;
use crate::models::Root;

pub(crate) use path::Path;

/// Keys a fragment object may carry besides child positions.
const FRAGMENT_KEYS: &[&str] = &["s", "d", "p", "r"];
/// Keys a full root may carry besides child positions.
const ROOT_KEYS: &[&str] = &["s", "d", "p", "r", "c", "t"];
/// Keys a root diff may carry besides child positions.
const ROOT_DIFF_KEYS: &[&str] = &["s", "d", "p", "r", "c", "t", "e"];
/// Keys a component object may carry besides child positions.
const COMPONENT_KEYS: &[&str] = &["s", "r"];

/// Decode the payload received on join into a [`Root`].
pub fn decode_root(payload: &JsonValue) -> Result<Root, DecodeError> {
    decode_root_with_config(payload, &TreeConfig::default())
}

/// Decode raw JSON text received on join into a [`Root`].
pub fn decode_root_str(text: &str) -> Result<Root, DecodeError> {
    let payload: JsonValue = serde_json::from_str(text)?;
    decode_root(&payload)
}

/// Decode a full root with explicit limits.
pub fn decode_root_with_config(
    payload: &JsonValue,
    config: &TreeConfig,
) -> Result<Root, DecodeError> {
    let decoder = Decoder::new(config);
    let root = decoder.root(payload)?;
    if config.validate_references {
        validate::root(&root)?;
    }
    debug!(
        "Decoded root: {} component(s), {} root child slot(s)",
        root.components.len(),
        root.fragment.children().count()
    );
    Ok(root)
}

/// Decode an incremental update into a [`RootDiff`].
pub fn decode_root_diff(payload: &JsonValue) -> Result<RootDiff, DecodeError> {
    decode_root_diff_with_config(payload, &TreeConfig::default())
}

/// Decode raw JSON text of an incremental update.
pub fn decode_root_diff_str(text: &str) -> Result<RootDiff, DecodeError> {
    let payload: JsonValue = serde_json::from_str(text)?;
    decode_root_diff(&payload)
}

/// Decode an incremental update with explicit limits.
pub fn decode_root_diff_with_config(
    payload: &JsonValue,
    config: &TreeConfig,
) -> Result<RootDiff, DecodeError> {
    let decoder = Decoder::new(config);
    let diff = decoder.root_diff(payload)?;
    debug!(
        "Decoded diff: {} component update(s), {} event(s)",
        diff.components.len(),
        diff.events.len()
    );
    Ok(diff)
}

pub(crate) type Object = serde_json::Map<String, JsonValue>;

/// Shared state of one decode call.
pub(crate) struct Decoder<'c> {
    config: &'c TreeConfig,
}

impl<'c> Decoder<'c> {
    pub(crate) fn new(config: &'c TreeConfig) -> Self {
        Self { config }
    }

    pub(crate) fn object<'v>(
        &self,
        value: &'v JsonValue,
        path: &Path<'_>,
    ) -> Result<&'v Object, DecodeError> {
        value.as_object().ok_or_else(|| DecodeError::ExpectedObject {
            path: path.to_string(),
            found: json_type(value),
        })
    }

    pub(crate) fn check_depth(&self, depth: usize, path: &Path<'_>) -> Result<(), DecodeError> {
        if depth > self.config.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                path: path.to_string(),
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// In strict mode, reject keys that are neither child positions nor allowed.
    pub(crate) fn check_keys(
        &self,
        object: &Object,
        allowed: &[&str],
        path: &Path<'_>,
    ) -> Result<(), DecodeError> {
        if !self.config.strict_keys {
            return Ok(());
        }
        match object
            .keys()
            .find(|key| child_index(key).is_none() && !allowed.contains(&key.as_str()))
        {
            Some(key) => Err(DecodeError::UnknownKey {
                path: path.to_string(),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Child position encoded as a key: ASCII digits with no leading zero.
pub(crate) fn child_index(key: &str) -> Option<usize> {
    if !is_digits(key) || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

/// Child position of an object key, `None` for named keys like `"s"`.
///
/// Digit keys must be canonical; `"01"` would otherwise alias `"1"`.
pub(crate) fn position(key: &str, path: &Path<'_>) -> Result<Option<usize>, DecodeError> {
    if !is_digits(key) {
        return Ok(None);
    }
    child_index(key)
        .map(Some)
        .ok_or_else(|| DecodeError::InvalidChildKey {
            path: path.to_string(),
            key: key.to_string(),
        })
}

fn is_digits(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
