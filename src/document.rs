//! Per-connection owner of the current tree.
//!
//! A [`Document`] is created from the full payload received on join, then
//! fed every diff the server sends, in order. It never holds a half-merged
//! tree: a diff that does not fit is rejected with the previous root intact,
//! and the error says whether the caller should ask the server for a fresh
//! root.

use tracing::{debug, warn};

use crate::config::TreeConfig;
use crate::decode::{decode_root_diff_with_config, decode_root_with_config};
use crate::diff::{PushEvent, RootDiff};
use crate::error::{DecodeError, ErrorContext, MergeError, ResultExt, TreeError, TreeResult};
use crate::merge::Merge;
use crate::models::Root;
use crate::render::render_with_config;

/// The rendered view of one connection.
#[derive(Debug, Clone)]
pub struct Document {
    root: Root,
    config: TreeConfig,
    /// Diffs applied since the last full root
    sequence: u64,
}

impl Document {
    pub fn new(root: Root) -> Self {
        Self::with_config(root, TreeConfig::default())
    }

    pub fn with_config(root: Root, config: TreeConfig) -> Self {
        Self {
            root,
            config,
            sequence: 0,
        }
    }

    /// Decode a full root payload.
    pub fn from_json(text: &str) -> TreeResult<Self> {
        Self::from_json_with_config(text, TreeConfig::default())
    }

    pub fn from_json_with_config(text: &str, config: TreeConfig) -> TreeResult<Self> {
        let payload: serde_json::Value = serde_json::from_str(text)?;
        let root = decode_root_with_config(&payload, &config)
            .map_err(|err| decode_failure(err, ErrorContext::new("decode_root")))?;
        Ok(Self::with_config(root, config))
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn into_root(self) -> Root {
        self.root
    }

    /// Merge `diff` into the held root and hand back its push events.
    ///
    /// On error the held root and the sequence number are unchanged.
    pub fn apply(&mut self, mut diff: RootDiff) -> TreeResult<Vec<PushEvent>> {
        let sequence = self.sequence + 1;
        let events = std::mem::take(&mut diff.events);

        if let Err(err) = self.root.merge_in_place(diff) {
            let mut context = ErrorContext::new("apply_diff").with_sequence(sequence);
            if let MergeError::CreateComponentFromUpdate { id }
            | MergeError::InvalidStaticsReference { id, .. } = err
            {
                context = context.with_component(id);
            }
            warn!("Rejected diff ({}): {} [{}]", err.error_code(), err, context.to_log_string());
            return Err(TreeError::from(err).with_context(context));
        }

        self.sequence = sequence;
        debug!(
            "Applied diff {}: {} event(s), {} component(s)",
            sequence,
            events.len(),
            self.root.components.len()
        );
        Ok(events)
    }

    /// Decode a diff payload and apply it.
    pub fn apply_json(&mut self, text: &str) -> TreeResult<Vec<PushEvent>> {
        let sequence = self.sequence + 1;
        let payload = serde_json::from_str::<serde_json::Value>(text)
            .with_context(|| ErrorContext::new("decode_diff").with_sequence(sequence))?;
        let diff = decode_root_diff_with_config(&payload, &self.config).map_err(|err| {
            decode_failure(err, ErrorContext::new("decode_diff").with_sequence(sequence))
        })?;
        self.apply(diff)
    }

    /// Render the held root.
    pub fn render(&self) -> TreeResult<String> {
        render_with_config(&self.root, &self.config)
            .with_context(|| ErrorContext::new("render").with_sequence(self.sequence))
    }

    /// Replace the held root with a freshly received one, e.g. after a resync.
    pub fn reset(&mut self, root: Root) {
        debug!("Resetting document after {} diff(s)", self.sequence);
        self.root = root;
        self.sequence = 0;
    }
}

/// Wrap a decode error, recording where in the payload it was found.
fn decode_failure(err: DecodeError, context: ErrorContext) -> TreeError {
    let context = match err.path() {
        Some(path) => context.with_path(path),
        None => context,
    };
    warn!("Rejected payload ({}): {} [{}]", err.error_code(), err, context.to_log_string());
    TreeError::from(err).with_context(context)
}
