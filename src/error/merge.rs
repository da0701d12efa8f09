//! Errors raised when a diff does not fit the tree it is applied to.

use thiserror::Error;

use crate::models::{ComponentId, FragmentKind};

/// Structural expectation a diff violated.
///
/// The value the diff was applied to is never modified when one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// An update for one fragment shape met a fragment of the other shape.
    #[error("cannot apply a {expected} update to a {found} fragment")]
    FragmentTypeMismatch {
        expected: FragmentKind,
        found: FragmentKind,
    },

    /// A non-replacing fragment diff targeted a child that is not a fragment.
    #[error("cannot patch child {index}: it is not a fragment")]
    CreateChildFromUpdateFragment { index: usize },

    /// A regular update named an index beyond the existing children.
    #[error("cannot add child {index} to a fragment with {len} children")]
    AddChildToExisting { index: usize, len: usize },

    /// A component missing from the table was sent as an update.
    #[error("cannot create component {id} from an update")]
    CreateComponentFromUpdate { id: ComponentId },

    /// A replacement shares the statics of a component that is not held
    /// before it.
    #[error("component {id} cannot share statics of component {target}")]
    InvalidStaticsReference { id: ComponentId, target: ComponentId },
}

impl MergeError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            MergeError::FragmentTypeMismatch { .. } => "E_MERGE_TYPE_MISMATCH",
            MergeError::CreateChildFromUpdateFragment { .. } => "E_MERGE_CHILD_FROM_UPDATE",
            MergeError::AddChildToExisting { .. } => "E_MERGE_ADD_CHILD",
            MergeError::CreateComponentFromUpdate { .. } => "E_MERGE_COMPONENT_FROM_UPDATE",
            MergeError::InvalidStaticsReference { .. } => "E_MERGE_STATICS_REF",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        "The view fell out of sync with the server.".to_string()
    }
}
