//! Errors raised while decoding a root or diff payload.

use thiserror::Error;

use crate::models::{ComponentId, TemplateKey};

/// Payload does not match any recognized shape.
///
/// Always fatal to the one decode call; no partial tree is returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected an object at `{path}`, found {found}")]
    ExpectedObject { path: String, found: &'static str },

    #[error("missing key `{key}` at `{path}`")]
    MissingKey { path: String, key: &'static str },

    #[error("unknown key `{key}` at `{path}`")]
    UnknownKey { path: String, key: String },

    #[error("invalid statics at `{path}`: {reason}")]
    InvalidStatics { path: String, reason: String },

    #[error("statics at `{path}` have {found} segments, expected {expected}")]
    StaticsArity {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("dynamics row {row} at `{path}` has {found} children, expected {expected}")]
    DynamicsArity {
        path: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid child at `{path}`: found {found}")]
    InvalidChild { path: String, found: &'static str },

    #[error("child key `{key}` at `{path}` is not a canonical position")]
    InvalidChildKey { path: String, key: String },

    #[error("child {index} missing at `{path}`; child keys must be contiguous from 0")]
    MissingChild { path: String, index: usize },

    #[error("invalid component ID `{key}`")]
    InvalidComponentId { key: String },

    #[error("invalid template key `{key}` at `{path}`")]
    InvalidTemplateKey { path: String, key: String },

    #[error("component at `{path}` has a comprehension shape")]
    UnexpectedComprehension { path: String },

    #[error("component {id} is referenced but not defined")]
    DanglingComponent { id: ComponentId },

    #[error("template {key} referenced at `{path}` is not defined by an enclosing comprehension")]
    DanglingTemplate { path: String, key: TemplateKey },

    #[error("component {id} shares statics of component {target}, which is not defined before it")]
    InvalidStaticsReference { id: ComponentId, target: ComponentId },

    #[error("invalid event {index}: {reason}")]
    InvalidEvent { index: usize, reason: &'static str },

    #[error("invalid title: expected string, found {found}")]
    InvalidTitle { found: &'static str },

    #[error("nesting deeper than {limit} at `{path}`")]
    DepthLimitExceeded { path: String, limit: usize },
}

impl DecodeError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            DecodeError::InvalidJson(_) => "E_DECODE_JSON",
            DecodeError::ExpectedObject { .. } => "E_DECODE_OBJECT",
            DecodeError::MissingKey { .. } => "E_DECODE_MISSING_KEY",
            DecodeError::UnknownKey { .. } => "E_DECODE_UNKNOWN_KEY",
            DecodeError::InvalidStatics { .. } => "E_DECODE_STATICS",
            DecodeError::StaticsArity { .. } => "E_DECODE_STATICS_ARITY",
            DecodeError::DynamicsArity { .. } => "E_DECODE_DYNAMICS_ARITY",
            DecodeError::InvalidChild { .. } => "E_DECODE_CHILD",
            DecodeError::InvalidChildKey { .. } => "E_DECODE_CHILD_KEY",
            DecodeError::MissingChild { .. } => "E_DECODE_MISSING_CHILD",
            DecodeError::InvalidComponentId { .. } => "E_DECODE_CID",
            DecodeError::InvalidTemplateKey { .. } => "E_DECODE_TEMPLATE_KEY",
            DecodeError::UnexpectedComprehension { .. } => "E_DECODE_COMPONENT_SHAPE",
            DecodeError::DanglingComponent { .. } => "E_DECODE_DANGLING_CID",
            DecodeError::DanglingTemplate { .. } => "E_DECODE_DANGLING_TEMPLATE",
            DecodeError::InvalidStaticsReference { .. } => "E_DECODE_STATICS_REF",
            DecodeError::InvalidEvent { .. } => "E_DECODE_EVENT",
            DecodeError::InvalidTitle { .. } => "E_DECODE_TITLE",
            DecodeError::DepthLimitExceeded { .. } => "E_DECODE_DEPTH",
        }
    }

    /// Payload location the error was found at, when it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::ExpectedObject { path, .. }
            | DecodeError::MissingKey { path, .. }
            | DecodeError::UnknownKey { path, .. }
            | DecodeError::InvalidStatics { path, .. }
            | DecodeError::StaticsArity { path, .. }
            | DecodeError::DynamicsArity { path, .. }
            | DecodeError::InvalidChild { path, .. }
            | DecodeError::InvalidChildKey { path, .. }
            | DecodeError::MissingChild { path, .. }
            | DecodeError::InvalidTemplateKey { path, .. }
            | DecodeError::UnexpectedComprehension { path }
            | DecodeError::DanglingTemplate { path, .. }
            | DecodeError::DepthLimitExceeded { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            DecodeError::InvalidJson(_) => {
                "Received invalid data from the server.".to_string()
            }
            DecodeError::DepthLimitExceeded { limit, .. } => {
                format!("The server sent a view nested deeper than {} levels.", limit)
            }
            _ => "The server sent a view this client cannot read.".to_string(),
        }
    }
}
