//! Errors raised while materializing a tree into markup.

use thiserror::Error;

use crate::models::{ComponentId, TemplateKey};

/// Tree handed to the renderer breaks one of its invariants.
///
/// Trees produced by decoding and merging never trigger these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("component {id} is not in the component table")]
    MissingComponent { id: ComponentId },

    #[error("template {key} is not defined by an enclosing comprehension")]
    MissingTemplate { key: TemplateKey },

    #[error("statics have {found} segments for {children} children")]
    StaticsArity { children: usize, found: usize },

    #[error("statics reference chain loops back to component {id}")]
    StaticsCycle { id: ComponentId },

    #[error("component {id} renders itself")]
    ComponentCycle { id: ComponentId },

    #[error("nesting deeper than {limit}")]
    DepthLimitExceeded { limit: usize },
}

impl RenderError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RenderError::MissingComponent { .. } => "E_RENDER_CID",
            RenderError::MissingTemplate { .. } => "E_RENDER_TEMPLATE",
            RenderError::StaticsArity { .. } => "E_RENDER_STATICS_ARITY",
            RenderError::StaticsCycle { .. } => "E_RENDER_STATICS_CYCLE",
            RenderError::ComponentCycle { .. } => "E_RENDER_COMPONENT_CYCLE",
            RenderError::DepthLimitExceeded { .. } => "E_RENDER_DEPTH",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        "The view could not be displayed.".to_string()
    }
}
