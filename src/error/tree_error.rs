//! Unified error type for the crate.
//!
//! `TreeError` wraps the four leaf taxonomies so a transport can handle
//! decode, merge, render and encode failures through one type.

use std::fmt;

use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::decode::DecodeError;
use super::encode::EncodeError;
use super::merge::MergeError;
use super::render::RenderError;

/// Unified error type.
#[derive(Debug)]
pub enum TreeError {
    /// Payload shape errors.
    Decode(DecodeError),

    /// Diff does not fit the current tree.
    Merge(MergeError),

    /// Tree breaks its own invariants.
    Render(RenderError),

    /// Outgoing value cannot be encoded.
    Encode(EncodeError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<TreeError>,
        context: ErrorContext,
    },
}

impl TreeError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TreeError::Decode(_) => ErrorCategory::Protocol,
            TreeError::Merge(_) => ErrorCategory::State,
            TreeError::Render(_) => ErrorCategory::Internal,
            TreeError::Encode(_) => ErrorCategory::Encoding,
            TreeError::WithContext { error, .. } => error.category(),
        }
    }

    /// Check if the caller should fetch a fresh root.
    pub fn requires_resync(&self) -> bool {
        self.category().requires_resync()
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            TreeError::Decode(err) => err.user_message(),
            TreeError::Merge(err) => err.user_message(),
            TreeError::Render(err) => err.user_message(),
            TreeError::Encode(err) => err.user_message(),
            TreeError::WithContext { error, context } => {
                format!("{}\n\nContext: {}", error.user_message(), context)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TreeError::Decode(err) => err.error_code(),
            TreeError::Merge(err) => err.error_code(),
            TreeError::Render(err) => err.error_code(),
            TreeError::Encode(err) => err.error_code(),
            TreeError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        TreeError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            TreeError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &TreeError {
        match self {
            TreeError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// The merge error underneath any context, if this is one.
    pub fn as_merge(&self) -> Option<&MergeError> {
        match self.inner() {
            TreeError::Merge(err) => Some(err),
            _ => None,
        }
    }

    /// The decode error underneath any context, if this is one.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self.inner() {
            TreeError::Decode(err) => Some(err),
            _ => None,
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Decode(err) => write!(f, "{}", err),
            TreeError::Merge(err) => write!(f, "{}", err),
            TreeError::Render(err) => write!(f, "{}", err),
            TreeError::Encode(err) => write!(f, "{}", err),
            TreeError::WithContext { error, context } => {
                write!(f, "{} ({})", error, context)
            }
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Decode(err) => Some(err),
            TreeError::Merge(err) => Some(err),
            TreeError::Render(err) => Some(err),
            TreeError::Encode(err) => Some(err),
            TreeError::WithContext { error, .. } => error.source(),
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<DecodeError> for TreeError {
    fn from(err: DecodeError) -> Self {
        TreeError::Decode(err)
    }
}

impl From<MergeError> for TreeError {
    fn from(err: MergeError) -> Self {
        TreeError::Merge(err)
    }
}

impl From<RenderError> for TreeError {
    fn from(err: RenderError) -> Self {
        TreeError::Render(err)
    }
}

impl From<EncodeError> for TreeError {
    fn from(err: EncodeError) -> Self {
        TreeError::Encode(err)
    }
}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        TreeError::Decode(DecodeError::InvalidJson(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_by_variant() {
        let merge: TreeError = MergeError::CreateComponentFromUpdate { id: 1 }.into();
        let render: TreeError = RenderError::MissingTemplate { key: 0 }.into();
        let encode: TreeError = EncodeError::UnsupportedType("bytes").into();

        assert_eq!(merge.category(), ErrorCategory::State);
        assert_eq!(render.category(), ErrorCategory::Internal);
        assert_eq!(encode.category(), ErrorCategory::Encoding);
        assert!(merge.requires_resync());
        assert!(!encode.requires_resync());
    }

    #[test]
    fn test_with_context_keeps_inner() {
        let err: TreeError = MergeError::AddChildToExisting { index: 3, len: 1 }.into();
        let err = err.with_context(ErrorContext::new("apply_diff").with_sequence(4));

        assert_eq!(err.context().unwrap().sequence, Some(4));
        assert_eq!(err.error_code(), "E_MERGE_ADD_CHILD");
        assert_eq!(
            err.as_merge(),
            Some(&MergeError::AddChildToExisting { index: 3, len: 1 })
        );
        assert!(err.as_decode().is_none());
        assert!(err.to_string().contains("seq=4"));
    }

    #[test]
    fn test_source_is_leaf() {
        use std::error::Error;

        let err: TreeError = RenderError::StaticsCycle { id: 2 }.into();
        let source = err.source().unwrap();
        assert!(source.to_string().contains("component 2"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err: TreeError = json_err.into();
        assert!(matches!(err, TreeError::Decode(DecodeError::InvalidJson(_))));
        assert_eq!(err.category(), ErrorCategory::Protocol);
    }
}
