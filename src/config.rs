//! Decode and render limits.
//!
//! The core reads no environment variables and no files; a [`TreeConfig`] is
//! built by the embedding transport and handed to the `*_with_config` entry
//! points.

/// Default nesting limit for fragments and component chains.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for decoding and rendering.
///
/// Use the builder pattern to customize behavior.
///
/// # Example
///
/// ```ignore
/// use livetree::TreeConfig;
///
/// let config = TreeConfig::default()
///     .with_max_depth(64)
///     .with_strict_keys(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum fragment nesting (decode) and fragment + component nesting (render)
    pub max_depth: usize,
    /// Check component and template references when decoding a full root
    pub validate_references: bool,
    /// Reject keys the wire format does not define instead of ignoring them
    pub strict_keys: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            validate_references: true,
            strict_keys: false,
        }
    }
}

impl TreeConfig {
    /// Create a new TreeConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set whether full roots get their references validated on decode.
    pub fn with_validate_references(mut self, validate: bool) -> Self {
        self.validate_references = validate;
        self
    }

    /// Set whether unknown payload keys are rejected.
    pub fn with_strict_keys(mut self, strict: bool) -> Self {
        self.strict_keys = strict;
        self
    }
}
