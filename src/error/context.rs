//! Error context for enriched error information.
//!
//! Context is attached by whoever drives the core (usually
//! [`Document`](crate::document::Document)) so a logged failure says which
//! update and which part of the tree it concerned.

use crate::models::ComponentId;

/// Context information attached to errors for debugging and recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Human-readable description of the operation that failed.
    pub operation: String,

    /// Sequence number of the diff being applied, counted from the last root.
    pub sequence: Option<u64>,

    /// Component the failure concerns, if any.
    pub component: Option<ComponentId>,

    /// Location inside the payload or tree, e.g. `c.3.0.d[2]`.
    pub path: Option<String>,
}

impl ErrorContext {
    /// Create a new ErrorContext for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            sequence: None,
            component: None,
            path: None,
        }
    }

    /// Set the diff sequence number for this context.
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Set the component for this context.
    pub fn with_component(mut self, component: ComponentId) -> Self {
        self.component = Some(component);
        self
    }

    /// Set the tree path for this context.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get a formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(sequence) = self.sequence {
            parts.push(format!("sequence={}", sequence));
        }

        if let Some(component) = self.component {
            parts.push(format!("component={}", component));
        }

        if let Some(ref path) = self.path {
            parts.push(format!("path={}", path));
        }

        parts.join(" ")
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.operation)?;

        if let Some(sequence) = self.sequence {
            write!(f, " seq={}", sequence)?;
        }

        if let Some(component) = self.component {
            write!(f, " component={}", component)?;
        }

        if let Some(ref path) = self.path {
            write!(f, " at {}", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = ErrorContext::new("apply_diff");

        assert_eq!(ctx.operation, "apply_diff");
        assert!(ctx.sequence.is_none());
        assert!(ctx.component.is_none());
        assert!(ctx.path.is_none());
    }

    #[test]
    fn test_context_builder_pattern() {
        let ctx = ErrorContext::new("apply_diff")
            .with_sequence(7)
            .with_component(3)
            .with_path("c.3.0");

        assert_eq!(ctx.sequence, Some(7));
        assert_eq!(ctx.component, Some(3));
        assert_eq!(ctx.path.as_deref(), Some("c.3.0"));
    }

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("apply_diff").with_sequence(2);

        let display = format!("{}", ctx);
        assert!(display.contains("apply_diff"));
        assert!(display.contains("seq=2"));
        assert!(!display.contains("component="));
    }

    #[test]
    fn test_context_to_log_string() {
        let ctx = ErrorContext::new("decode_root")
            .with_component(4)
            .with_path("c.4.s");

        let log_str = ctx.to_log_string();
        assert!(log_str.contains("operation=decode_root"));
        assert!(log_str.contains("component=4"));
        assert!(log_str.contains("path=c.4.s"));
        assert!(!log_str.contains("sequence="));
    }

    #[test]
    fn test_context_default() {
        assert_eq!(ErrorContext::default().operation, "unknown");
    }
}
