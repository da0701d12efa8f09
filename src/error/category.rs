//! Error category classification for unified error handling.
//!
//! Categories tell the transport what to do with a failed step: drop the
//! update, resynchronize the whole tree, or fix the outgoing value.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Payload did not match any recognized shape.
    /// The payload is rejected as a whole.
    Protocol,

    /// Diff does not fit the current tree (out-of-order or lost update).
    /// The held tree is still valid; a fresh root fixes the divergence.
    State,

    /// Outgoing value contains something the wire cannot carry.
    Encoding,

    /// Tree handed to the renderer breaks its own invariants.
    /// Only reachable with hand-built trees.
    Internal,
}

impl ErrorCategory {
    /// Returns true if a full resynchronization (fresh root) is the fix.
    pub fn requires_resync(&self) -> bool {
        matches!(self, ErrorCategory::Protocol | ErrorCategory::State)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::State => "state",
            ErrorCategory::Encoding => "encoding",
            ErrorCategory::Internal => "internal",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Protocol => "Malformed server payload",
            ErrorCategory::State => "Update does not match the current view",
            ErrorCategory::Encoding => "Value cannot be sent to the server",
            ErrorCategory::Internal => "Inconsistent view tree",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Protocol => "Discard the payload and request a full render",
            ErrorCategory::State => "Keep the current view and request a full render",
            ErrorCategory::Encoding => "Convert the value to a JSON-compatible shape before sending",
            ErrorCategory::Internal => "This may be a bug. Please report this issue if it persists",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
