//! Result type alias for crate operations.

use super::context::ErrorContext;
use super::tree_error::TreeError;

/// Type alias for Results using TreeError.
pub type TreeResult<T> = Result<T, TreeError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    fn context(self, ctx: ErrorContext) -> TreeResult<T>;

    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> TreeResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<TreeError>,
{
    fn context(self, ctx: ErrorContext) -> TreeResult<T> {
        self.map_err(|e| {
            let err: TreeError = e.into();
            err.with_context(ctx)
        })
    }

    fn with_context<F>(self, f: F) -> TreeResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| {
            let err: TreeError = e.into();
            err.with_context(f())
        })
    }
}
