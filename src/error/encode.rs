//! Errors raised by the outgoing value encoder.

use std::fmt::Display;

use thiserror::Error;

/// Outgoing value has a shape the wire cannot carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Leaf type with no JSON form, e.g. raw bytes.
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),

    #[error("integer {0} does not fit in a signed 64-bit integer")]
    IntegerOutOfRange(String),

    #[error("non-finite float {0} has no JSON form")]
    NonFiniteFloat(String),

    #[error("map key must be a string, found {0}")]
    KeyMustBeString(&'static str),

    /// Raised by a `Serialize` impl through `serde::ser::Error::custom`.
    #[error("{0}")]
    Custom(String),
}

impl EncodeError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            EncodeError::UnsupportedType(_) => "E_ENCODE_TYPE",
            EncodeError::IntegerOutOfRange(_) => "E_ENCODE_INT_RANGE",
            EncodeError::NonFiniteFloat(_) => "E_ENCODE_FLOAT",
            EncodeError::KeyMustBeString(_) => "E_ENCODE_KEY",
            EncodeError::Custom(_) => "E_ENCODE_CUSTOM",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        format!("Could not send event data: {}", self)
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_error() {
        let err = <EncodeError as serde::ser::Error>::custom("bad value");
        assert_eq!(err, EncodeError::Custom("bad value".to_string()));
        assert_eq!(err.error_code(), "E_ENCODE_CUSTOM");
        assert!(err.user_message().contains("bad value"));
    }
}
