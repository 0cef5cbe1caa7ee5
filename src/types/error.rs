//! Error types for Keyward
//!
//! Pattern adapted from doorway/src/types/error.rs

/// Main error type for credential engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Stable kind label for callers that map errors onto a wire surface
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::InvalidKeyMaterial(_) => "invalid_key_material",
            Self::Signing(_) => "signing",
            Self::Storage(_) => "storage",
        }
    }
}

// Implement From conversions for common error types

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("Record encoding error: {}", err))
    }
}

/// Result type alias for credential engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(EngineError::InvalidArgument("x".into()).kind(), "invalid_argument");
        assert_eq!(EngineError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(
            EngineError::InvalidKeyMaterial("x".into()).kind(),
            "invalid_key_material"
        );
        assert_eq!(EngineError::Signing("x".into()).kind(), "signing");
        assert_eq!(EngineError::Storage("x".into()).kind(), "storage");
    }

    #[test]
    fn test_error_display_includes_message() {
        let err = EngineError::NotFound("account missing".into());
        assert_eq!(err.to_string(), "Not found: account missing");
    }
}
