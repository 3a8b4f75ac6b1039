//! Application-level errors for the HTTP boundary.
//!
//! The core domain modules carry their own error types with per-kind codes
//! and statuses; this enum covers the cross-cutting rejections (auth,
//! lookup, validation, conflict) that map straight onto the API error
//! envelope.

use thiserror::Error;

/// A rejection outside the core domain, with a stable wire code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    /// The caller is not authenticated, or the credential is unusable.
    #[error("authentication required: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A referenced resource does not exist in the caller's workspace.
    #[error("{resource} not found")]
    NotFound {
        /// What was looked up.
        resource: String,
    },

    /// The request payload failed validation.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The request conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// The HTTP status and wire code for the error envelope.
    #[must_use]
    pub const fn respond_with(&self) -> (u16, &'static str) {
        match self {
            Self::Unauthorized(_) => (401, "UNAUTHORIZED"),
            Self::Forbidden(_) => (403, "FORBIDDEN"),
            Self::NotFound { .. } => (404, "NOT_FOUND"),
            Self::Validation(_) => (400, "VALIDATION_ERROR"),
            Self::Conflict(_) => (409, "CONFLICT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parts() {
        assert_eq!(
            AppError::Unauthorized(String::new()).respond_with(),
            (401, "UNAUTHORIZED")
        );
        assert_eq!(
            AppError::Forbidden(String::new()).respond_with(),
            (403, "FORBIDDEN")
        );
        assert_eq!(
            AppError::NotFound {
                resource: "User".to_string()
            }
            .respond_with(),
            (404, "NOT_FOUND")
        );
        assert_eq!(
            AppError::Validation(String::new()).respond_with(),
            (400, "VALIDATION_ERROR")
        );
        assert_eq!(
            AppError::Conflict(String::new()).respond_with(),
            (409, "CONFLICT")
        );
    }

    #[test]
    fn test_messages_name_the_subject() {
        assert_eq!(
            AppError::NotFound {
                resource: "User".to_string()
            }
            .to_string(),
            "User not found"
        );
        assert_eq!(
            AppError::Conflict("email already registered".to_string()).to_string(),
            "conflict: email already registered"
        );
        assert_eq!(
            AppError::Validation("password too short".to_string()).to_string(),
            "invalid request: password too short"
        );
    }
}
