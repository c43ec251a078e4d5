//! Contract error types for the fleet service
//!
//! These errors are transport-agnostic; the REST layer maps them to
//! Problem Details responses.

use thiserror::Error;

/// Fleet service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    /// Missing, malformed or unverifiable credential
    #[error("Unauthenticated: {reason}")]
    Unauthenticated {
        /// Why the credential was rejected
        reason: String,
    },
    /// Role or ship ownership mismatch
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Why access was denied
        reason: String,
    },
    /// Referenced entity is absent
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource kind (ship, task, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Malformed input or a business rule violation
    #[error("Validation error: {message}")]
    Validation {
        /// Validation error message
        message: String,
    },
    /// Anything else, including storage failures
    #[error("Internal error")]
    Internal,
}

impl FleetError {
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Log a storage failure and collapse it into `Internal`
    pub fn internal(error: anyhow::Error) -> Self {
        tracing::error!(error = ?error, "storage operation failed");
        Self::Internal
    }
}
