//! Error taxonomy for inventory invocations.
//!
//! Every failure the collector can produce is an [`InventoryError`]. The
//! invocation entry point only cares about its [`FailureKind`]: authorization
//! and service failures are absorbed and logged, anything else is escalated
//! to the Lambda runtime.

use std::fmt;

use thiserror::Error;

/// How the entry point reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The cross-account role could not be assumed.
    Authorization,
    /// An AWS API call failed.
    Service,
    /// Anything else; re-raised to the hosting environment.
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Authorization => write!(f, "authorization"),
            FailureKind::Service => write!(f, "service"),
            FailureKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("unable to assume role {role_arn} into account {account_id}: {message}")]
    AssumeRole {
        account_id: String,
        role_arn: String,
        message: String,
    },

    #[error("{service} {operation} failed: {message}")]
    Service {
        service: &'static str,
        operation: &'static str,
        message: String,
    },

    #[error("account {0} is not in the account directory")]
    AccountNotFound(String),

    #[error("invalid trigger payload: {0}")]
    InvalidTrigger(String),

    #[error("{resource_type} descriptor is missing required field {field}")]
    IncompleteDescriptor {
        resource_type: &'static str,
        field: &'static str,
    },

    #[error("resource policy for {resource} is not valid JSON: {source}")]
    MalformedPolicy {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InventoryError {
    /// Build a service failure from any displayable SDK error.
    pub fn service(service: &'static str, operation: &'static str, err: impl fmt::Display) -> Self {
        InventoryError::Service {
            service,
            operation,
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            InventoryError::AssumeRole { .. } => FailureKind::Authorization,
            InventoryError::Service { .. } => FailureKind::Service,
            _ => FailureKind::Unexpected,
        }
    }
}

pub type InventoryResult<T> = std::result::Result<T, InventoryError>;
