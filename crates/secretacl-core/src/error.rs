//! Error types for ACL resolution

use secretacl_models::Operation;
use thiserror::Error;

/// ACL resolution error types
#[derive(Error, Debug)]
pub enum AclError {
    #[error("no ACL found for id {0}")]
    AclNotFound(String),

    #[error("no ACLs found for secret {0}")]
    SecretAclsNotFound(String),

    #[error("secret {0} not found")]
    SecretNotFound(String),

    #[error("ACLs already exist for secret {0}; use the update path instead")]
    AlreadyExists(String),

    #[error("ACL {acl_id} is fixed to operation {operation}; its operation cannot be changed")]
    OperationMismatch { acl_id: String, operation: Operation },

    #[error("invalid ACL payload: {0}")]
    Validation(String),

    #[error("access denied for {action}: {reason}")]
    AccessDenied { action: String, reason: String },

    #[error("storage failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl AclError {
    /// Whether the failure is the caller's fault (400/404-class) rather
    /// than a persistence fault (500-class). Client errors are never
    /// retried.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AclError::Store(_))
    }
}

/// Result type alias for ACL operations
pub type Result<T> = std::result::Result<T, AclError>;
