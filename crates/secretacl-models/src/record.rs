//! The stored ACL record.

use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One operation's access rule for one secret.
///
/// At most one record exists per (secret, operation) pair. The `id`,
/// `secret_id` and `operation` fields are fixed at creation; only the
/// grant set and the creator-only flag may change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretAcl {
    pub id: String,
    pub secret_id: String,
    pub operation: Operation,
    /// Tri-state: `None` means the flag was never explicitly set, which
    /// can only happen on the bulk-update implicit-create path. Treated
    /// as false when evaluating access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_only: Option<bool>,
    #[serde(default)]
    pub users: BTreeSet<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SecretAcl {
    /// Create a new record with a fresh id and an empty grant set.
    pub fn new(
        secret_id: impl Into<String>,
        operation: Operation,
        creator_only: Option<bool>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            secret_id: secret_id.into(),
            operation,
            creator_only,
            users: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_creator_only(&self) -> bool {
        self.creator_only.unwrap_or(false)
    }

    /// Replace the entire grant set. Duplicates collapse, order is
    /// canonical; there is no incremental add/remove.
    pub fn replace_users<I, S>(&mut self, user_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = user_ids.into_iter().map(Into::into).collect();
    }

    /// Bump the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Whether `user_id` may exercise this record's operation.
    ///
    /// The creator always passes. With creator-only set, the grant list
    /// is ignored even if populated.
    pub fn grants_access(&self, user_id: &str, creator_id: &str) -> bool {
        if user_id == creator_id {
            return true;
        }
        if self.is_creator_only() {
            return false;
        }
        self.users.contains(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_users_collapses_duplicates() {
        let mut acl = SecretAcl::new("secret-001", Operation::Read, Some(false));
        acl.replace_users(["u1", "u2", "u1"]);
        assert_eq!(acl.users.len(), 2);
        assert!(acl.users.contains("u1"));
        assert!(acl.users.contains("u2"));
    }

    #[test]
    fn test_grants_access_creator_always_passes() {
        let acl = SecretAcl::new("secret-001", Operation::Write, Some(true));
        assert!(acl.grants_access("creator", "creator"));
    }

    #[test]
    fn test_grants_access_creator_only_ignores_user_list() {
        let mut acl = SecretAcl::new("secret-001", Operation::Read, Some(true));
        acl.replace_users(["u1"]);
        assert!(!acl.grants_access("u1", "creator"));

        acl.creator_only = Some(false);
        assert!(acl.grants_access("u1", "creator"));
    }

    #[test]
    fn test_unset_creator_only_reads_as_false() {
        let mut acl = SecretAcl::new("secret-001", Operation::Read, None);
        acl.replace_users(["u1"]);
        assert!(!acl.is_creator_only());
        assert!(acl.grants_access("u1", "creator"));
        assert!(!acl.grants_access("u2", "creator"));
    }

    #[test]
    fn test_serde_round_trip_keeps_grants() {
        let mut acl = SecretAcl::new("secret-001", Operation::Write, None);
        acl.replace_users(["u1", "u2"]);

        let json = serde_json::to_string(&acl).unwrap();
        // Unset flag stays absent on the wire rather than becoming false.
        assert!(!json.contains("creator_only"));

        let back: SecretAcl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, acl);
    }
}
