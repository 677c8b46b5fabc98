//! Request payload types for ACL creation and update.

use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One operation's requested change.
///
/// Both fields are optional and independent: an omitted field means
/// "leave unchanged" on update paths. When `users` is present it fully
/// replaces the stored grant set; there is no incremental merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(
        default,
        rename = "creator-only",
        skip_serializing_if = "Option::is_none"
    )]
    pub creator_only: Option<bool>,
}

impl AclEntry {
    pub fn with_users<I, S>(user_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: Some(user_ids.into_iter().map(Into::into).collect()),
            creator_only: None,
        }
    }

    pub fn creator_only(mut self, value: bool) -> Self {
        self.creator_only = Some(value);
        self
    }
}

/// A map from operation to requested change. Operations absent from the
/// payload are left untouched. Keys outside the closed operation set
/// fail deserialization, so a parsed payload is structurally valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AclPayload(pub BTreeMap<Operation, AclEntry>);

impl AclPayload {
    /// Parse a payload out of an already-decoded JSON body.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    pub fn get(&self, operation: Operation) -> Option<&AclEntry> {
        self.0.get(&operation)
    }

    /// Entries in the fixed operation order (read before write).
    pub fn iter(&self) -> impl Iterator<Item = (Operation, &AclEntry)> {
        self.0.iter().map(|(op, entry)| (*op, entry))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, operation: Operation, entry: AclEntry) -> Option<AclEntry> {
        self.0.insert(operation, entry)
    }
}

impl FromIterator<(Operation, AclEntry)> for AclPayload {
    fn from_iter<T: IntoIterator<Item = (Operation, AclEntry)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wire_shape() {
        let body = json!({
            "read": { "users": ["u1"] },
            "write": { "users": ["u1", "u2"], "creator-only": true }
        });

        let payload = AclPayload::from_value(&body).unwrap();
        assert_eq!(
            payload.get(Operation::Read).unwrap().users,
            Some(vec!["u1".to_string()])
        );
        let write = payload.get(Operation::Write).unwrap();
        assert_eq!(write.creator_only, Some(true));
        assert_eq!(write.users.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_unknown_operation() {
        let body = json!({ "delete": { "users": ["u1"] } });
        assert!(AclPayload::from_value(&body).is_err());
    }

    #[test]
    fn test_omitted_fields_stay_none() {
        let body = json!({ "read": {} });
        let payload = AclPayload::from_value(&body).unwrap();
        let entry = payload.get(Operation::Read).unwrap();
        assert_eq!(entry.users, None);
        assert_eq!(entry.creator_only, None);
    }

    #[test]
    fn test_iteration_order_is_fixed() {
        let mut payload = AclPayload::default();
        payload.insert(Operation::Write, AclEntry::default());
        payload.insert(Operation::Read, AclEntry::default());

        let ops: Vec<Operation> = payload.iter().map(|(op, _)| op).collect();
        assert_eq!(ops, vec![Operation::Read, Operation::Write]);
    }
}
