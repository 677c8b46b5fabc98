//! The persistence contract the resolution engine runs against.

use crate::error::Result;
use parking_lot::RwLock;
use secretacl_models::{Operation, SecretAcl};
use std::collections::HashMap;

/// Persistence contract for ACL records.
///
/// `upsert_grants` is the only write primitive the engine uses for
/// record content: it persists the record's scalar fields and, when
/// `user_ids` is `Some`, fully replaces its grant set - atomically for
/// that one record. `None` leaves the stored grants untouched. The
/// record is created if it does not exist yet.
pub trait AclStore: Send + Sync {
    fn get(&self, acl_id: &str) -> Result<Option<SecretAcl>>;

    fn get_by_operation(&self, secret_id: &str, operation: Operation)
    -> Result<Option<SecretAcl>>;

    /// All of a secret's records, ordered by operation.
    fn list_for_secret(&self, secret_id: &str) -> Result<Vec<SecretAcl>>;

    fn count_for_secret(&self, secret_id: &str) -> Result<usize>;

    fn upsert_grants(&self, acl: &mut SecretAcl, user_ids: Option<&[String]>) -> Result<()>;

    /// Returns whether the record existed.
    fn delete_by_id(&self, acl_id: &str) -> Result<bool>;

    /// Returns how many records existed.
    fn delete_all_for_secret(&self, secret_id: &str) -> Result<usize>;
}

/// In-memory store, used by engine tests and as a lightweight embedded
/// alternative to the redb-backed store.
#[derive(Default)]
pub struct MemoryAclStore {
    records: RwLock<HashMap<String, SecretAcl>>,
}

impl MemoryAclStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AclStore for MemoryAclStore {
    fn get(&self, acl_id: &str) -> Result<Option<SecretAcl>> {
        Ok(self.records.read().get(acl_id).cloned())
    }

    fn get_by_operation(
        &self,
        secret_id: &str,
        operation: Operation,
    ) -> Result<Option<SecretAcl>> {
        Ok(self
            .records
            .read()
            .values()
            .find(|acl| acl.secret_id == secret_id && acl.operation == operation)
            .cloned())
    }

    fn list_for_secret(&self, secret_id: &str) -> Result<Vec<SecretAcl>> {
        let mut acls: Vec<SecretAcl> = self
            .records
            .read()
            .values()
            .filter(|acl| acl.secret_id == secret_id)
            .cloned()
            .collect();
        acls.sort_by_key(|acl| acl.operation);
        Ok(acls)
    }

    fn count_for_secret(&self, secret_id: &str) -> Result<usize> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|acl| acl.secret_id == secret_id)
            .count())
    }

    fn upsert_grants(&self, acl: &mut SecretAcl, user_ids: Option<&[String]>) -> Result<()> {
        if let Some(ids) = user_ids {
            acl.replace_users(ids.iter().cloned());
        }
        acl.touch();
        self.records.write().insert(acl.id.clone(), acl.clone());
        Ok(())
    }

    fn delete_by_id(&self, acl_id: &str) -> Result<bool> {
        Ok(self.records.write().remove(acl_id).is_some())
    }

    fn delete_all_for_secret(&self, secret_id: &str) -> Result<usize> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, acl| acl.secret_id != secret_id);
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryAclStore::new();

        let mut acl = SecretAcl::new("secret-001", Operation::Read, Some(false));
        let users = vec!["u1".to_string()];
        store.upsert_grants(&mut acl, Some(&users)).unwrap();

        assert_eq!(store.get(&acl.id).unwrap().unwrap(), acl);
        assert_eq!(store.count_for_secret("secret-001").unwrap(), 1);
        assert!(
            store
                .get_by_operation("secret-001", Operation::Read)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_memory_store_list_ordered() {
        let store = MemoryAclStore::new();

        let mut write = SecretAcl::new("secret-001", Operation::Write, None);
        store.upsert_grants(&mut write, None).unwrap();
        let mut read = SecretAcl::new("secret-001", Operation::Read, None);
        store.upsert_grants(&mut read, None).unwrap();

        let acls = store.list_for_secret("secret-001").unwrap();
        assert_eq!(acls[0].operation, Operation::Read);
        assert_eq!(acls[1].operation, Operation::Write);
    }

    #[test]
    fn test_memory_store_delete_all() {
        let store = MemoryAclStore::new();

        let mut read = SecretAcl::new("secret-001", Operation::Read, None);
        store.upsert_grants(&mut read, None).unwrap();
        let mut other = SecretAcl::new("secret-002", Operation::Read, None);
        store.upsert_grants(&mut other, None).unwrap();

        assert_eq!(store.delete_all_for_secret("secret-001").unwrap(), 1);
        assert_eq!(store.count_for_secret("secret-001").unwrap(), 0);
        assert_eq!(store.count_for_secret("secret-002").unwrap(), 1);
    }
}
