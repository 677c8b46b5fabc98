//! redb-backed implementation of the store contract.

use crate::error::Result;
use crate::store::AclStore;
use redb::Database;
use secretacl_models::{Operation, SecretAcl};
use std::path::Path;
use std::sync::Arc;

/// `AclStore` over `secretacl_storage::AclStorage`.
///
/// Storage errors surface as `AclError::Store`; everything else maps
/// one-to-one onto the underlying table operations.
pub struct RedbAclStore {
    inner: secretacl_storage::AclStorage,
}

impl RedbAclStore {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self {
            inner: secretacl_storage::AclStorage::new(db)?,
        })
    }

    /// Create or open a database file at `path` and build a store on it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path).map_err(anyhow::Error::from)?;
        Self::new(Arc::new(db))
    }
}

impl AclStore for RedbAclStore {
    fn get(&self, acl_id: &str) -> Result<Option<SecretAcl>> {
        Ok(self.inner.get(acl_id)?)
    }

    fn get_by_operation(
        &self,
        secret_id: &str,
        operation: Operation,
    ) -> Result<Option<SecretAcl>> {
        Ok(self.inner.get_by_operation(secret_id, operation)?)
    }

    fn list_for_secret(&self, secret_id: &str) -> Result<Vec<SecretAcl>> {
        Ok(self.inner.list_for_secret(secret_id)?)
    }

    fn count_for_secret(&self, secret_id: &str) -> Result<usize> {
        Ok(self.inner.count_for_secret(secret_id)?)
    }

    fn upsert_grants(&self, acl: &mut SecretAcl, user_ids: Option<&[String]>) -> Result<()> {
        Ok(self.inner.upsert_grants(acl, user_ids)?)
    }

    fn delete_by_id(&self, acl_id: &str) -> Result<bool> {
        Ok(self.inner.delete(acl_id)?)
    }

    fn delete_all_for_secret(&self, secret_id: &str) -> Result<usize> {
        Ok(self.inner.delete_all_for(secret_id)?)
    }
}
