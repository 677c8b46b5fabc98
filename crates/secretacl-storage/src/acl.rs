//! ACL record storage with a per-secret operation index.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use secretacl_models::{Operation, SecretAcl};
use std::sync::Arc;

const ACL_DATA: TableDefinition<&str, &[u8]> = TableDefinition::new("secret_acls:data");
const ACL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("secret_acls:index");

/// Low-level ACL storage.
///
/// Every mutation runs in a single write transaction covering both the
/// data and index tables, which is what makes `upsert_grants` atomic per
/// record: scalar fields and the grant set are one JSON value, written in
/// one insert.
pub struct AclStorage {
    db: Arc<Database>,
}

impl AclStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(ACL_DATA)?;
        write_txn.open_table(ACL_INDEX)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Index keys are `{secret_id}:{operation}`. Scans parse the suffix
    /// after the secret's own prefix back into an operation, so a secret
    /// id that itself contains `:` cannot leak records into another
    /// secret's prefix scan.
    fn index_key(secret_id: &str, operation: Operation) -> String {
        format!("{secret_id}:{operation}")
    }

    /// Get a record by id
    pub fn get(&self, acl_id: &str) -> Result<Option<SecretAcl>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACL_DATA)?;

        if let Some(value) = table.get(acl_id)? {
            Ok(Some(serde_json::from_slice(value.value())?))
        } else {
            Ok(None)
        }
    }

    /// Get the record for a (secret, operation) pair, if any
    pub fn get_by_operation(
        &self,
        secret_id: &str,
        operation: Operation,
    ) -> Result<Option<SecretAcl>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ACL_INDEX)?;

        let key = Self::index_key(secret_id, operation);
        let Some(acl_id) = index.get(key.as_str())? else {
            return Ok(None);
        };

        let data = read_txn.open_table(ACL_DATA)?;
        if let Some(value) = data.get(acl_id.value())? {
            Ok(Some(serde_json::from_slice(value.value())?))
        } else {
            Ok(None)
        }
    }

    /// List a secret's records, ordered by operation
    pub fn list_for_secret(&self, secret_id: &str) -> Result<Vec<SecretAcl>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ACL_INDEX)?;
        let data = read_txn.open_table(ACL_DATA)?;

        let prefix = format!("{secret_id}:");

        let mut acls = Vec::new();
        for item in index.range(prefix.as_str()..)? {
            let (key, value) = item?;
            let key_str = key.value();
            if !key_str.starts_with(&prefix) {
                break;
            }
            if key_str[prefix.len()..].parse::<Operation>().is_err() {
                continue;
            }
            if let Some(bytes) = data.get(value.value())? {
                acls.push(serde_json::from_slice(bytes.value())?);
            }
        }

        Ok(acls)
    }

    /// Count a secret's records
    pub fn count_for_secret(&self, secret_id: &str) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ACL_INDEX)?;

        let prefix = format!("{secret_id}:");

        let mut count = 0;
        for item in index.range(prefix.as_str()..)? {
            let (key, _) = item?;
            let key_str = key.value();
            if !key_str.starts_with(&prefix) {
                break;
            }
            if key_str[prefix.len()..].parse::<Operation>().is_ok() {
                count += 1;
            }
        }

        Ok(count)
    }

    /// Persist a record, creating it if absent.
    ///
    /// When `user_ids` is `Some` the stored grant set is fully replaced;
    /// `None` leaves it untouched. The record's update timestamp is
    /// bumped and the caller's copy reflects the persisted state.
    pub fn upsert_grants(&self, acl: &mut SecretAcl, user_ids: Option<&[String]>) -> Result<()> {
        if let Some(ids) = user_ids {
            acl.replace_users(ids.iter().cloned());
        }
        acl.touch();

        let serialized = serde_json::to_vec(acl)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut data_table = write_txn.open_table(ACL_DATA)?;
            data_table.insert(acl.id.as_str(), serialized.as_slice())?;
            drop(data_table);

            let mut index_table = write_txn.open_table(ACL_INDEX)?;
            let key = Self::index_key(&acl.secret_id, acl.operation);
            index_table.insert(key.as_str(), acl.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete a record by id, returning whether it existed
    pub fn delete(&self, acl_id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut data_table = write_txn.open_table(ACL_DATA)?;
            let removed = match data_table.remove(acl_id)? {
                Some(old) => Some(serde_json::from_slice::<SecretAcl>(old.value())?),
                None => None,
            };
            drop(data_table);

            if let Some(acl) = &removed {
                let mut index_table = write_txn.open_table(ACL_INDEX)?;
                let key = Self::index_key(&acl.secret_id, acl.operation);
                index_table.remove(key.as_str())?;
            }
            removed.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    /// Delete every record of a secret, returning how many existed
    pub fn delete_all_for(&self, secret_id: &str) -> Result<usize> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut index_table = write_txn.open_table(ACL_INDEX)?;

            let prefix = format!("{secret_id}:");
            let entries: Vec<(String, String)> = {
                let mut collected = Vec::new();
                for item in index_table.range(prefix.as_str()..)? {
                    let (key, value) = item?;
                    let key_str = key.value();
                    if !key_str.starts_with(&prefix) {
                        break;
                    }
                    if key_str[prefix.len()..].parse::<Operation>().is_err() {
                        continue;
                    }
                    collected.push((key_str.to_string(), value.value().to_string()));
                }
                collected
            };

            for (key, _) in &entries {
                index_table.remove(key.as_str())?;
            }
            drop(index_table);

            let mut data_table = write_txn.open_table(ACL_DATA)?;
            for (_, acl_id) in &entries {
                data_table.remove(acl_id.as_str())?;
            }

            entries.len()
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
