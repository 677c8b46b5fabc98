//! The ACL resolution engine.
//!
//! Given a secret, its existing records and a per-operation payload, the
//! engine computes the create/update plan and enforces the two load-bearing
//! invariants: ACLs for a secret are created exactly once (updates must use
//! the update path), and an existing record's operation is immutable.

use crate::error::{AclError, Result};
use crate::store::AclStore;
use secretacl_models::{AclPayload, Operation, SecretAcl};
use std::collections::HashMap;
use tracing::debug;

/// Attach the triggering operation to a store failure so a bulk caller
/// can tell which write failed. Earlier per-operation writes stay
/// committed; there is no cross-record transaction.
fn with_operation(err: AclError, operation: Operation) -> AclError {
    match err {
        AclError::Store(e) => {
            AclError::Store(e.context(format!("while applying the {operation} ACL")))
        }
        other => other,
    }
}

/// Stateless resolution engine over an [`AclStore`].
///
/// One external request maps to one engine call; all state lives in the
/// store. Writes within a bulk payload are independent, but each record's
/// upsert is atomic per the store contract.
pub struct AclEngine<S: AclStore> {
    store: S,
}

impl<S: AclStore> AclEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a secret's ACLs from scratch.
    ///
    /// Strictly single-shot: fails with `AlreadyExists` when the secret
    /// already has any record. An absent creator-only flag defaults to
    /// false on this path. A payload that yields no records (empty map)
    /// fails with `SecretAclsNotFound`, like any other empty result set.
    pub fn create_acls(&self, secret_id: &str, payload: &AclPayload) -> Result<Vec<SecretAcl>> {
        let count = self.store.count_for_secret(secret_id)?;
        debug!(secret_id, count, "creating ACLs");
        if count > 0 {
            return Err(AclError::AlreadyExists(secret_id.to_string()));
        }

        for (operation, entry) in payload.iter() {
            let creator_only = Some(entry.creator_only.unwrap_or(false));
            let mut acl = SecretAcl::new(secret_id, operation, creator_only);
            self.store
                .upsert_grants(&mut acl, entry.users.as_deref())
                .map_err(|e| with_operation(e, operation))?;
        }

        self.get_acls_for_secret(secret_id)
    }

    /// Update a secret's ACLs in bulk.
    ///
    /// Requires at least one existing record. Existing records mutate in
    /// place: the creator-only flag changes only when the entry carries
    /// it, and the grant set is replaced only when the entry carries one.
    /// Operations with no record yet are created, taking the flag
    /// verbatim from the entry (absent stays unset).
    pub fn update_acls(&self, secret_id: &str, payload: &AclPayload) -> Result<Vec<SecretAcl>> {
        let count = self.store.count_for_secret(secret_id)?;
        debug!(secret_id, count, "updating ACLs");
        if count == 0 {
            return Err(AclError::SecretAclsNotFound(secret_id.to_string()));
        }

        let mut existing: HashMap<Operation, SecretAcl> = self
            .store
            .list_for_secret(secret_id)?
            .into_iter()
            .map(|acl| (acl.operation, acl))
            .collect();

        for (operation, entry) in payload.iter() {
            let mut acl = match existing.remove(&operation) {
                Some(mut acl) => {
                    if let Some(creator_only) = entry.creator_only {
                        acl.creator_only = Some(creator_only);
                    }
                    acl
                }
                None => SecretAcl::new(secret_id, operation, entry.creator_only),
            };
            self.store
                .upsert_grants(&mut acl, entry.users.as_deref())
                .map_err(|e| with_operation(e, operation))?;
        }

        self.get_acls_for_secret(secret_id)
    }

    /// Update one record by its id.
    ///
    /// The payload must carry an entry under the record's own operation;
    /// anything else is an attempt to redirect the operation, which is
    /// never allowed.
    pub fn update_acl_by_id(&self, acl_id: &str, payload: &AclPayload) -> Result<SecretAcl> {
        let mut acl = self
            .store
            .get(acl_id)?
            .ok_or_else(|| AclError::AclNotFound(acl_id.to_string()))?;
        debug!(acl_id, operation = %acl.operation, "updating ACL by id");

        let Some(entry) = payload.get(acl.operation) else {
            return Err(AclError::OperationMismatch {
                acl_id: acl_id.to_string(),
                operation: acl.operation,
            });
        };

        if let Some(creator_only) = entry.creator_only {
            acl.creator_only = Some(creator_only);
        }
        self.store.upsert_grants(&mut acl, entry.users.as_deref())?;
        Ok(acl)
    }

    pub fn delete_acl_by_id(&self, acl_id: &str) -> Result<()> {
        debug!(acl_id, "deleting ACL");
        if !self.store.delete_by_id(acl_id)? {
            return Err(AclError::AclNotFound(acl_id.to_string()));
        }
        Ok(())
    }

    pub fn delete_acls_for_secret(&self, secret_id: &str) -> Result<()> {
        debug!(secret_id, "deleting all ACLs");
        if self.store.count_for_secret(secret_id)? == 0 {
            return Err(AclError::SecretAclsNotFound(secret_id.to_string()));
        }
        self.store.delete_all_for_secret(secret_id)?;
        Ok(())
    }

    pub fn get_acl_by_id(&self, acl_id: &str) -> Result<SecretAcl> {
        self.store
            .get(acl_id)?
            .ok_or_else(|| AclError::AclNotFound(acl_id.to_string()))
    }

    /// A secret's full record list, ordered by operation.
    pub fn get_acls_for_secret(&self, secret_id: &str) -> Result<Vec<SecretAcl>> {
        let acls = self.store.list_for_secret(secret_id)?;
        if acls.is_empty() {
            return Err(AclError::SecretAclsNotFound(secret_id.to_string()));
        }
        Ok(acls)
    }
}
