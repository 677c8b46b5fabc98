//! Service front composing the guards with the engine.
//!
//! This is the seam a transport layer mounts: every method checks the
//! access gate, resolves the secret for resource-keyed calls, then
//! delegates to the engine. Rendering results (hrefs, response bodies)
//! stays on the transport side.

use crate::engine::AclEngine;
use crate::error::{AclError, Result};
use crate::guard::{AccessGate, AclAction, RequestContext, SecretLookup, SecretRef};
use crate::store::AclStore;
use secretacl_models::{AclPayload, SecretAcl};
use std::sync::Arc;
use tracing::debug;

/// Parse a decoded JSON body into an [`AclPayload`].
///
/// This is the transport-side validation step: unknown operation keys
/// and malformed entries are rejected here, so the engine only ever
/// sees structurally valid payloads.
pub fn parse_payload(body: &serde_json::Value) -> Result<AclPayload> {
    AclPayload::from_value(body).map_err(|e| AclError::Validation(e.to_string()))
}

pub struct AclService<S: AclStore> {
    engine: AclEngine<S>,
    gate: Arc<dyn AccessGate>,
    lookup: Arc<dyn SecretLookup>,
}

impl<S: AclStore> AclService<S> {
    pub fn new(store: S, gate: Arc<dyn AccessGate>, lookup: Arc<dyn SecretLookup>) -> Self {
        Self {
            engine: AclEngine::new(store),
            gate,
            lookup,
        }
    }

    pub fn engine(&self) -> &AclEngine<S> {
        &self.engine
    }

    fn authorize(&self, action: AclAction, ctx: &RequestContext) -> Result<()> {
        let decision = self.gate.check(action, ctx)?;
        if !decision.allowed {
            let reason = decision
                .reason
                .unwrap_or_else(|| "denied by policy".to_string());
            debug!(action = action.as_str(), %reason, "access denied");
            return Err(AclError::AccessDenied {
                action: action.as_str().to_string(),
                reason,
            });
        }
        Ok(())
    }

    fn resolve_secret(&self, secret_id: &str) -> Result<SecretRef> {
        self.lookup
            .resolve(secret_id)?
            .ok_or_else(|| AclError::SecretNotFound(secret_id.to_string()))
    }

    pub fn create_acls(
        &self,
        ctx: &RequestContext,
        secret_id: &str,
        payload: &AclPayload,
    ) -> Result<Vec<SecretAcl>> {
        self.authorize(AclAction::CreateAcls, ctx)?;
        let secret = self.resolve_secret(secret_id)?;
        self.engine.create_acls(&secret.secret_id, payload)
    }

    pub fn update_acls(
        &self,
        ctx: &RequestContext,
        secret_id: &str,
        payload: &AclPayload,
    ) -> Result<Vec<SecretAcl>> {
        self.authorize(AclAction::UpdateAcls, ctx)?;
        let secret = self.resolve_secret(secret_id)?;
        self.engine.update_acls(&secret.secret_id, payload)
    }

    pub fn update_acl_by_id(
        &self,
        ctx: &RequestContext,
        acl_id: &str,
        payload: &AclPayload,
    ) -> Result<SecretAcl> {
        self.authorize(AclAction::UpdateAcl, ctx)?;
        self.engine.update_acl_by_id(acl_id, payload)
    }

    pub fn delete_acl_by_id(&self, ctx: &RequestContext, acl_id: &str) -> Result<()> {
        self.authorize(AclAction::DeleteAcl, ctx)?;
        self.engine.delete_acl_by_id(acl_id)
    }

    pub fn delete_acls_for_secret(&self, ctx: &RequestContext, secret_id: &str) -> Result<()> {
        self.authorize(AclAction::DeleteAcls, ctx)?;
        let secret = self.resolve_secret(secret_id)?;
        self.engine.delete_acls_for_secret(&secret.secret_id)
    }

    pub fn get_acl_by_id(&self, ctx: &RequestContext, acl_id: &str) -> Result<SecretAcl> {
        self.authorize(AclAction::GetAcl, ctx)?;
        self.engine.get_acl_by_id(acl_id)
    }

    pub fn get_acls_for_secret(
        &self,
        ctx: &RequestContext,
        secret_id: &str,
    ) -> Result<Vec<SecretAcl>> {
        self.authorize(AclAction::GetAcls, ctx)?;
        let secret = self.resolve_secret(secret_id)?;
        self.engine.get_acls_for_secret(&secret.secret_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{AccessDecision, AllowAll, TrustingLookup};
    use crate::store::MemoryAclStore;
    use secretacl_models::{AclEntry, Operation};
    use serde_json::json;

    struct DenyWrites;

    impl AccessGate for DenyWrites {
        fn check(&self, action: AclAction, _ctx: &RequestContext) -> Result<AccessDecision> {
            match action {
                AclAction::GetAcl | AclAction::GetAcls => Ok(AccessDecision::allowed()),
                _ => Ok(AccessDecision::denied("read-only credentials")),
            }
        }
    }

    struct NoSecrets;

    impl SecretLookup for NoSecrets {
        fn resolve(&self, _secret_id: &str) -> Result<Option<SecretRef>> {
            Ok(None)
        }
    }

    fn open_service() -> AclService<MemoryAclStore> {
        AclService::new(
            MemoryAclStore::new(),
            Arc::new(AllowAll),
            Arc::new(TrustingLookup),
        )
    }

    fn read_payload() -> AclPayload {
        [(Operation::Read, AclEntry::with_users(["u1"]))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_parse_payload_rejects_unknown_operation() {
        let err = parse_payload(&json!({ "admin": { "users": [] } })).unwrap_err();
        assert!(matches!(err, AclError::Validation(_)));
    }

    #[test]
    fn test_parse_payload_wire_shape() {
        let payload = parse_payload(&json!({
            "write": { "users": ["u1"], "creator-only": true }
        }))
        .unwrap();
        assert_eq!(
            payload.get(Operation::Write).unwrap().creator_only,
            Some(true)
        );
    }

    #[test]
    fn test_gate_denial_short_circuits() {
        let service = AclService::new(
            MemoryAclStore::new(),
            Arc::new(DenyWrites),
            Arc::new(TrustingLookup),
        );
        let ctx = RequestContext::for_user("u1");

        let err = service
            .create_acls(&ctx, "secret-001", &read_payload())
            .unwrap_err();
        assert!(matches!(err, AclError::AccessDenied { .. }));

        // Denied before the engine ran: nothing was written.
        assert!(service.engine().store().is_empty());
    }

    #[test]
    fn test_unknown_secret_is_rejected_before_the_engine() {
        let service = AclService::new(
            MemoryAclStore::new(),
            Arc::new(AllowAll),
            Arc::new(NoSecrets),
        );
        let ctx = RequestContext::for_user("u1");

        let err = service
            .create_acls(&ctx, "secret-001", &read_payload())
            .unwrap_err();
        assert!(matches!(err, AclError::SecretNotFound(_)));
    }

    #[test]
    fn test_full_flow_through_the_service() {
        let service = open_service();
        let ctx = RequestContext::for_user("u1");

        let acls = service
            .create_acls(&ctx, "secret-001", &read_payload())
            .unwrap();
        assert_eq!(acls.len(), 1);

        let fetched = service.get_acl_by_id(&ctx, &acls[0].id).unwrap();
        assert_eq!(fetched.id, acls[0].id);

        service.delete_acls_for_secret(&ctx, "secret-001").unwrap();
        let err = service
            .get_acls_for_secret(&ctx, "secret-001")
            .unwrap_err();
        assert!(matches!(err, AclError::SecretAclsNotFound(_)));
    }
}
