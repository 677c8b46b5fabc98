//! Pre-condition seams: authorization gate and secret lookup.
//!
//! Both are injected collaborators. The service front consults them
//! before the engine runs; a gate denial means the store is never
//! touched.

use crate::error::Result;

/// The exposed ACL operations, named with their RBAC action strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclAction {
    CreateAcls,
    UpdateAcls,
    DeleteAcls,
    GetAcls,
    GetAcl,
    UpdateAcl,
    DeleteAcl,
}

impl AclAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AclAction::CreateAcls => "secret_acls:post",
            AclAction::UpdateAcls => "secret_acls:patch",
            AclAction::DeleteAcls => "secret_acls:delete",
            AclAction::GetAcls => "secret_acls:get",
            AclAction::GetAcl => "secret_acl:get",
            AclAction::UpdateAcl => "secret_acl:patch",
            AclAction::DeleteAcl => "secret_acl:delete",
        }
    }
}

/// Caller identity as established by the transport layer.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_id: Option<String>,
    pub project_id: Option<String>,
}

impl RequestContext {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            project_id: None,
        }
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl AccessDecision {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Authorization gate consulted before every engine call.
pub trait AccessGate: Send + Sync {
    fn check(&self, action: AclAction, ctx: &RequestContext) -> Result<AccessDecision>;
}

/// Gate that admits everything. Useful for embedded deployments and
/// tests; a real deployment supplies its policy engine behind
/// [`AccessGate`].
pub struct AllowAll;

impl AccessGate for AllowAll {
    fn check(&self, _action: AclAction, _ctx: &RequestContext) -> Result<AccessDecision> {
        Ok(AccessDecision::allowed())
    }
}

/// A resolved secret: identity plus ownership, as returned by the
/// secret catalog this subsystem hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub secret_id: String,
    pub project_id: String,
    pub creator_id: Option<String>,
}

/// Resolves a secret id to its owning project before any resource-keyed
/// ACL operation runs.
pub trait SecretLookup: Send + Sync {
    fn resolve(&self, secret_id: &str) -> Result<Option<SecretRef>>;
}

/// Lookup that accepts any secret id, for deployments where existence
/// is already guaranteed upstream.
pub struct TrustingLookup;

impl SecretLookup for TrustingLookup {
    fn resolve(&self, secret_id: &str) -> Result<Option<SecretRef>> {
        Ok(Some(SecretRef {
            secret_id: secret_id.to_string(),
            project_id: String::new(),
            creator_id: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        assert_eq!(AclAction::CreateAcls.as_str(), "secret_acls:post");
        assert_eq!(AclAction::UpdateAcl.as_str(), "secret_acl:patch");
    }

    #[test]
    fn test_allow_all() {
        let gate = AllowAll;
        let decision = gate
            .check(AclAction::GetAcls, &RequestContext::default())
            .unwrap();
        assert!(decision.allowed);
    }
}
