//! SecretACL Core - ACL resolution for a multi-tenant secret store.
//!
//! A secret carries at most one ACL record per operation (`read`,
//! `write`). Records are created exactly once per secret and updated
//! thereafter; an existing record's operation can never change. This
//! crate provides:
//! - the [`AclStore`] persistence contract with redb-backed and
//!   in-memory implementations
//! - the [`AclEngine`] enforcing the create-once / update-after state
//!   machine
//! - the [`AclError`] taxonomy with its client/server split
//! - injected guard seams ([`AccessGate`], [`SecretLookup`]) and the
//!   [`AclService`] front that composes them
//!
//! Transport concerns (HTTP routing, href rendering, body decoding) are
//! deliberately absent; `service::parse_payload` is where a transport
//! hands over a decoded JSON body.

pub mod engine;
pub mod error;
pub mod guard;
pub mod service;
pub mod storage;
pub mod store;

// ── Top-level re-exports ─────────────────────────────────────────────

pub use engine::AclEngine;
pub use error::{AclError, Result};
pub use guard::{
    AccessDecision, AccessGate, AclAction, AllowAll, RequestContext, SecretLookup, SecretRef,
    TrustingLookup,
};
pub use service::{AclService, parse_payload};
pub use storage::RedbAclStore;
pub use store::{AclStore, MemoryAclStore};

// Model types, re-exported for downstream convenience
pub use secretacl_models::{AclEntry, AclPayload, Operation, SecretAcl, UnknownOperation};
