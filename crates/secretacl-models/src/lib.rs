//! SecretACL Models - Shared data model for secret ACLs.
//!
//! A secret carries at most one ACL record per operation. This crate holds
//! the operation enumeration, the stored record type, and the request
//! payload types exchanged with the transport layer. No I/O lives here;
//! persistence is provided by secretacl-storage and orchestration by
//! secretacl-core.

pub mod operation;
pub mod payload;
pub mod record;

pub use operation::{Operation, UnknownOperation};
pub use payload::{AclEntry, AclPayload};
pub use record::SecretAcl;
