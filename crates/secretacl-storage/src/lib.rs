//! SecretACL Storage - redb persistence for ACL records.
//!
//! One ACL record exists per (secret, operation) pair. The layout is a
//! data table keyed by record id plus a `{secret_id}:{operation}` index
//! table, both maintained inside a single write transaction per mutation
//! so a reader never observes a record whose scalar fields and grant set
//! disagree.
//!
//! # Tables
//!
//! - `secret_acls:data` - record id -> JSON record bytes
//! - `secret_acls:index` - `{secret_id}:{operation}` -> record id

pub mod acl;

pub use acl::AclStorage;
