//! The closed set of operations an ACL record can restrict.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when parsing an operation name outside the closed set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown ACL operation: {0}")]
pub struct UnknownOperation(pub String);

/// An operation a secret ACL can restrict.
///
/// The set is closed on purpose: one ACL record exists per
/// (secret, operation) pair, and adding an operation is a schema change,
/// not a runtime value. `Ord` gives the fixed processing order
/// (read before write).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    /// All operations, in the fixed processing order.
    pub const ALL: [Operation; 2] = [Operation::Read, Operation::Write];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Operation::Read),
            "write" => Ok(Operation::Write),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}
