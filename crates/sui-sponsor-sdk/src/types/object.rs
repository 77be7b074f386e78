//! Object references and ownership.

use crate::types::{ObjectDigest, ObjectId, SuiAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pointer to a specific version of an on-chain object.
///
/// Encodes as `(id, version, digest)` in declared order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    /// The object id
    pub object_id: ObjectId,
    /// The object's sequence number
    pub version: u64,
    /// Digest of the object's contents at `version`
    pub digest: ObjectDigest,
}

impl ObjectRef {
    /// Creates a new object reference.
    pub fn new(object_id: ObjectId, version: u64, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}#{}", self.object_id, self.version, self.digest)
    }
}

/// Who may use an object in a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectOwner {
    /// Owned by a single address
    Address(SuiAddress),
    /// Owned by another object
    Object(ObjectId),
    /// Shared, usable by anyone through consensus
    Shared {
        /// Version at which the object became shared
        initial_shared_version: u64,
    },
    /// Frozen, readable by anyone
    Immutable,
}

impl ObjectOwner {
    /// Returns true for shared objects.
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared { .. })
    }
}

/// An object's current reference together with its ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedObject {
    /// Current reference
    pub object_ref: ObjectRef,
    /// Current owner
    pub owner: ObjectOwner,
}

/// A fee-currency coin owned by an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coin {
    /// Current reference to the coin object
    pub object_ref: ObjectRef,
    /// Balance in the coin's smallest unit
    pub balance: u64,
}
