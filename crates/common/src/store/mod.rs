//! Remote object store adapter
//!
//! The remote medium (in production a messaging channel, here also a local
//! directory or memory for tests) is modeled as an unreliable, rate-limited
//! key-value blob store with a hard per-object size limit. It assigns the
//! object IDs; the engine never chooses them. This is the only persistent
//! storage the system touches: no local index, no cache.
//!
//! `MemoryStore` and `FsStore` are the built-in media. `RetryStore` wraps
//! any medium with the bounded-backoff policy for transient failures. A
//! concrete channel client plugs in behind the same trait.

mod fs;
mod memory;
mod retry;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use retry::{RetryPolicy, RetryStore};

/// Identifier of one remote object, assigned by the medium at `put` time.
///
/// Shaped like a messaging-channel message ID: an opaque `u64`, rendered as
/// decimal text wherever it crosses a process boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn new(id: u64) -> Self {
        ObjectId(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ObjectId(s.parse()?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("object not found: {0}")]
    NotFound(ObjectId),
    #[error("object of {len} bytes exceeds the medium's object size limit of {max}")]
    SizeLimit { len: usize, max: usize },
    #[error("remote medium unavailable: {0}")]
    Unavailable(String),
    #[error("medium does not support in-place edits")]
    EditUnsupported,
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// The contract every medium implements.
///
/// `put`/`get`/`delete`/`edit` are suspension points: each call may block on
/// the network and fail transiently. Callers see transient failures as
/// [`StoreError::Unavailable`]; everything else is permanent.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Persist one object, returning the ID the medium assigned it.
    ///
    /// Fails with [`StoreError::SizeLimit`] if `bytes` exceeds
    /// [`max_object_size`](ObjectStore::max_object_size); nothing is written
    /// in that case.
    async fn put(&self, bytes: Bytes) -> Result<ObjectId, StoreError>;

    /// Fetch one object. Fails with [`StoreError::NotFound`] if the object
    /// was deleted or never existed.
    async fn get(&self, id: ObjectId) -> Result<Bytes, StoreError>;

    /// Delete one object. Idempotent: deleting an already-deleted ID is not
    /// an error.
    async fn delete(&self, id: ObjectId) -> Result<(), StoreError>;

    /// Replace an existing object's content in place, keeping its ID.
    ///
    /// Optional: media that cannot edit report
    /// [`StoreError::EditUnsupported`], and callers fall back to
    /// `put` + `delete`.
    async fn edit(&self, id: ObjectId, bytes: Bytes) -> Result<(), StoreError> {
        let _ = (id, bytes);
        Err(StoreError::EditUnsupported)
    }

    /// The medium's hard per-object size limit in bytes.
    fn max_object_size(&self) -> usize;
}
