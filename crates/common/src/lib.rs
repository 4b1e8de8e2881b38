/**
 * Splitting byte streams into size-bounded
 *  blocks and joining them back, the unit of
 *  storage the remote medium accepts.
 */
pub mod chunk;
/**
 * Cryptographic types and operations.
 *  - Shared content key over ChaCha20-Poly1305
 *  - Deterministic per-block nonce derivation
 */
pub mod crypto;
/**
 * The filesystem engine: path resolution, block
 *  fan-out, and the ancestor propagation that
 *  keeps a single root ID authoritative.
 */
pub mod fs;
/**
 * Node model and serialization. Files and
 *  directories as one storable object each,
 *  referencing blocks and children by ID.
 */
pub mod node;
/**
 * Remote object store adapter. The medium is a
 *  key-value blob store with a hard per-object
 *  size limit; memory and directory-backed
 *  implementations live here, along with the
 *  retry decorator for transient failures.
 */
pub mod store;

pub mod prelude {
    pub use crate::crypto::ContentKey;
    pub use crate::fs::{Entry, FsError, FsOptions, RelayFs, TreeSource};
    pub use crate::node::{Node, NodeKind};
    pub use crate::store::{FsStore, MemoryStore, ObjectId, ObjectStore, RetryPolicy, RetryStore};
}
