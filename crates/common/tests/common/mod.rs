//! Shared test utilities for filesystem integration tests
#![allow(dead_code)]

use common::crypto::KEY_SIZE;
use common::prelude::*;

pub const MAX_OBJECT_SIZE: usize = 1 << 16;

pub fn test_key() -> ContentKey {
    ContentKey::from_slice(&[7u8; KEY_SIZE]).unwrap()
}

/// Set up an engine over a fresh in-memory medium with an empty root.
pub async fn setup_test_env() -> (RelayFs<MemoryStore>, ObjectId) {
    setup_with_block_size(1024).await
}

/// Same, with a caller-chosen block size.
pub async fn setup_with_block_size(max_block_size: usize) -> (RelayFs<MemoryStore>, ObjectId) {
    let store = MemoryStore::new(MAX_OBJECT_SIZE);
    let fs = RelayFs::new(
        store,
        test_key(),
        FsOptions {
            max_block_size,
            parallelism: 4,
        },
    )
    .unwrap();
    let root = fs.init().await.unwrap();
    (fs, root)
}

/// Names of the entries at `path`, sorted.
pub async fn names(fs: &RelayFs<MemoryStore>, root: ObjectId, path: &str) -> Vec<String> {
    let mut names: Vec<String> = fs
        .ls(root, path)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    names.sort();
    names
}
