//! Cryptographic primitives for relayfs
//!
//! This module provides the engine's security model:
//!
//! - **Content Encryption**: ChaCha20-Poly1305 AEAD with a single shared
//!   `ContentKey` loaded from configuration
//! - **Per-block nonces**: derived deterministically from a per-file salt and
//!   the block index, so blocks can be sealed and opened independently and in
//!   any order without ever reusing a nonce under the same key
//!
//! # Security Model
//!
//! Every block of file content and every serialized node is encrypted
//! independently before it reaches the remote medium. The medium only ever
//! sees ciphertext and channel-assigned object IDs; the key never leaves the
//! process. Authentication failure on any block is terminal for the whole
//! read: a file with one bad block is treated as unrecoverable rather than
//! partially trusted.

mod key;

pub use key::{ContentKey, CryptoError, FileSalt, KEY_SIZE, SALT_SIZE, TAG_SIZE};
