//! Block encryption using ChaCha20-Poly1305
//!
//! One symmetric `ContentKey` covers the whole filesystem. Each block is
//! sealed independently under a nonce derived from the owning file's salt and
//! the block's index, so nothing but the salt (stored in the file node) needs
//! to be persisted alongside the ciphertext.

use std::ops::Deref;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};

/// Size of a ChaCha20-Poly1305 key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;
/// Size of the ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the Poly1305 authentication tag in bytes
pub const TAG_SIZE: usize = 16;
/// Size of a per-file nonce salt in bytes
pub const SALT_SIZE: usize = 16;

/// Errors that can occur during sealing/opening of blocks
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key material: expected {KEY_SIZE} bytes, got {0}")]
    InvalidKey(usize),
    #[error("block authentication failed (tampered data or wrong key)")]
    Authentication,
}

/// A 256-bit symmetric key shared by every object in one filesystem.
///
/// The key is part of the process configuration and, together with the root
/// object ID, is the sole credential needed to reconstruct the entire tree.
#[derive(Clone)]
pub struct ContentKey([u8; KEY_SIZE]);

impl ContentKey {
    /// Create a key from exactly `KEY_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKey(data.len()));
        }
        let mut buff = [0; KEY_SIZE];
        buff.copy_from_slice(data);
        Ok(ContentKey(buff))
    }

    /// Parse a key from its 64-character hex form, the shape it takes in
    /// configuration.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(text.trim()).map_err(|_| CryptoError::InvalidKey(0))?;
        Self::from_slice(&bytes)
    }

    /// Seal one block of plaintext.
    ///
    /// Output is `ciphertext || tag`. The nonce is not part of the output;
    /// it is re-derived from `(salt, index)` when the block is opened.
    pub fn seal_block(
        &self,
        plaintext: &[u8],
        salt: &FileSalt,
        index: u64,
    ) -> Result<Vec<u8>, CryptoError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        let nonce = derive_nonce(salt, index);
        cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CryptoError::Authentication)
    }

    /// Open one sealed block, verifying its authentication tag.
    ///
    /// Any tag mismatch (corruption, tampering, or a wrong key) fails with
    /// [`CryptoError::Authentication`]; no partial plaintext is ever
    /// returned.
    pub fn open_block(
        &self,
        sealed: &[u8],
        salt: &FileSalt,
        index: u64,
    ) -> Result<Vec<u8>, CryptoError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        let nonce = derive_nonce(salt, index);
        cipher
            .decrypt(Nonce::from_slice(&nonce), sealed)
            .map_err(|_| CryptoError::Authentication)
    }
}

impl std::fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print key material
        f.write_str("ContentKey(..)")
    }
}

/// Random per-file salt mixed into nonce derivation.
///
/// Two files holding identical content still seal to distinct ciphertext,
/// and block index 0 of one file never shares a nonce with block index 0 of
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileSalt([u8; SALT_SIZE]);

impl FileSalt {
    /// Generate a fresh random salt.
    pub fn generate() -> Self {
        let mut buff = [0; SALT_SIZE];
        getrandom::getrandom(&mut buff).expect("system RNG failure");
        FileSalt(buff)
    }
}

impl Deref for FileSalt {
    type Target = [u8; SALT_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; SALT_SIZE]> for FileSalt {
    fn from(bytes: [u8; SALT_SIZE]) -> Self {
        FileSalt(bytes)
    }
}

// Nonce = first 12 bytes of blake3(salt || index_le). Deterministic per
// (file, index), so out-of-order and parallel block handling is safe.
fn derive_nonce(salt: &FileSalt, index: u64) -> [u8; NONCE_SIZE] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&**salt);
    hasher.update(&index.to_le_bytes());
    let digest = hasher.finalize();
    let mut nonce = [0; NONCE_SIZE];
    nonce.copy_from_slice(&digest.as_bytes()[..NONCE_SIZE]);
    nonce
}
