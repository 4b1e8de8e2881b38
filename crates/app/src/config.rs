use std::path::PathBuf;

use common::crypto::{ContentKey, CryptoError};

pub const KEY_ENV: &str = "RELAYFS_KEY";
pub const STORE_ENV: &str = "RELAYFS_STORE";
pub const TOKEN_ENV: &str = "RELAYFS_TOKEN";
pub const CHANNEL_ENV: &str = "RELAYFS_CHANNEL";
pub const BLOCK_SIZE_ENV: &str = "RELAYFS_BLOCK_SIZE";
pub const OBJECT_SIZE_ENV: &str = "RELAYFS_OBJECT_SIZE";
pub const PARALLELISM_ENV: &str = "RELAYFS_PARALLELISM";

const DEFAULT_BLOCK_SIZE: usize = 1 << 22;
// the shape of a messaging channel's attachment cap
const DEFAULT_OBJECT_SIZE: usize = 1 << 23;
const DEFAULT_PARALLELISM: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
    #[error("invalid content key: {0}")]
    Crypto(#[from] CryptoError),
}

/// Process configuration, resolved once at startup and handed to the engine
/// as opaque values. The engine never reads the environment itself.
#[derive(Debug)]
pub struct Config {
    /// Shared content key, 64 hex characters in `RELAYFS_KEY`.
    pub key: ContentKey,
    /// Directory the built-in store keeps its objects in.
    pub store_path: PathBuf,
    /// Plaintext bytes per content block.
    pub max_block_size: usize,
    /// The medium's hard per-object size limit.
    pub max_object_size: usize,
    /// Concurrent in-flight block transfers per operation.
    pub parallelism: usize,
    /// Transport credential for channel-backed media. Opaque here; the
    /// built-in directory store ignores it.
    pub token: Option<String>,
    /// Channel/container identifier for channel-backed media. Opaque here.
    pub channel: Option<String>,
}

impl Config {
    /// Resolve configuration from the environment, failing fast before any
    /// engine work starts. `store_override` (the `--store` flag) wins over
    /// `RELAYFS_STORE`.
    pub fn from_env(store_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let key_hex = std::env::var(KEY_ENV).map_err(|_| ConfigError::Missing(KEY_ENV))?;
        let key = ContentKey::from_hex(&key_hex)?;

        let store_path = store_override
            .or_else(|| std::env::var(STORE_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(default_store_path);

        Ok(Config {
            key,
            store_path,
            max_block_size: env_usize(BLOCK_SIZE_ENV, DEFAULT_BLOCK_SIZE)?,
            max_object_size: env_usize(OBJECT_SIZE_ENV, DEFAULT_OBJECT_SIZE)?,
            parallelism: env_usize(PARALLELISM_ENV, DEFAULT_PARALLELISM)?,
            token: std::env::var(TOKEN_ENV).ok(),
            channel: std::env::var(CHANNEL_ENV).ok(),
        })
    }
}

fn env_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(text) => text
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, text)),
        Err(_) => Ok(default),
    }
}

fn default_store_path() -> PathBuf {
    match directories::ProjectDirs::from("", "", "relayfs") {
        Some(dirs) => dirs.data_dir().join("store"),
        None => PathBuf::from("relayfs-store"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // one test: the process environment is shared, and parallel tests
    // racing on RELAYFS_KEY would flake
    #[test]
    fn test_from_env() {
        std::env::remove_var(KEY_ENV);
        assert!(matches!(
            Config::from_env(None),
            Err(ConfigError::Missing(KEY_ENV))
        ));

        std::env::set_var(KEY_ENV, "not-a-key");
        assert!(matches!(Config::from_env(None), Err(ConfigError::Crypto(_))));

        std::env::set_var(KEY_ENV, "11".repeat(32));
        let config = Config::from_env(Some(PathBuf::from("/tmp/objects"))).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/objects"));
        assert_eq!(config.max_block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(config.parallelism, DEFAULT_PARALLELISM);
    }
}
