use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::{ObjectId, ObjectStore, StoreError};

const SEQ_FILE: &str = ".seq";

/// Directory-backed medium: one object per file, named by its decimal ID.
///
/// Lets the CLI run end-to-end without a live channel client while holding
/// to the same contract: medium-assigned IDs, hard object size limit,
/// idempotent delete. Not safe for concurrent writers, which the engine
/// does not support anyway.
#[derive(Clone)]
pub struct FsStore {
    root: PathBuf,
    max_object_size: usize,
}

impl FsStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub async fn open(root: &Path, max_object_size: usize) -> Result<Self, StoreError> {
        tracing::debug!("FsStore::open at {:?}", root);
        fs::create_dir_all(root).await?;
        Ok(FsStore {
            root: root.to_path_buf(),
            max_object_size,
        })
    }

    fn object_path(&self, id: ObjectId) -> PathBuf {
        self.root.join(id.to_string())
    }

    async fn next_id(&self) -> Result<ObjectId, StoreError> {
        let seq_path = self.root.join(SEQ_FILE);
        let next = match fs::read_to_string(&seq_path).await {
            Ok(text) => text
                .trim()
                .parse::<u64>()
                .map_err(|e| StoreError::Default(anyhow::anyhow!("corrupt sequence file: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 1,
            Err(e) => return Err(e.into()),
        };
        fs::write(&seq_path, (next + 1).to_string()).await?;
        Ok(ObjectId::new(next))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn put(&self, bytes: Bytes) -> Result<ObjectId, StoreError> {
        if bytes.len() > self.max_object_size {
            return Err(StoreError::SizeLimit {
                len: bytes.len(),
                max: self.max_object_size,
            });
        }
        let id = self.next_id().await?;
        fs::write(self.object_path(id), &bytes).await?;
        Ok(id)
    }

    async fn get(&self, id: ObjectId) -> Result<Bytes, StoreError> {
        match fs::read(self.object_path(id)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<(), StoreError> {
        match fs::remove_file(self.object_path(id)).await {
            Ok(()) => Ok(()),
            // idempotent per the adapter contract
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn edit(&self, id: ObjectId, bytes: Bytes) -> Result<(), StoreError> {
        if bytes.len() > self.max_object_size {
            return Err(StoreError::SizeLimit {
                len: bytes.len(),
                max: self.max_object_size,
            });
        }
        let path = self.object_path(id);
        if !fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(id));
        }
        fs::write(path, &bytes).await?;
        Ok(())
    }

    fn max_object_size(&self) -> usize {
        self.max_object_size
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_delete() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::open(temp.path(), 64).await.unwrap();

        let id = store.put(Bytes::from_static(b"object data")).await.unwrap();
        assert_eq!(
            store.get(id).await.unwrap(),
            Bytes::from_static(b"object data")
        );

        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ids_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let first = {
            let store = FsStore::open(temp.path(), 64).await.unwrap();
            store.put(Bytes::from_static(b"a")).await.unwrap()
        };
        let store = FsStore::open(temp.path(), 64).await.unwrap();
        let second = store.put(Bytes::from_static(b"b")).await.unwrap();
        assert!(second.get() > first.get());
        assert_eq!(store.get(first).await.unwrap(), Bytes::from_static(b"a"));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::open(temp.path(), 4).await.unwrap();
        assert!(matches!(
            store.put(Bytes::from_static(b"too large")).await,
            Err(StoreError::SizeLimit { .. })
        ));
    }
}
