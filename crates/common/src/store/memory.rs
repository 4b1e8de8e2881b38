use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::{ObjectId, ObjectStore, StoreError};

/// Default per-object size limit, the shape of a messaging channel's
/// attachment cap.
pub const DEFAULT_MAX_OBJECT_SIZE: usize = 1 << 23;

/// Channel-shaped in-memory medium.
///
/// Assigns monotonically increasing object IDs and enforces the per-object
/// size limit, which is all the engine ever assumes about the real medium.
/// Used by tests and available for throwaway local filesystems.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
    max_object_size: usize,
}

struct MemoryStoreInner {
    objects: BTreeMap<ObjectId, Bytes>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new(max_object_size: usize) -> Self {
        MemoryStore {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                objects: BTreeMap::new(),
                // channel message IDs start well above zero; zero stays free
                // as an easy-to-spot sentinel in logs
                next_id: 1,
            })),
            max_object_size,
        }
    }

    /// Number of objects currently held. Test observability only.
    pub fn object_count(&self) -> usize {
        self.inner.lock().objects.len()
    }

    fn check_size(&self, len: usize) -> Result<(), StoreError> {
        if len > self.max_object_size {
            return Err(StoreError::SizeLimit {
                len,
                max: self.max_object_size,
            });
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OBJECT_SIZE)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, bytes: Bytes) -> Result<ObjectId, StoreError> {
        self.check_size(bytes.len())?;
        let mut inner = self.inner.lock();
        let id = ObjectId::new(inner.next_id);
        inner.next_id += 1;
        inner.objects.insert(id, bytes);
        Ok(id)
    }

    async fn get(&self, id: ObjectId) -> Result<Bytes, StoreError> {
        self.inner
            .lock()
            .objects
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: ObjectId) -> Result<(), StoreError> {
        self.inner.lock().objects.remove(&id);
        Ok(())
    }

    async fn edit(&self, id: ObjectId, bytes: Bytes) -> Result<(), StoreError> {
        self.check_size(bytes.len())?;
        let mut inner = self.inner.lock();
        match inner.objects.get_mut(&id) {
            Some(slot) => {
                *slot = bytes;
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn max_object_size(&self) -> usize {
        self.max_object_size
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryStore::new(64);
        let id = store.put(Bytes::from_static(b"payload")).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Bytes::from_static(b"payload"));
    }

    #[tokio::test]
    async fn test_ids_are_increasing() {
        let store = MemoryStore::new(64);
        let a = store.put(Bytes::from_static(b"a")).await.unwrap();
        let b = store.put(Bytes::from_static(b"b")).await.unwrap();
        assert!(b.get() > a.get());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new(64);
        let id = store.put(Bytes::from_static(b"x")).await.unwrap();
        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(matches!(
            store.get(id).await,
            Err(StoreError::NotFound(got)) if got == id
        ));
    }

    #[tokio::test]
    async fn test_size_limit_enforced() {
        let store = MemoryStore::new(4);
        assert!(matches!(
            store.put(Bytes::from_static(b"too large")).await,
            Err(StoreError::SizeLimit { len: 9, max: 4 })
        ));
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn test_edit_in_place() {
        let store = MemoryStore::new(64);
        let id = store.put(Bytes::from_static(b"before")).await.unwrap();
        store.edit(id, Bytes::from_static(b"after")).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Bytes::from_static(b"after"));

        assert!(matches!(
            store.edit(ObjectId::new(999), Bytes::new()).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
