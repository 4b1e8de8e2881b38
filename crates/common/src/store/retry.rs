use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectId, ObjectStore, StoreError};

/// Bounded exponential backoff for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per attempt after that.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(250),
        }
    }
}

/// Decorator adding the retry policy around every call to a medium.
///
/// Only [`StoreError::Unavailable`] is retried: network hiccups and
/// transport-level rate limiting. Everything else (missing objects, size
/// violations, integrity failures upstream) is permanent and surfaces
/// immediately. Exhausted retries surface the last `Unavailable` unchanged.
#[derive(Clone)]
pub struct RetryStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> RetryStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        RetryStore { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn run<T, F, Fut>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 1;
        loop {
            match f().await {
                Err(StoreError::Unavailable(reason)) if attempt < self.policy.max_attempts => {
                    let delay = self.policy.base_delay * 2u32.pow(attempt - 1);
                    tracing::warn!(
                        "{} attempt {}/{} failed ({}), retrying in {:?}",
                        op,
                        attempt,
                        self.policy.max_attempts,
                        reason,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[async_trait]
impl<S: ObjectStore> ObjectStore for RetryStore<S> {
    async fn put(&self, bytes: Bytes) -> Result<ObjectId, StoreError> {
        self.run("put", || self.inner.put(bytes.clone())).await
    }

    async fn get(&self, id: ObjectId) -> Result<Bytes, StoreError> {
        self.run("get", || self.inner.get(id)).await
    }

    async fn delete(&self, id: ObjectId) -> Result<(), StoreError> {
        self.run("delete", || self.inner.delete(id)).await
    }

    async fn edit(&self, id: ObjectId, bytes: Bytes) -> Result<(), StoreError> {
        self.run("edit", || self.inner.edit(id, bytes.clone())).await
    }

    fn max_object_size(&self) -> usize {
        self.inner.max_object_size()
    }
}
