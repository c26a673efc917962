use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// The key-value persistence collaborator behind each side store.
///
/// Assumed durable and crash-consistent per single `put`/`delete`; no
/// multi-key transactions, which is why the cascade over a prefix is not
/// atomic across keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<(String, Value)>>;

    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn put(&self, key: &str, value: Value) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and lightweight use
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_all(&self) -> Result<Vec<(String, Value)>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Store wrapper that fails every write after `fail_after` successful ones.
/// Used to exercise the no-rollback cascade contract.
pub struct FlakyStore {
    inner: MemoryStore,
    remaining: Mutex<usize>,
}

impl FlakyStore {
    pub fn failing_after(writes: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            remaining: Mutex::new(writes),
        }
    }

    async fn consume(&self) -> Result<()> {
        let mut remaining = self.remaining.lock().await;
        if *remaining == 0 {
            return Err(Error::store("flaky", "injected write failure"));
        }
        *remaining -= 1;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get_all(&self) -> Result<Vec<(String, Value)>> {
        self.inner.get_all().await
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> Result<()> {
        self.consume().await?;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.consume().await?;
        self.inner.delete(key).await
    }
}
