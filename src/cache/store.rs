//! Cache Store Module
//!
//! The instrumented cache: stores values under fresh keys and reads them back,
//! with every `store` call counted and its history recorded.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::Store;
use crate::cache::value::{decode_float, decode_int, decode_text, Value};
use crate::error::Result;
use crate::recorder::{calls_key, CallHistory, CountCalls, Operation, OperationExt};

// == Store Value Operation ==
/// Writes a value under a freshly generated key.
pub struct StoreValue {
    backend: Arc<dyn Store>,
}

impl StoreValue {
    /// Creates the operation over `backend`.
    pub fn new(backend: Arc<dyn Store>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Operation for StoreValue {
    type Input = (Value,);
    type Output = String;

    fn name(&self) -> &str {
        Cache::STORE_OPERATION
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let (value,) = input;
        let key = Uuid::new_v4().to_string();
        self.backend.set(&key, value.to_bytes()).await?;
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(key)
    }
}

// == Cache ==
/// Key-value cache over a [`Store`] backend.
///
/// `store` is counted under `"Cache.store_calls"` and logged under
/// `"Cache.store:inputs"` / `"Cache.store:outputs"`.
pub struct Cache {
    /// Backend handle, held for the cache's lifetime
    backend: Arc<dyn Store>,
    /// `store` with counting outermost, history inside
    store_op: CountCalls<CallHistory<StoreValue>>,
}

impl Cache {
    /// Operation identity of [`Cache::store`].
    pub const STORE_OPERATION: &'static str = "Cache.store";

    // == Constructor ==
    /// Creates a cache over `backend`, flushing all prior backend state.
    pub async fn new(backend: Arc<dyn Store>) -> Result<Self> {
        backend.flush_all().await?;
        info!("Cache initialized, backend flushed");

        let store_op = StoreValue::new(backend.clone())
            .call_history(backend.clone())
            .count_calls(backend.clone());

        Ok(Self { backend, store_op })
    }

    // == Store ==
    /// Stores `value` under a new random key and returns the key.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        self.store_op.call((value.into(),)).await
    }

    // == Retrieve ==
    /// Fetches the value under `key` and decodes it with `decode`.
    ///
    /// Returns `Ok(None)` when the key is absent. Decode failures are returned
    /// to the caller untouched.
    pub async fn retrieve<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        match self.backend.get(key).await? {
            Some(raw) => decode(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Fetches the raw bytes under `key`.
    pub async fn retrieve_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Fetches the value under `key` as UTF-8 text.
    pub async fn retrieve_str(&self, key: &str) -> Result<Option<String>> {
        self.retrieve(key, decode_text).await
    }

    /// Fetches the value under `key` as an integer.
    pub async fn retrieve_int(&self, key: &str) -> Result<Option<i64>> {
        self.retrieve(key, decode_int).await
    }

    /// Fetches the value under `key` as a float.
    pub async fn retrieve_float(&self, key: &str) -> Result<Option<f64>> {
        self.retrieve(key, decode_float).await
    }

    // == Call Count ==
    /// Returns how many times `operation` has been invoked.
    pub async fn call_count(&self, operation: &str) -> Result<i64> {
        self.backend.get_count(&calls_key(operation)).await
    }

    // == Backend ==
    /// Returns the shared backend handle, e.g. for replay.
    pub fn backend(&self) -> Arc<dyn Store> {
        self.backend.clone()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::error::CacheError;
    use crate::recorder::{load_trace, outputs_key};
    use std::collections::HashSet;

    async fn new_cache() -> Cache {
        Cache::new(Arc::new(MemoryStore::new())).await.unwrap()
    }

    #[tokio::test]
    async fn test_new_flushes_backend() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("stale", b"old".to_vec()).await.unwrap();

        let cache = Cache::new(backend.clone()).await.unwrap();

        assert!(backend.is_empty().await);
        assert_eq!(cache.retrieve_raw("stale").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_and_retrieve_each_type() {
        let cache = new_cache().await;

        let text = cache.store("hello").await.unwrap();
        let bytes = cache.store(vec![1u8, 2, 3]).await.unwrap();
        let int = cache.store(42).await.unwrap();
        let float = cache.store(2.5).await.unwrap();

        assert_eq!(cache.retrieve_str(&text).await.unwrap().as_deref(), Some("hello"));
        assert_eq!(cache.retrieve_raw(&bytes).await.unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(cache.retrieve_int(&int).await.unwrap(), Some(42));
        assert_eq!(cache.retrieve_float(&float).await.unwrap(), Some(2.5));
    }

    #[tokio::test]
    async fn test_retrieve_with_custom_decoder() {
        let cache = new_cache().await;
        let key = cache.store("abc").await.unwrap();

        let len = cache.retrieve(&key, |raw| Ok(raw.len())).await.unwrap();
        assert_eq!(len, Some(3));
    }

    #[tokio::test]
    async fn test_retrieve_absent_key() {
        let cache = new_cache().await;

        assert_eq!(cache.retrieve_raw("missing").await.unwrap(), None);
        assert_eq!(cache.retrieve_str("missing").await.unwrap(), None);
        assert_eq!(cache.retrieve_int("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_retrieve_int_decode_failure() {
        let cache = new_cache().await;
        let forty_two = cache.store("42").await.unwrap();
        let foo = cache.store("foo").await.unwrap();

        assert_eq!(cache.retrieve_int(&forty_two).await.unwrap(), Some(42));
        assert!(matches!(
            cache.retrieve_int(&foo).await,
            Err(CacheError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_keys_are_unique() {
        let cache = new_cache().await;
        let mut keys = HashSet::new();

        for i in 0..200 {
            assert!(keys.insert(cache.store(i).await.unwrap()));
        }
    }

    #[tokio::test]
    async fn test_store_is_counted_and_recorded() {
        let cache = new_cache().await;

        let k1 = cache.store("foo").await.unwrap();
        let k2 = cache.store("bar").await.unwrap();
        let k3 = cache.store(42).await.unwrap();

        assert_eq!(cache.call_count(Cache::STORE_OPERATION).await.unwrap(), 3);

        let backend = cache.backend();
        let outputs = backend
            .lrange(&outputs_key(Cache::STORE_OPERATION), 0, -1)
            .await
            .unwrap();
        assert_eq!(
            outputs,
            vec![k1.clone().into_bytes(), k2.clone().into_bytes(), k3.clone().into_bytes()]
        );

        let trace = load_trace(backend.as_ref(), Cache::STORE_OPERATION)
            .await
            .unwrap();
        assert_eq!(
            trace.lines(),
            vec![
                format!(r#"Cache.store("foo") -> {}"#, k1),
                format!(r#"Cache.store("bar") -> {}"#, k2),
                format!("Cache.store(42) -> {}", k3),
            ]
        );
    }

    #[tokio::test]
    async fn test_retrieve_is_not_counted() {
        let cache = new_cache().await;
        let key = cache.store("x").await.unwrap();

        cache.retrieve_str(&key).await.unwrap();
        cache.retrieve_raw(&key).await.unwrap();

        assert_eq!(cache.call_count(Cache::STORE_OPERATION).await.unwrap(), 1);
    }
}
