use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// [`ObjectStore`] that keeps objects in memory, for tests.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<String, StoredObject>,
    put_calls: AtomicUsize,
    fail_writes: bool,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails, to exercise backend error handling.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of write attempts, including failed ones.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes {
            return Err(StorageError::Put {
                key: key.to_string(),
                source: "simulated backend failure".into(),
            });
        }

        self.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_last_write_wins() {
        let store = InMemoryObjectStore::new();
        store.put_object("previews/a.jpg", Bytes::from_static(b"first"), "image/jpeg").await.unwrap();
        store.put_object("previews/a.jpg", Bytes::from_static(b"second"), "image/jpeg").await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.put_calls(), 2);
        assert_eq!(store.get("previews/a.jpg").unwrap().body, Bytes::from_static(b"second"));
    }

    #[test_log::test(tokio::test)]
    async fn test_failing_store_records_attempt() {
        let store = InMemoryObjectStore::failing();
        let result = store.put_object("previews/a.jpg", Bytes::from_static(b"x"), "image/jpeg").await;

        assert!(matches!(result, Err(StorageError::Put { .. })));
        assert_eq!(store.put_calls(), 1);
        assert!(store.is_empty());
    }
}
