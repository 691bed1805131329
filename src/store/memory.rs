use indexmap::IndexMap;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::AdapterResult;
use crate::store::iters::{EntryIter, ValueIter};
use crate::store::StoreProvider;
use std::sync::Arc;

/// Volatile key-value store backend.
///
/// # Purpose
/// `InMemoryStore` wraps a process-local mapping with no I/O. All data is
/// lost when the store is dropped, which is exactly what a development or
/// test deployment of the adapter wants.
///
/// # Characteristics
/// - **Thread-Safe**: the backing map sits behind a read-write lock and the
///   store can be cloned and shared freely
/// - **Deterministic Iteration**: entries come out in insertion order
/// - **Complexity**: O(1) expected time for `get`/`set`/`delete`, O(n) for
///   `values()`/`entries()`
#[derive(Clone)]
pub struct InMemoryStore<T> {
    inner: Arc<InMemoryStoreInner<T>>,
}

impl<T: Clone + Send + Sync> InMemoryStore<T> {
    /// Creates a new empty in-memory store.
    ///
    /// # Arguments
    /// * `name` - The name/identifier for the store
    pub fn new(name: &str) -> Self {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new(name)),
        }
    }
}

impl<T: Clone + Send + Sync> StoreProvider<T> for InMemoryStore<T> {
    fn get(&self, key: &str) -> AdapterResult<Option<T>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: T) -> AdapterResult<()> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> AdapterResult<()> {
        self.inner.delete(key)
    }

    fn values(&self) -> AdapterResult<ValueIter<T>> {
        self.inner.values()
    }

    fn entries(&self) -> AdapterResult<EntryIter<T>> {
        self.inner.entries()
    }

    fn size(&self) -> AdapterResult<u64> {
        self.inner.size()
    }

    fn clear(&self) -> AdapterResult<()> {
        self.inner.clear()
    }

    fn name(&self) -> AdapterResult<String> {
        self.inner.name()
    }
}

struct InMemoryStoreInner<T> {
    backing_map: Atomic<IndexMap<String, T>>,
    name: String,
}

impl<T: Clone + Send + Sync> InMemoryStoreInner<T> {
    fn new(name: &str) -> InMemoryStoreInner<T> {
        InMemoryStoreInner {
            backing_map: atomic(IndexMap::new()),
            name: name.to_string(),
        }
    }

    fn get(&self, key: &str) -> AdapterResult<Option<T>> {
        Ok(self.backing_map.read_with(|map| map.get(key).cloned()))
    }

    fn set(&self, key: &str, value: T) -> AdapterResult<()> {
        self.backing_map.write_with(|map| {
            map.insert(key.to_string(), value);
        });
        Ok(())
    }

    fn delete(&self, key: &str) -> AdapterResult<()> {
        self.backing_map.write_with(|map| {
            // shift_remove keeps the remaining entries in insertion order
            map.shift_remove(key);
        });
        Ok(())
    }

    fn values(&self) -> AdapterResult<ValueIter<T>> {
        let snapshot = self
            .backing_map
            .read_with(|map| map.values().cloned().collect::<Vec<_>>());
        Ok(ValueIter::new(snapshot))
    }

    fn entries(&self) -> AdapterResult<EntryIter<T>> {
        let snapshot = self.backing_map.read_with(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Vec<_>>()
        });
        Ok(EntryIter::new(snapshot))
    }

    fn size(&self) -> AdapterResult<u64> {
        Ok(self.backing_map.read_with(|map| map.len() as u64))
    }

    fn clear(&self) -> AdapterResult<()> {
        self.backing_map.write_with(|map| map.clear());
        Ok(())
    }

    fn name(&self) -> AdapterResult<String> {
        Ok(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn create_test_store() -> Store<String> {
        Store::new(InMemoryStore::new("test_store"))
    }

    #[test]
    fn test_get_absent_key_returns_none() {
        let store = create_test_store();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let store = create_test_store();
        store.set("key1", "value1".to_string()).unwrap();
        assert_eq!(store.get("key1").unwrap(), Some("value1".to_string()));
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let store = create_test_store();
        store.set("key1", "value1".to_string()).unwrap();
        store.set("key1", "value2".to_string()).unwrap();
        assert_eq!(store.get("key1").unwrap(), Some("value2".to_string()));
        assert_eq!(store.size().unwrap(), 1);
    }

    #[test]
    fn test_delete_then_get_returns_none() {
        let store = create_test_store();
        store.set("key1", "value1".to_string()).unwrap();
        store.delete("key1").unwrap();
        assert!(store.get("key1").unwrap().is_none());
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let store = create_test_store();
        assert!(store.delete("missing").is_ok());
    }

    #[test]
    fn test_values_in_insertion_order() {
        let store = create_test_store();
        store.set("b", "2".to_string()).unwrap();
        store.set("a", "1".to_string()).unwrap();
        store.set("c", "3".to_string()).unwrap();

        let values: Vec<_> = store.values().unwrap().collect();
        assert_eq!(values, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_entries_pair_keys_with_values() {
        let store = create_test_store();
        store.set("k1", "v1".to_string()).unwrap();

        let entries: Vec<_> = store.entries().unwrap().collect();
        assert_eq!(entries, vec![("k1".to_string(), "v1".to_string())]);
    }

    #[test]
    fn test_values_are_snapshot_at_call() {
        let store = create_test_store();
        store.set("k1", "v1".to_string()).unwrap();

        let values = store.values().unwrap();
        store.set("k2", "v2".to_string()).unwrap();

        assert_eq!(values.count(), 1);
        assert_eq!(store.values().unwrap().count(), 2);
    }

    #[test]
    fn test_size_and_is_empty() {
        let store = create_test_store();
        assert!(store.is_empty().unwrap());
        store.set("k1", "v1".to_string()).unwrap();
        assert_eq!(store.size().unwrap(), 1);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn test_clear() {
        let store = create_test_store();
        store.set("k1", "v1".to_string()).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_name() {
        let store = create_test_store();
        assert_eq!(store.name().unwrap(), "test_store");
    }

    #[test]
    fn test_delete_preserves_order_of_remaining_entries() {
        let store = create_test_store();
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();
        store.set("c", "3".to_string()).unwrap();
        store.delete("b").unwrap();

        let keys: Vec<_> = store.entries().unwrap().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_shared_across_clones() {
        let store = create_test_store();
        let shared = store.clone();
        shared.set("k1", "v1".to_string()).unwrap();
        assert_eq!(store.get("k1").unwrap(), Some("v1".to_string()));
    }
}
