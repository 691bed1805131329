//! The pluggable key-value store abstraction.
//!
//! A store maps string keys to records of one entity type. Two conforming
//! backends exist: [`InMemoryStore`], a volatile process-local mapping, and
//! [`FileStore`], the same mapping as a write-through cache over a JSON file.

mod file;
mod iters;
mod memory;

pub use file::FileStore;
pub use iters::{EntryIter, ValueIter};
pub use memory::InMemoryStore;

use std::ops::Deref;
use std::sync::Arc;

use crate::errors::AdapterResult;

/// Low-level interface for key-value store backends.
///
/// # Purpose
/// Defines the contract every storage backend must implement: a uniform
/// container mapping string keys to values of one record type. The façade
/// composes stores exclusively through this trait, so backends are swappable
/// per entity.
///
/// # Contract
/// - `get` is a pure lookup with no side effect.
/// - `set` is an upsert and overwrites any existing value at that key.
/// - `delete` is a no-op when the key is absent.
/// - `values`/`entries` produce finite, restartable iterators with
///   snapshot-at-call semantics, in deterministic insertion order.
/// - No entity is ever partially written; `set` replaces the full record.
///
/// # Thread Safety
/// Implementers must be `Send + Sync`. The backing map is exclusively owned
/// by the store instance; no external code may mutate it directly.
pub trait StoreProvider<T>: Send + Sync {
    /// Retrieves the value associated with a key.
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists
    /// * `Ok(None)` if the key does not exist
    /// * `Err(AdapterError)` if the operation fails
    fn get(&self, key: &str) -> AdapterResult<Option<T>>;

    /// Inserts or updates a key-value pair.
    ///
    /// If the key already exists, the value is replaced whole.
    ///
    /// # Returns
    /// * `Ok(())` if the operation was successful
    /// * `Err(AdapterError)` if the operation fails (for file-backed stores,
    ///   a failed file rewrite propagates here)
    fn set(&self, key: &str, value: T) -> AdapterResult<()>;

    /// Removes a key-value pair.
    ///
    /// Removing an absent key is not an error.
    ///
    /// # Returns
    /// * `Ok(())` if the operation was successful
    /// * `Err(AdapterError)` if the operation fails
    fn delete(&self, key: &str) -> AdapterResult<()>;

    /// Retrieves an iterator over all current values.
    ///
    /// The iterator is a snapshot taken at call time; mutations made after
    /// the call are not reflected.
    fn values(&self) -> AdapterResult<ValueIter<T>>;

    /// Retrieves an iterator over all current (key, value) entries.
    ///
    /// Same snapshot semantics as `values()`.
    fn entries(&self) -> AdapterResult<EntryIter<T>>;

    /// Returns the number of entries in the store.
    fn size(&self) -> AdapterResult<u64>;

    /// Checks if the store is empty.
    fn is_empty(&self) -> AdapterResult<bool> {
        Ok(self.size()? == 0)
    }

    /// Removes all entries from the store.
    fn clear(&self) -> AdapterResult<()>;

    /// Returns the name of this store.
    fn name(&self) -> AdapterResult<String>;
}

/// A cheaply cloneable handle to a store backend.
///
/// Wraps a concrete [`StoreProvider`] in an `Arc` and dereferences to it, so
/// the same store can be shared across the façade's operations. Cloning only
/// increments the reference count.
pub struct Store<T> {
    inner: Arc<dyn StoreProvider<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Store {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Deref for Store<T> {
    type Target = Arc<dyn StoreProvider<T>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Store<T> {
    /// Creates a new `Store` wrapping a provider implementation.
    pub fn new<P: StoreProvider<T> + 'static>(inner: P) -> Self {
        Store {
            inner: Arc::new(inner),
        }
    }

    /// Convenience traversal over all entries, equivalent to iterating
    /// `entries()` with the value passed before its key.
    pub fn for_each(&self, mut f: impl FnMut(&T, &str)) -> AdapterResult<()> {
        for (key, value) in self.entries()? {
            f(&value, &key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStore;

    impl StoreProvider<String> for MockStore {
        fn get(&self, key: &str) -> AdapterResult<Option<String>> {
            if key == "key1" {
                Ok(Some("value1".to_string()))
            } else {
                Ok(None)
            }
        }

        fn set(&self, _key: &str, _value: String) -> AdapterResult<()> {
            Ok(())
        }

        fn delete(&self, _key: &str) -> AdapterResult<()> {
            Ok(())
        }

        fn values(&self) -> AdapterResult<ValueIter<String>> {
            Ok(ValueIter::new(vec!["value1".to_string()]))
        }

        fn entries(&self) -> AdapterResult<EntryIter<String>> {
            Ok(EntryIter::new(vec![(
                "key1".to_string(),
                "value1".to_string(),
            )]))
        }

        fn size(&self) -> AdapterResult<u64> {
            Ok(1)
        }

        fn clear(&self) -> AdapterResult<()> {
            Ok(())
        }

        fn name(&self) -> AdapterResult<String> {
            Ok("mock".to_string())
        }
    }

    #[test]
    fn test_get_through_handle() {
        let store = Store::new(MockStore);
        assert_eq!(store.get("key1").unwrap(), Some("value1".to_string()));
        assert_eq!(store.get("key2").unwrap(), None);
    }

    #[test]
    fn test_default_is_empty_uses_size() {
        let store = Store::new(MockStore);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn test_for_each_passes_value_and_key() {
        let store = Store::new(MockStore);
        let mut seen = Vec::new();
        store
            .for_each(|value, key| seen.push((value.clone(), key.to_string())))
            .unwrap();
        assert_eq!(seen, vec![("value1".to_string(), "key1".to_string())]);
    }

    #[test]
    fn test_clone_shares_provider() {
        let store = Store::new(MockStore);
        let cloned = store.clone();
        assert_eq!(store.name().unwrap(), cloned.name().unwrap());
    }
}
