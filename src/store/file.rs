use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::AdapterResult;
use crate::store::iters::{EntryIter, ValueIter};
use crate::store::StoreProvider;

/// JSON-file-backed key-value store backend.
///
/// # Purpose
/// `FileStore` keeps the same in-memory mapping as [`super::InMemoryStore`]
/// as a write-through cache, and after every mutating call synchronously
/// rewrites the entire mapping to its file path as JSON text. The file's
/// top-level value is an object whose keys are the entity's natural keys.
///
/// # Durability model
/// This is a development backend with best-effort durability only:
/// - On construction, prior content is loaded. A missing file or invalid
///   content initializes the file to an empty JSON object and the store
///   starts empty; construction never fails.
/// - A write failure during `set`/`delete`/`clear` propagates to the caller
///   and is not retried.
/// - The rewrite is a plain truncating write with no atomic rename and no
///   cross-process locking. Concurrent writers across processes will race
///   and corrupt the file; that is an accepted limitation, not a defect.
///
/// Byte-sequence fields survive the text format through the tagged encoding
/// of [`crate::entity::Binary`].
pub struct FileStore<T> {
    inner: Arc<FileStoreInner<T>>,
}

impl<T> Clone for FileStore<T> {
    fn clone(&self) -> Self {
        FileStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FileStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Opens a file-backed store, loading any prior content.
    ///
    /// If the file at `path` is absent or does not parse as a JSON object of
    /// records, it is recreated as `{}` and the store starts empty. This
    /// degraded path logs a warning but never returns an error.
    ///
    /// # Arguments
    /// * `name` - The name/identifier for the store
    /// * `path` - The file the mapping is persisted to
    pub fn open(name: &str, path: impl Into<PathBuf>) -> Self {
        FileStore {
            inner: Arc::new(FileStoreInner::open(name, path.into())),
        }
    }

    /// Returns the file path this store persists to.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl<T> StoreProvider<T> for FileStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
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
        Ok(self.inner.name.clone())
    }
}

struct FileStoreInner<T> {
    backing_map: Atomic<IndexMap<String, T>>,
    path: PathBuf,
    name: String,
}

impl<T> FileStoreInner<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn open(name: &str, path: PathBuf) -> FileStoreInner<T> {
        let backing_map = Self::load_or_init(&path);
        FileStoreInner {
            backing_map: atomic(backing_map),
            path,
            name: name.to_string(),
        }
    }

    /// Loads the persisted mapping, degrading to empty on any failure.
    ///
    /// A load failure recreates the file as `{}` so subsequent mutations
    /// start from a known state. Recreation itself is best-effort; if even
    /// that write fails, the store still proceeds empty and the next `set`
    /// will surface the real I/O problem.
    fn load_or_init(path: &Path) -> IndexMap<String, T> {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => return map,
                Err(err) => {
                    log::warn!(
                        "Store file {} has invalid content, starting empty: {}",
                        path.display(),
                        err
                    );
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Store file {} not found, initializing", path.display());
            }
            Err(err) => {
                log::warn!(
                    "Cannot read store file {}, starting empty: {}",
                    path.display(),
                    err
                );
            }
        }

        if let Err(err) = fs::write(path, "{}") {
            log::warn!(
                "Failed to initialize store file {}: {}",
                path.display(),
                err
            );
        }
        IndexMap::new()
    }

    /// Rewrites the whole mapping to the store file.
    ///
    /// Called with the write lock held so the mutate-serialize-write
    /// sequence is not interleaved with other writers in this process.
    fn write_file(&self, map: &IndexMap<String, T>) -> AdapterResult<()> {
        let text = serde_json::to_string(map)?;
        fs::write(&self.path, text).map_err(|err| {
            log::error!(
                "Failed to persist store {} to {}: {}",
                self.name,
                self.path.display(),
                err
            );
            err.into()
        })
    }

    fn get(&self, key: &str) -> AdapterResult<Option<T>> {
        Ok(self.backing_map.read_with(|map| map.get(key).cloned()))
    }

    fn set(&self, key: &str, value: T) -> AdapterResult<()> {
        self.backing_map.write_with(|map| {
            map.insert(key.to_string(), value);
            self.write_file(map)
        })
    }

    fn delete(&self, key: &str) -> AdapterResult<()> {
        self.backing_map.write_with(|map| {
            map.shift_remove(key);
            self.write_file(map)
        })
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
        self.backing_map.write_with(|map| {
            map.clear();
            self.write_file(map)
        })
    }
}
