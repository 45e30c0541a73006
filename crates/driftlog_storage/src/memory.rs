//! In-memory ordered store.

use crate::error::StorageResult;
use crate::store::{IterOptions, Item, OrderedStore, StoreIterator};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// An in-memory ordered store.
///
/// Entries live in a `BTreeMap` behind an `Arc`. Iterators clone the `Arc`
/// and writers copy-on-write, so every iterator sees the snapshot taken
/// when it was opened.
///
/// This store is suitable for:
/// - Unit and integration tests
/// - Replicas that keep the log in memory
///
/// # Example
///
/// ```rust
/// use driftlog_storage::{InMemoryStore, IterOptions, OrderedStore};
///
/// let store = InMemoryStore::new();
/// store.put(b"a".to_vec(), b"1".to_vec());
/// store.put(b"b".to_vec(), b"2".to_vec());
///
/// let mut it = store.iter(IterOptions::forward()).unwrap();
/// it.rewind().unwrap();
/// assert_eq!(it.item().unwrap().key, b"a");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<Arc<Entries>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given entries.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        Self {
            entries: RwLock::new(Arc::new(entries.into_iter().collect())),
        }
    }

    /// Inserts or replaces an entry.
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) {
        let mut entries = self.entries.write();
        Arc::make_mut(&mut entries).insert(key, value);
    }

    /// Removes an entry, returning its value.
    pub fn delete(&self, key: &[u8]) -> Option<Vec<u8>> {
        let mut entries = self.entries.write();
        Arc::make_mut(&mut entries).remove(key)
    }

    /// Returns a copy of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn snapshot(&self) -> Arc<Entries> {
        Arc::clone(&self.entries.read())
    }
}

impl OrderedStore for InMemoryStore {
    fn iter(&self, options: IterOptions) -> StorageResult<Box<dyn StoreIterator + '_>> {
        Ok(Box::new(SnapshotIter {
            snapshot: self.snapshot(),
            options,
            current: None,
        }))
    }
}

/// Iterator over an `InMemoryStore` snapshot.
struct SnapshotIter {
    snapshot: Arc<Entries>,
    options: IterOptions,
    current: Option<(Vec<u8>, Vec<u8>)>,
}

impl SnapshotIter {
    fn position(&mut self, lower: Bound<&[u8]>, upper: Bound<&[u8]>) {
        let mut range = self.snapshot.range::<[u8], _>((lower, upper));
        let entry = if self.options.reverse {
            range.next_back()
        } else {
            range.next()
        };
        self.current = entry.map(|(k, v)| (k.clone(), v.clone()));
    }
}

impl StoreIterator for SnapshotIter {
    fn seek(&mut self, key: &[u8]) -> StorageResult<()> {
        if self.options.reverse {
            self.position(Bound::Unbounded, Bound::Included(key));
        } else {
            self.position(Bound::Included(key), Bound::Unbounded);
        }
        Ok(())
    }

    fn rewind(&mut self) -> StorageResult<()> {
        self.position(Bound::Unbounded, Bound::Unbounded);
        Ok(())
    }

    fn next(&mut self) -> StorageResult<()> {
        let Some((key, _)) = self.current.take() else {
            return Ok(());
        };
        if self.options.reverse {
            self.position(Bound::Unbounded, Bound::Excluded(key.as_slice()));
        } else {
            self.position(Bound::Excluded(key.as_slice()), Bound::Unbounded);
        }
        Ok(())
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn item(&self) -> Option<Item<'_>> {
        self.current.as_ref().map(|(key, value)| Item {
            key,
            value: self.options.fetch_values.then_some(value.as_slice()),
        })
    }
}
