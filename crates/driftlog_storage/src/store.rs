//! Ordered store capability traits.

use crate::error::StorageResult;

/// Options for opening an iterator over an [`OrderedStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IterOptions {
    /// Iterate in descending key order.
    pub reverse: bool,
    /// Fetch values along with keys.
    ///
    /// When `false`, [`Item::value`] is always `None`.
    pub fetch_values: bool,
}

impl IterOptions {
    /// Forward iteration with values.
    #[must_use]
    pub const fn forward() -> Self {
        Self {
            reverse: false,
            fetch_values: true,
        }
    }

    /// Reverse iteration without values.
    #[must_use]
    pub const fn reverse_keys() -> Self {
        Self {
            reverse: true,
            fetch_values: false,
        }
    }

    /// Sets whether to iterate in reverse.
    #[must_use]
    pub const fn reverse(mut self, value: bool) -> Self {
        self.reverse = value;
        self
    }

    /// Sets whether values are fetched.
    #[must_use]
    pub const fn fetch_values(mut self, value: bool) -> Self {
        self.fetch_values = value;
        self
    }
}

/// The entry under an iterator's cursor.
///
/// An item borrows its iterator, so it cannot outlive the next cursor
/// movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item<'a> {
    /// The entry key.
    pub key: &'a [u8],
    /// The entry value, if the iterator fetches values.
    pub value: Option<&'a [u8]>,
}

/// A byte-keyed store with ordered iteration.
///
/// Stores are **capability providers**: they expose snapshot iteration with
/// seek, and nothing about how keys are laid out. The key-space convention
/// lives in `driftlog_core`.
///
/// # Invariants
///
/// - Keys are ordered bytewise (lexicographically)
/// - Each iterator observes a consistent snapshot of the store
/// - Stores must be `Send + Sync` so they can be shared across readers
pub trait OrderedStore: Send + Sync {
    /// Opens an iterator over a snapshot of the store.
    ///
    /// The iterator is released when it is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot create a snapshot.
    fn iter(&self, options: IterOptions) -> StorageResult<Box<dyn StoreIterator + '_>>;
}

/// A cursor over an [`OrderedStore`] snapshot.
///
/// A freshly opened iterator is not positioned; call [`seek`](Self::seek)
/// or [`rewind`](Self::rewind) first.
///
/// # Positioning
///
/// | direction | `seek(k)`           | `rewind()` |
/// |-----------|---------------------|------------|
/// | forward   | first key `>= k`    | first key  |
/// | reverse   | last key `<= k`     | last key   |
pub trait StoreIterator {
    /// Positions the cursor relative to `key` (see the table above).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn seek(&mut self, key: &[u8]) -> StorageResult<()>;

    /// Positions the cursor at the first entry in iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn rewind(&mut self) -> StorageResult<()>;

    /// Advances the cursor in iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn next(&mut self) -> StorageResult<()>;

    /// Returns true if the cursor points at an entry.
    fn valid(&self) -> bool;

    /// Returns the entry under the cursor.
    fn item(&self) -> Option<Item<'_>>;

    /// Returns true if the cursor points at an entry whose key starts
    /// with `prefix`.
    fn valid_for_prefix(&self, prefix: &[u8]) -> bool {
        self.item().is_some_and(|item| item.key.starts_with(prefix))
    }
}

impl<T: OrderedStore + ?Sized> OrderedStore for &T {
    fn iter(&self, options: IterOptions) -> StorageResult<Box<dyn StoreIterator + '_>> {
        (**self).iter(options)
    }
}

impl<T: OrderedStore + ?Sized> OrderedStore for std::sync::Arc<T> {
    fn iter(&self, options: IterOptions) -> StorageResult<Box<dyn StoreIterator + '_>> {
        (**self).iter(options)
    }
}
