//! Fault injection for store-level failures.
//!
//! [`FaultyStore`] wraps any [`OrderedStore`] and fails a chosen cursor
//! movement, so tests can check that scans give up cleanly and report the
//! store error instead of a partial result.

use driftlog_storage::{
    IterOptions, Item, OrderedStore, StorageError, StorageResult, StoreIterator,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A store wrapper that fails on demand.
///
/// Cursor movements (`seek`, `rewind`, `next`) are counted across every
/// iterator the store hands out. The movement numbered `fail_at` (1-based)
/// and every one after it returns [`StorageError::Injected`].
pub struct FaultyStore<S> {
    inner: S,
    faults: Faults,
}

struct Faults {
    moves: AtomicUsize,
    fail_at: AtomicUsize,
    fail_open: AtomicBool,
}

impl Faults {
    fn check_move(&self, op: &str) -> StorageResult<()> {
        let n = self.moves.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.fail_at.load(Ordering::SeqCst) {
            return Err(StorageError::injected(format!("{op} #{n}")));
        }
        Ok(())
    }
}

impl<S: OrderedStore> FaultyStore<S> {
    /// Wraps `inner` with no fault armed.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Faults {
                moves: AtomicUsize::new(0),
                fail_at: AtomicUsize::new(usize::MAX),
                fail_open: AtomicBool::new(false),
            },
        }
    }

    /// Fails the `n`-th cursor movement from now on (1-based).
    pub fn fail_at_move(&self, n: usize) {
        self.faults.moves.store(0, Ordering::SeqCst);
        self.faults.fail_at.store(n.max(1), Ordering::SeqCst);
    }

    /// Sets whether opening an iterator fails.
    pub fn set_fail_open(&self, fail: bool) {
        self.faults.fail_open.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of cursor movements since the last reset.
    pub fn moves(&self) -> usize {
        self.faults.moves.load(Ordering::SeqCst)
    }

    /// Disarms every fault and clears the movement count.
    pub fn reset(&self) {
        self.faults.moves.store(0, Ordering::SeqCst);
        self.faults.fail_at.store(usize::MAX, Ordering::SeqCst);
        self.faults.fail_open.store(false, Ordering::SeqCst);
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: OrderedStore> OrderedStore for FaultyStore<S> {
    fn iter(&self, options: IterOptions) -> StorageResult<Box<dyn StoreIterator + '_>> {
        if self.faults.fail_open.load(Ordering::SeqCst) {
            return Err(StorageError::injected("iterator open"));
        }
        Ok(Box::new(FaultyIter {
            inner: self.inner.iter(options)?,
            faults: &self.faults,
        }))
    }
}

struct FaultyIter<'a> {
    inner: Box<dyn StoreIterator + 'a>,
    faults: &'a Faults,
}

impl StoreIterator for FaultyIter<'_> {
    fn seek(&mut self, key: &[u8]) -> StorageResult<()> {
        self.faults.check_move("seek")?;
        self.inner.seek(key)
    }

    fn rewind(&mut self) -> StorageResult<()> {
        self.faults.check_move("rewind")?;
        self.inner.rewind()
    }

    fn next(&mut self) -> StorageResult<()> {
        self.faults.check_move("next")?;
        self.inner.next()
    }

    fn valid(&self) -> bool {
        self.inner.valid()
    }

    fn item(&self) -> Option<Item<'_>> {
        self.inner.item()
    }
}
