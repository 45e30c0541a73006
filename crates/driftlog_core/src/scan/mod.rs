//! Read access to the log.
//!
//! [`LogReader`] wraps an [`OrderedStore`] and provides every read the
//! upper layers need:
//!
//! - prefix scans: [`LogReader::last_key_for_prefix`],
//!   [`LogReader::last_kv_for_prefix`]
//! - offset range reads: [`LogReader::for_range`], [`LogReader::for_each`]
//! - WAL tailing: [`LogReader::for_each_wal_entry`],
//!   [`LogReader::for_range_wal`]
//!
//! Every call opens its own iterator and drops it before returning, on
//! every path. The reader takes no locks and performs no writes.
//!
//! # Visitors
//!
//! Scans hand each decoded [`Message`](driftlog_codec::Message) to a
//! visitor returning `Result<Visit, E>`:
//!
//! - `Ok(Visit::Continue)` moves on to the next entry
//! - `Ok(Visit::Stop)` ends the scan successfully
//! - `Err(e)` ends the scan and is returned as is
//!
//! `E` must implement `From<CoreError>` so that storage and decode
//! failures can be reported through the same channel. `CoreError` itself
//! qualifies.

mod iterator;
mod prefix;
mod range;
mod wal;

pub use iterator::MessageIterator;

use driftlog_storage::OrderedStore;

/// What a visitor wants the scan to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Deliver the next entry.
    Continue,
    /// End the scan without error.
    Stop,
}

/// Outcome of a successful scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Number of entries handed to the visitor.
    pub visited: usize,
    /// Whether the visitor ended the scan with [`Visit::Stop`].
    pub stopped: bool,
}

impl ScanSummary {
    /// Records one visitor call and its answer.
    ///
    /// Returns true if the scan should continue.
    fn record(&mut self, visit: Visit) -> bool {
        self.visited += 1;
        self.stopped = visit == Visit::Stop;
        !self.stopped
    }
}

/// Read-only view of a log stored in an [`OrderedStore`].
///
/// # Example
///
/// ```rust
/// use driftlog_core::{CoreError, LogReader, Visit};
/// use driftlog_storage::InMemoryStore;
///
/// let reader = LogReader::new(InMemoryStore::new());
/// let summary = reader.for_each(|_msg| Ok::<_, CoreError>(Visit::Continue)).unwrap();
/// assert_eq!(summary.visited, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogReader<S> {
    store: S,
}

impl<S: OrderedStore> LogReader<S> {
    /// Creates a reader over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the reader, returning the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}
