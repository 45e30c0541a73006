//! Replica catch-up.
//!
//! A replica that fell behind asks the leader for everything after the last
//! WAL index it holds. [`WalCatchup`] answers with bounded batches so a
//! replica far behind does not receive the whole log in one reply.
//!
//! Each WAL entry carries its own index in [`Message::index`], which is
//! what the batch cursor reports.

use crate::config::CatchupConfig;
use crate::error::{CoreError, CoreResult};
use crate::scan::{LogReader, Visit};
use driftlog_codec::Message;
use driftlog_storage::OrderedStore;
use tracing::debug;

/// One bounded slice of the WAL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatchupBatch {
    /// Entries in ascending index order.
    pub entries: Vec<Message>,
    /// Index of the last entry in the batch, or the requested cursor when
    /// the batch is empty. Pass it to the next request.
    pub cursor: u64,
    /// Whether entries remain after `cursor`.
    pub has_more: bool,
}

impl CatchupBatch {
    /// Returns true if the batch carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Serves WAL batches to replicas.
///
/// # Example
///
/// ```rust
/// use driftlog_core::{CatchupConfig, LogReader, WalCatchup};
/// use driftlog_storage::InMemoryStore;
///
/// let reader = LogReader::new(InMemoryStore::new());
/// let catchup = WalCatchup::new(&reader, CatchupConfig::default());
///
/// let batch = catchup.next_batch(0).unwrap();
/// assert!(batch.is_empty());
/// assert_eq!(batch.cursor, 0);
/// assert!(!batch.has_more);
/// ```
#[derive(Debug)]
pub struct WalCatchup<'a, S> {
    reader: &'a LogReader<S>,
    config: CatchupConfig,
}

impl<'a, S: OrderedStore> WalCatchup<'a, S> {
    /// Creates a catch-up server over `reader`.
    pub fn new(reader: &'a LogReader<S>, config: CatchupConfig) -> Self {
        Self { reader, config }
    }

    /// Returns the batch limits.
    pub fn config(&self) -> &CatchupConfig {
        &self.config
    }

    /// Returns the entries following WAL index `after`.
    ///
    /// The batch holds at most `max_batch_entries` entries and at most
    /// `max_batch_bytes` of payload, except that a non-empty WAL tail always
    /// yields at least one entry.
    ///
    /// A batch that reaches its entry limit ends without reading the entry
    /// after it, so a damaged entry only fails the batch that would carry
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or an entry cannot be decoded.
    pub fn next_batch(&self, after: u64) -> CoreResult<CatchupBatch> {
        let max_entries = self.config.max_batch_entries.max(1);
        let max_bytes = self.config.max_batch_bytes;

        let mut batch = CatchupBatch {
            entries: Vec::new(),
            cursor: after,
            has_more: false,
        };
        let mut bytes = 0usize;
        let mut count_limited = false;

        self.reader.for_range_wal::<_, CoreError>(after, 0, |message| {
            let size = message.value.len();
            if !batch.entries.is_empty() && bytes.saturating_add(size) > max_bytes {
                batch.has_more = true;
                return Ok(Visit::Stop);
            }
            bytes += size;
            batch.cursor = message.index;
            batch.entries.push(message);
            if batch.entries.len() >= max_entries {
                count_limited = true;
                return Ok(Visit::Stop);
            }
            Ok(Visit::Continue)
        })?;

        if count_limited {
            batch.has_more = self
                .reader
                .last_wal_index()?
                .is_some_and(|last| last > batch.cursor);
        }

        debug!(
            after,
            cursor = batch.cursor,
            entries = batch.entries.len(),
            bytes,
            has_more = batch.has_more,
            "catch-up batch built"
        );
        Ok(batch)
    }

    /// Returns how many WAL indexes a replica at `after` is behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the last WAL key is malformed.
    pub fn lag(&self, after: u64) -> CoreResult<u64> {
        let last = self.reader.last_wal_index()?.unwrap_or(0);
        Ok(last.saturating_sub(after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyspace::wal_key;
    use driftlog_codec::Offset;
    use driftlog_storage::InMemoryStore;

    fn reader_with(count: u64, payload: usize) -> LogReader<InMemoryStore> {
        let store = InMemoryStore::new();
        for i in 1..=count {
            let msg = Message::new("t", "p", Offset::new(1, i), i, vec![0u8; payload]);
            store.put(wal_key(i), msg.encode().unwrap());
        }
        LogReader::new(store)
    }

    fn indexes(batch: &CatchupBatch) -> Vec<u64> {
        batch.entries.iter().map(|m| m.index).collect()
    }

    #[test]
    fn batch_respects_entry_limit() {
        let reader = reader_with(5, 1);
        let catchup = WalCatchup::new(&reader, CatchupConfig::new().max_batch_entries(2));

        let first = catchup.next_batch(0).unwrap();
        assert_eq!(indexes(&first), vec![1, 2]);
        assert_eq!(first.cursor, 2);
        assert!(first.has_more);

        let second = catchup.next_batch(first.cursor).unwrap();
        assert_eq!(indexes(&second), vec![3, 4]);
        assert!(second.has_more);

        let third = catchup.next_batch(second.cursor).unwrap();
        assert_eq!(indexes(&third), vec![5]);
        assert_eq!(third.cursor, 5);
        assert!(!third.has_more);
    }

    #[test]
    fn exact_fit_reports_no_more() {
        let reader = reader_with(3, 1);
        let catchup = WalCatchup::new(&reader, CatchupConfig::new().max_batch_entries(3));

        let batch = catchup.next_batch(0).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(!batch.has_more);
    }

    #[test]
    fn batch_respects_byte_limit() {
        let reader = reader_with(4, 10);
        let catchup = WalCatchup::new(&reader, CatchupConfig::new().max_batch_bytes(25));

        let batch = catchup.next_batch(0).unwrap();
        assert_eq!(indexes(&batch), vec![1, 2]);
        assert!(batch.has_more);
    }

    #[test]
    fn oversized_entry_still_ships_alone() {
        let reader = reader_with(2, 100);
        let catchup = WalCatchup::new(&reader, CatchupConfig::new().max_batch_bytes(10));

        let batch = catchup.next_batch(0).unwrap();
        assert_eq!(indexes(&batch), vec![1]);
        assert!(batch.has_more);
    }

    #[test]
    fn full_batch_does_not_read_past_its_last_entry() {
        let reader = reader_with(3, 1);
        reader.store().put(wal_key(3), vec![0xa1, 0x01]);
        let catchup = WalCatchup::new(&reader, CatchupConfig::new().max_batch_entries(2));

        let batch = catchup.next_batch(0).unwrap();
        assert_eq!(indexes(&batch), vec![1, 2]);
        assert_eq!(batch.cursor, 2);
        assert!(batch.has_more);

        assert!(matches!(catchup.next_batch(2), Err(CoreError::Codec(_))));
    }

    #[test]
    fn zero_entry_limit_still_progresses() {
        let reader = reader_with(2, 1);
        let catchup = WalCatchup::new(&reader, CatchupConfig::new().max_batch_entries(0));

        let batch = catchup.next_batch(0).unwrap();
        assert_eq!(indexes(&batch), vec![1]);
    }

    #[test]
    fn caught_up_replica_gets_empty_batch() {
        let reader = reader_with(3, 1);
        let catchup = WalCatchup::new(&reader, CatchupConfig::default());

        let batch = catchup.next_batch(3).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.cursor, 3);
        assert!(!batch.has_more);
    }

    #[test]
    fn lag_counts_missing_indexes() {
        let reader = reader_with(5, 1);
        let catchup = WalCatchup::new(&reader, CatchupConfig::default());

        assert_eq!(catchup.lag(0).unwrap(), 5);
        assert_eq!(catchup.lag(3).unwrap(), 2);
        assert_eq!(catchup.lag(9).unwrap(), 0);

        let empty = reader_with(0, 1);
        assert_eq!(WalCatchup::new(&empty, CatchupConfig::default()).lag(0).unwrap(), 0);
    }
}
