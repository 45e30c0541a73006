//! Write-ahead log tailing.
//!
//! A replica catching up sends the key (or index) of the last WAL entry it
//! holds. The scan resumes strictly after it: if the resume key is still
//! in the log it is skipped, otherwise the scan starts at the next key.
//! Either way no entry is delivered twice and none is skipped.

use super::{LogReader, ScanSummary, Visit};
use crate::error::CoreError;
use crate::keyspace::{wal_key, Prefix};
use driftlog_codec::Message;
use driftlog_storage::{IterOptions, OrderedStore, StorageResult, StoreIterator};
use tracing::{debug, trace};

impl<S: OrderedStore> LogReader<S> {
    /// Visits WAL entries after `min_key` in index order.
    ///
    /// `min_key` is a full WAL key (see [`wal_key`]) naming the last entry
    /// the caller already has, or empty to start at the beginning of the
    /// WAL.
    ///
    /// # Errors
    ///
    /// - `min_key` outside the WAL keyspace, as `CoreError::InvalidKey`
    /// - store failures and undecodable entries, as `E::from(CoreError)`
    /// - the first error returned by `visit`, unchanged
    pub fn for_each_wal_entry<F, E>(&self, min_key: &[u8], visit: F) -> Result<ScanSummary, E>
    where
        F: FnMut(Message) -> Result<Visit, E>,
        E: From<CoreError>,
    {
        if !min_key.is_empty() && !min_key.starts_with(Prefix::WAL.as_bytes()) {
            return Err(CoreError::invalid_key(format!(
                "resume key {min_key:02x?} is outside the WAL keyspace"
            ))
            .into());
        }

        let mut it = self.store.iter(IterOptions::forward()).map_err(CoreError::from)?;
        resume_after(it.as_mut(), (!min_key.is_empty()).then_some(min_key))
            .map_err(CoreError::from)?;

        let summary = drain_wal(it.as_mut(), None, visit)?;
        debug!(visited = summary.visited, stopped = summary.stopped, "WAL tail finished");
        Ok(summary)
    }

    /// Visits WAL entries with index in `(min_index, max_index]`.
    ///
    /// `min_index` is the index of the last entry the caller already has;
    /// `0` starts at the beginning of the WAL. `max_index == 0` means no
    /// upper bound. The two bounds are independent: a non-zero `max_index`
    /// fences the scan even when `min_index` is `0`, and `(n, 0)` tails
    /// everything after `n`.
    ///
    /// # Errors
    ///
    /// - store failures and undecodable entries, as `E::from(CoreError)`
    /// - the first error returned by `visit`, unchanged
    pub fn for_range_wal<F, E>(
        &self,
        min_index: u64,
        max_index: u64,
        visit: F,
    ) -> Result<ScanSummary, E>
    where
        F: FnMut(Message) -> Result<Visit, E>,
        E: From<CoreError>,
    {
        let min_key = (min_index != 0).then(|| wal_key(min_index));
        let max_key = (max_index != 0).then(|| wal_key(max_index));

        let mut it = self.store.iter(IterOptions::forward()).map_err(CoreError::from)?;
        resume_after(it.as_mut(), min_key.as_deref()).map_err(CoreError::from)?;

        let summary = drain_wal(it.as_mut(), max_key.as_deref(), visit)?;
        debug!(
            min_index,
            max_index,
            visited = summary.visited,
            stopped = summary.stopped,
            "WAL range finished"
        );
        Ok(summary)
    }
}

/// Positions a forward iterator on the first WAL entry after `resume`.
fn resume_after(it: &mut dyn StoreIterator, resume: Option<&[u8]>) -> StorageResult<()> {
    let Some(key) = resume else {
        trace!("tailing WAL from the start");
        return it.seek(Prefix::WAL.as_bytes());
    };

    it.seek(key)?;
    if it.item().is_some_and(|item| item.key == key) {
        // The caller already holds this entry.
        trace!("skipping resume entry");
        it.next()?;
    }
    Ok(())
}

/// Decodes and visits WAL entries until the prefix ends, `max_key` is
/// passed, or the visitor stops.
fn drain_wal<F, E>(
    it: &mut dyn StoreIterator,
    max_key: Option<&[u8]>,
    mut visit: F,
) -> Result<ScanSummary, E>
where
    F: FnMut(Message) -> Result<Visit, E>,
    E: From<CoreError>,
{
    let mut summary = ScanSummary::default();
    while let Some(item) = it.item() {
        if !item.key.starts_with(Prefix::WAL.as_bytes()) {
            break;
        }
        if max_key.is_some_and(|max| item.key > max) {
            break;
        }

        let message = Message::decode(item.value.unwrap_or_default()).map_err(CoreError::from)?;
        if !summary.record(visit(message)?) {
            break;
        }
        it.next().map_err(CoreError::from)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyspace::view_key;
    use driftlog_codec::Offset;
    use driftlog_storage::InMemoryStore;

    fn wal_reader(indexes: &[u64]) -> LogReader<InMemoryStore> {
        let store = InMemoryStore::new();
        for &i in indexes {
            let msg = Message::new("t", "p", Offset::new(7, i), i, vec![i as u8]);
            store.put(wal_key(i), msg.encode().unwrap());
        }
        LogReader::new(store)
    }

    fn range(reader: &LogReader<InMemoryStore>, min: u64, max: u64) -> Vec<u64> {
        let mut seen = Vec::new();
        reader
            .for_range_wal(min, max, |msg| {
                seen.push(msg.index);
                Ok::<_, CoreError>(Visit::Continue)
            })
            .unwrap();
        seen
    }

    fn tail(reader: &LogReader<InMemoryStore>, min_key: &[u8]) -> Vec<u64> {
        let mut seen = Vec::new();
        reader
            .for_each_wal_entry(min_key, |msg| {
                seen.push(msg.index);
                Ok::<_, CoreError>(Visit::Continue)
            })
            .unwrap();
        seen
    }

    #[test]
    fn resume_skips_entry_already_held() {
        let reader = wal_reader(&[1, 2, 3, 4, 5]);
        assert_eq!(range(&reader, 3, 5), vec![4, 5]);
    }

    #[test]
    fn zero_bounds_visit_whole_wal() {
        let reader = wal_reader(&[1, 2, 3, 4, 5]);
        assert_eq!(range(&reader, 0, 0), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn upper_bound_is_inclusive() {
        let reader = wal_reader(&[1, 2, 3, 4, 5]);
        assert_eq!(range(&reader, 1, 3), vec![2, 3]);
        assert_eq!(range(&reader, 0, 2), vec![1, 2]);
    }

    #[test]
    fn open_upper_bound_with_resume_point() {
        let reader = wal_reader(&[1, 2, 3]);
        assert_eq!(range(&reader, 1, 0), vec![2, 3]);
    }

    #[test]
    fn resume_point_missing_from_wal() {
        // Entry 3 was truncated away; the scan starts at the next one.
        let reader = wal_reader(&[1, 2, 4, 5]);
        assert_eq!(range(&reader, 3, 0), vec![4, 5]);
    }

    #[test]
    fn resume_at_tip_visits_nothing() {
        let reader = wal_reader(&[1, 2, 3]);
        assert!(range(&reader, 3, 0).is_empty());
        assert!(range(&reader, 9, 0).is_empty());
    }

    #[test]
    fn max_below_min_visits_nothing() {
        let reader = wal_reader(&[1, 2, 3, 4]);
        assert!(range(&reader, 3, 2).is_empty());
    }

    #[test]
    fn scan_ignores_neighbouring_keyspaces() {
        let reader = wal_reader(&[1, 2]);
        let msg = Message::new("t", "p", Offset::new(1, 1), 1, vec![0]);
        reader.store().put(view_key(&msg.offset), msg.encode().unwrap());
        reader.store().put(vec![0x01, b'x', b'|'], b"after wal".to_vec());
        reader.store().put(vec![0x01, b'a', b'|'], b"before wal".to_vec());

        assert_eq!(range(&reader, 0, 0), vec![1, 2]);
        assert_eq!(tail(&reader, &[]), vec![1, 2]);
    }

    #[test]
    fn tail_by_key() {
        let reader = wal_reader(&[1, 2, 3, 4, 5]);
        assert_eq!(tail(&reader, &[]), vec![1, 2, 3, 4, 5]);
        assert_eq!(tail(&reader, &wal_key(2)), vec![3, 4, 5]);
        assert_eq!(tail(&reader, &wal_key(5)), Vec::<u64>::new());
    }

    #[test]
    fn tail_rejects_foreign_resume_key() {
        let reader = wal_reader(&[1, 2]);
        let result = reader.for_each_wal_entry(&view_key(&Offset::new(1, 1)), |_| {
            Ok::<_, CoreError>(Visit::Continue)
        });
        assert!(matches!(result, Err(CoreError::InvalidKey { .. })));
    }

    #[test]
    fn empty_wal_visits_nothing() {
        let reader = wal_reader(&[]);
        assert!(tail(&reader, &[]).is_empty());
        assert!(range(&reader, 0, 0).is_empty());
    }

    #[test]
    fn visitor_error_after_second_entry() {
        let reader = wal_reader(&[1, 2, 3, 4, 5]);
        let mut seen = Vec::new();
        let result = reader.for_range_wal(0, 0, |msg| {
            seen.push(msg.index);
            if seen.len() == 2 {
                return Err(CoreError::invalid_key("enough"));
            }
            Ok(Visit::Continue)
        });
        assert!(matches!(result, Err(CoreError::InvalidKey { ref message }) if message == "enough"));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn corrupted_entry_aborts_tail() {
        let reader = wal_reader(&[1, 2, 3, 4]);
        reader.store().put(wal_key(3), vec![0xa1, 0x01]);

        let mut seen = Vec::new();
        let result = reader.for_each_wal_entry(&[], |msg| {
            seen.push(msg.index);
            Ok::<_, CoreError>(Visit::Continue)
        });
        assert!(matches!(result, Err(CoreError::Codec(_))));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn stop_reports_partial_summary() {
        let reader = wal_reader(&[1, 2, 3]);
        let summary = reader
            .for_range_wal(0, 0, |msg| {
                Ok::<_, CoreError>(if msg.index == 2 { Visit::Stop } else { Visit::Continue })
            })
            .unwrap();
        assert_eq!(summary.visited, 2);
        assert!(summary.stopped);
    }
}
