//! Last-key-under-prefix search.
//!
//! Stores only offer sequential iteration plus seek, so finding the greatest
//! key under a prefix means seeking a reverse iterator to the prefix's
//! successor (the smallest key above the whole prefix range) and reading
//! backwards.

use super::LogReader;
use crate::error::{CoreError, CoreResult};
use crate::keyspace::{decode_view_offset, decode_wal_index, prefix_successor, Prefix};
use driftlog_codec::Offset;
use driftlog_storage::{IterOptions, OrderedStore, StorageResult, StoreIterator};
use tracing::trace;

impl<S: OrderedStore> LogReader<S> {
    /// Returns the greatest key starting with `prefix`.
    ///
    /// An empty prefix matches every key, so this returns the last key of
    /// the store. Returns `Ok(None)` if no key matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to iterate.
    pub fn last_key_for_prefix(&self, prefix: &[u8]) -> CoreResult<Option<Vec<u8>>> {
        let mut it = self.store.iter(IterOptions::reverse_keys())?;
        seek_to_last(it.as_mut(), prefix)?;

        if !it.valid_for_prefix(prefix) {
            return Ok(None);
        }
        Ok(it.item().map(|item| item.key.to_vec()))
    }

    /// Returns the value of the greatest key starting with `prefix` and
    /// ending with `suffix`.
    ///
    /// A `None` or empty suffix matches any key, which makes this the value
    /// stored under [`last_key_for_prefix`](Self::last_key_for_prefix).
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to iterate.
    pub fn last_kv_for_prefix(
        &self,
        prefix: &[u8],
        suffix: Option<&[u8]>,
    ) -> CoreResult<Option<Vec<u8>>> {
        let mut it = self
            .store
            .iter(IterOptions::reverse_keys().fetch_values(true))?;
        seek_to_last(it.as_mut(), prefix)?;

        while it.valid_for_prefix(prefix) {
            if let Some(item) = it.item() {
                if suffix.is_none_or(|s| item.key.ends_with(s)) {
                    return Ok(Some(item.value.unwrap_or_default().to_vec()));
                }
            }
            it.next()?;
        }
        Ok(None)
    }

    /// Returns the highest index stored in the write-ahead log.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, or if the last WAL key is
    /// malformed.
    pub fn last_wal_index(&self) -> CoreResult<Option<u64>> {
        let Some(key) = self.last_key_for_prefix(Prefix::WAL.as_bytes())? else {
            return Ok(None);
        };
        decode_wal_index(&key)
            .map(Some)
            .ok_or_else(|| CoreError::invalid_key(format!("malformed WAL key {key:02x?}")))
    }

    /// Returns the offset of the newest message in the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, or if the last view key is
    /// malformed.
    pub fn last_offset(&self) -> CoreResult<Option<Offset>> {
        let Some(key) = self.last_key_for_prefix(Prefix::VIEW.as_bytes())? else {
            return Ok(None);
        };
        decode_view_offset(&key)
            .map(Some)
            .ok_or_else(|| CoreError::invalid_key(format!("malformed view key {key:02x?}")))
    }
}

/// Positions a reverse iterator on the greatest key that could start with
/// `prefix`.
fn seek_to_last(it: &mut dyn StoreIterator, prefix: &[u8]) -> StorageResult<()> {
    let Some(successor) = prefix_successor(prefix) else {
        // Empty or all-0xFF prefix: the range runs to the end of the store.
        trace!(prefix_len = prefix.len(), "rewinding to end of keyspace");
        return it.rewind();
    };

    trace!(?successor, "seeking to prefix successor");
    it.seek(&successor)?;
    if it.item().is_some_and(|item| item.key == successor.as_slice()) {
        it.next()?;
    }
    Ok(())
}
