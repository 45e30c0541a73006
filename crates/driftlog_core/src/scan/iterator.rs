//! Decoding cursor over the message log.

use crate::error::CoreResult;
use crate::keyspace::{view_key, Prefix};
use driftlog_codec::{Message, Offset};
use driftlog_storage::{IterOptions, OrderedStore, StoreIterator};

/// A forward cursor over the view keyspace that decodes each entry.
///
/// The cursor holds at most one decoded message: the one under the store
/// cursor. Moving the cursor replaces it. Entries outside the view keyspace
/// end the iteration.
///
/// # Example
///
/// ```rust,ignore
/// let mut it = MessageIterator::new(&store)?;
/// it.rewind()?;
/// while let Some(msg) = it.message() {
///     println!("{}", msg.offset);
///     it.next()?;
/// }
/// ```
pub struct MessageIterator<'a> {
    inner: Box<dyn StoreIterator + 'a>,
    current: Option<Message>,
}

impl<'a> MessageIterator<'a> {
    /// Opens a cursor over a snapshot of `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot open an iterator.
    pub fn new<S: OrderedStore + ?Sized>(store: &'a S) -> CoreResult<Self> {
        Ok(Self {
            inner: store.iter(IterOptions::forward())?,
            current: None,
        })
    }

    /// Positions on the first message of the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the message cannot be decoded.
    pub fn rewind(&mut self) -> CoreResult<Option<&Message>> {
        self.inner.seek(&Prefix::VIEW.key(&[]))?;
        self.load()
    }

    /// Positions on the first message at or after `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the message cannot be decoded.
    pub fn seek(&mut self, offset: &Offset) -> CoreResult<Option<&Message>> {
        self.inner.seek(&view_key(offset))?;
        self.load()
    }

    /// Moves to the next message.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the message cannot be decoded.
    pub fn next(&mut self) -> CoreResult<Option<&Message>> {
        self.inner.next()?;
        self.load()
    }

    /// Returns true if the cursor is on a message.
    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the message under the cursor.
    pub fn message(&self) -> Option<&Message> {
        self.current.as_ref()
    }

    /// Takes the message under the cursor, leaving the store cursor in place.
    ///
    /// A following [`next`](Self::next) still moves past it.
    pub fn take_message(&mut self) -> Option<Message> {
        self.current.take()
    }

    fn load(&mut self) -> CoreResult<Option<&Message>> {
        self.current = None;
        if let Some(item) = self.inner.item() {
            if item.key.starts_with(Prefix::VIEW.as_bytes()) {
                self.current = Some(Message::decode(item.value.unwrap_or_default())?);
            }
        }
        Ok(self.current.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::keyspace::wal_key;
    use driftlog_storage::InMemoryStore;

    fn store_with(offsets: &[Offset]) -> InMemoryStore {
        let store = InMemoryStore::new();
        for (i, offset) in offsets.iter().enumerate() {
            let msg = Message::new("t", "p", *offset, i as u64 + 1, &b"x"[..]);
            store.put(view_key(offset), msg.encode().unwrap());
        }
        store
    }

    #[test]
    fn rewind_starts_at_first_message() {
        let store = store_with(&[Offset::new(2, 0), Offset::new(1, 0)]);
        store.put(b"\x01a|before".to_vec(), b"not a message".to_vec());

        let mut it = MessageIterator::new(&store).unwrap();
        let first = it.rewind().unwrap().unwrap();
        assert_eq!(first.offset, Offset::new(1, 0));
    }

    #[test]
    fn seek_and_next_walk_in_offset_order() {
        let offsets = [Offset::new(1, 0), Offset::new(1, 1), Offset::new(3, 0)];
        let store = store_with(&offsets);

        let mut it = MessageIterator::new(&store).unwrap();
        it.seek(&Offset::new(1, 1)).unwrap();
        assert_eq!(it.message().unwrap().offset, offsets[1]);
        assert_eq!(it.next().unwrap().unwrap().offset, offsets[2]);
        assert!(it.next().unwrap().is_none());
        assert!(!it.valid());
    }

    #[test]
    fn stops_at_end_of_view_keyspace() {
        let store = store_with(&[Offset::new(1, 0)]);
        store.put(wal_key(1), b"wal entry".to_vec());

        let mut it = MessageIterator::new(&store).unwrap();
        it.rewind().unwrap();
        assert!(it.valid());
        assert!(it.next().unwrap().is_none());
    }

    #[test]
    fn take_message_keeps_store_position() {
        let offsets = [Offset::new(1, 0), Offset::new(2, 0)];
        let store = store_with(&offsets);

        let mut it = MessageIterator::new(&store).unwrap();
        it.rewind().unwrap();
        let taken = it.take_message().unwrap();
        assert_eq!(taken.offset, offsets[0]);
        assert!(!it.valid());
        assert_eq!(it.next().unwrap().unwrap().offset, offsets[1]);
    }

    #[test]
    fn corrupted_value_is_an_error() {
        let store = InMemoryStore::new();
        store.put(view_key(&Offset::new(1, 0)), vec![0xff, 0x00]);

        let mut it = MessageIterator::new(&store).unwrap();
        assert!(matches!(it.rewind(), Err(CoreError::Codec(_))));
    }
}
