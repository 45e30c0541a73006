//! Prebuilt logs for tests.
//!
//! A [`LogFixture`] writes messages the way the write path does: every
//! message lands in the view keyspace under its offset and in the WAL under
//! its index, with identical bytes.

use driftlog_codec::{Message, Offset};
use driftlog_core::keyspace::{compose_parts, view_key, wal_key, Prefix};
use driftlog_core::LogReader;
use driftlog_storage::InMemoryStore;

/// Topic used by fixture messages.
pub const FIXTURE_TOPIC: &str = "orders";

/// Partition used by fixture messages.
pub const FIXTURE_PARTITION: &str = "0";

/// Timestamp of the first fixture message.
pub const BASE_TIMESTAMP: u64 = 1_700_000_000_000;

/// Returns the offset of the fixture message with WAL index `index`.
///
/// Four messages share each timestamp, so offsets exercise both halves of
/// the ordering.
pub fn fixture_offset(index: u64) -> Offset {
    Offset::new(BASE_TIMESTAMP + index / 4, index)
}

/// Builds a fixture message with WAL index `index`.
pub fn fixture_message(index: u64) -> Message {
    Message::new(
        FIXTURE_TOPIC,
        FIXTURE_PARTITION,
        fixture_offset(index),
        index,
        format!("payload-{index}").into_bytes(),
    )
}

/// Returns the pending key for message `seq` of consumer `group` in
/// `state` (`ack`, `commit`, ...).
pub fn pending_key(group: &str, seq: u64, state: &str) -> Vec<u8> {
    let prefix = Prefix::PENDING.key(group.as_bytes());
    compose_parts(&prefix, &[seq.to_be_bytes().as_slice(), state.as_bytes()])
}

/// An in-memory log with known content.
pub struct LogFixture {
    reader: LogReader<InMemoryStore>,
    messages: Vec<Message>,
}

impl LogFixture {
    /// Creates a log holding messages with WAL indexes `1..=count`.
    pub fn new(count: u64) -> Self {
        Self::with_indexes(1..=count)
    }

    /// Creates a log without messages.
    pub fn empty() -> Self {
        Self::with_indexes(std::iter::empty())
    }

    /// Creates a log holding the given WAL indexes.
    pub fn with_indexes(indexes: impl IntoIterator<Item = u64>) -> Self {
        let mut fixture = Self {
            reader: LogReader::new(InMemoryStore::new()),
            messages: Vec::new(),
        };
        for index in indexes {
            fixture.append(fixture_message(index));
        }
        fixture
    }

    /// Writes `message` to both the view keyspace and the WAL.
    pub fn append(&mut self, message: Message) {
        let bytes = message.encode().expect("fixture message must encode");
        self.store().put(view_key(&message.offset), bytes.clone());
        self.store().put(wal_key(message.index), bytes);

        let pos = self
            .messages
            .partition_point(|m| m.offset < message.offset);
        self.messages.insert(pos, message);
    }

    /// Records a pending entry for consumer `group`.
    pub fn put_pending(&self, group: &str, seq: u64, state: &str, value: &[u8]) {
        self.store().put(pending_key(group, seq, state), value.to_vec());
    }

    /// Overwrites the WAL entry `index` with bytes that do not decode.
    pub fn corrupt_wal(&self, index: u64) {
        self.store().put(wal_key(index), vec![0xa1, 0x01]);
    }

    /// Overwrites the view entry of `offset` with bytes that do not decode.
    pub fn corrupt_view(&self, offset: &Offset) {
        self.store().put(view_key(offset), b"not cbor".to_vec());
    }

    /// Returns the reader over the fixture store.
    pub fn reader(&self) -> &LogReader<InMemoryStore> {
        &self.reader
    }

    /// Returns the fixture store.
    pub fn store(&self) -> &InMemoryStore {
        self.reader.store()
    }

    /// Returns the messages written, in offset order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the WAL indexes written, in ascending order.
    pub fn wal_indexes(&self) -> Vec<u64> {
        let mut indexes: Vec<u64> = self.messages.iter().map(|m| m.index).collect();
        indexes.sort_unstable();
        indexes
    }

    /// Consumes the fixture, returning its reader.
    pub fn into_reader(self) -> LogReader<InMemoryStore> {
        self.reader
    }
}

impl Default for LogFixture {
    fn default() -> Self {
        Self::new(10)
    }
}
