//! Property-based test generators using proptest.
//!
//! Key strategies draw from a small alphabet that includes `0x00` and
//! `0xFF`, so generated prefixes collide often and hit the edges of
//! prefix-successor arithmetic.

use driftlog_codec::{Message, Offset};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use std::collections::BTreeSet;

const KEY_ALPHABET: &[u8] = &[0x00, 0x01, b'a', b'b', 0xFE, 0xFF];

/// Strategy for a single key byte from the edge-heavy alphabet.
pub fn key_byte_strategy() -> impl Strategy<Value = u8> {
    prop::sample::select(KEY_ALPHABET)
}

/// Strategy for keys of up to `max_len` bytes.
pub fn key_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(key_byte_strategy(), 0..=max_len)
}

/// Strategy for a populated keyspace.
pub fn key_set_strategy() -> impl Strategy<Value = BTreeSet<Vec<u8>>> {
    btree_set(key_strategy(5), 0..40)
}

/// Strategy for search prefixes (possibly empty).
pub fn prefix_strategy() -> impl Strategy<Value = Vec<u8>> {
    key_strategy(3)
}

/// Strategy for arbitrary offsets.
pub fn offset_strategy() -> impl Strategy<Value = Offset> {
    (any::<u64>(), any::<u64>()).prop_map(|(ts, index)| Offset::new(ts, index))
}

/// Strategy for distinct, sorted offsets.
pub fn offset_set_strategy() -> impl Strategy<Value = BTreeSet<Offset>> {
    // Narrow ranges so that ranges drawn by tests overlap the set.
    btree_set(
        (0u64..8, 0u64..8).prop_map(|(ts, index)| Offset::new(ts, index)),
        0..30,
    )
}

/// Strategy for messages with arbitrary content.
pub fn message_strategy() -> impl Strategy<Value = Message> {
    (
        "[a-z]{1,12}",
        "[0-9]{1,3}",
        offset_strategy(),
        any::<u64>(),
        prop::option::of(vec(any::<u8>(), 0..16)),
        vec(any::<u8>(), 0..256),
    )
        .prop_map(|(topic, partition, offset, index, key, value)| {
            let message = Message::new(topic, partition, offset, index, value);
            match key {
                Some(key) => message.with_key(key),
                None => message,
            }
        })
}

/// Strategy for a set of WAL indexes, all non-zero.
pub fn wal_indexes_strategy() -> impl Strategy<Value = BTreeSet<u64>> {
    btree_set(1u64..200, 0..40)
}
