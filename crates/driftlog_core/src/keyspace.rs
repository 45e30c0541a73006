//! Key-space layout.
//!
//! One flat ordered keyspace holds three logical stores, each under a
//! 2-byte [`Prefix`] (a version byte followed by a tag):
//!
//! | prefix              | body                              |
//! |---------------------|-----------------------------------|
//! | [`Prefix::PENDING`] | composite consumer key            |
//! | [`Prefix::VIEW`]    | 16-byte message [`Offset`]        |
//! | [`Prefix::WAL`]     | 8-byte big-endian WAL index       |
//!
//! Keys are `prefix ++ SEPARATOR ++ body`. Bodies are encoded so that byte
//! order matches the order of what they encode.

use driftlog_codec::Offset;
use std::fmt;

/// Byte sequence placed between key parts.
pub const SEPARATOR: &[u8] = b"|";

/// Length of an encoded WAL index.
pub const WAL_INDEX_SIZE: usize = 8;

const KEY_VERSION: u8 = 1;

/// A 2-byte key-space tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix([u8; 2]);

impl Prefix {
    /// Consumer pending/acknowledgement entries.
    pub const PENDING: Prefix = Prefix([KEY_VERSION, b'p']);

    /// The message log, keyed by offset.
    pub const VIEW: Prefix = Prefix([KEY_VERSION, b'v']);

    /// The write-ahead log, keyed by index.
    pub const WAL: Prefix = Prefix([KEY_VERSION, b'w']);

    /// Returns the tag bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Composes `self ++ SEPARATOR ++ body`.
    #[must_use]
    pub fn key(&self, body: &[u8]) -> Vec<u8> {
        compose_key(&self.0, body)
    }

    /// Returns the body of `key` if it belongs to this prefix.
    #[must_use]
    pub fn strip<'a>(&self, key: &'a [u8]) -> Option<&'a [u8]> {
        key.strip_prefix(self.as_bytes())?.strip_prefix(SEPARATOR)
    }
}

impl AsRef<[u8]> for Prefix {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({}, {:?})", self.0[0], char::from(self.0[1]))
    }
}

/// Composes `prefix ++ SEPARATOR ++ body`.
#[must_use]
pub fn compose_key(prefix: &[u8], body: &[u8]) -> Vec<u8> {
    [prefix, body].join(SEPARATOR)
}

/// Composes `prefix ++ SEPARATOR ++ parts[0] ++ SEPARATOR ++ parts[1] ...`.
///
/// Used for composite bodies such as consumer keys.
#[must_use]
pub fn compose_parts(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len() + SEPARATOR.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(prefix);
    for part in parts {
        key.extend_from_slice(SEPARATOR);
        key.extend_from_slice(part);
    }
    key
}

/// Returns the WAL key for `index`.
#[must_use]
pub fn wal_key(index: u64) -> Vec<u8> {
    Prefix::WAL.key(&index.to_be_bytes())
}

/// Decodes the index from a WAL key.
///
/// Returns `None` if `key` is not a well-formed WAL key.
#[must_use]
pub fn decode_wal_index(key: &[u8]) -> Option<u64> {
    let body: [u8; WAL_INDEX_SIZE] = Prefix::WAL.strip(key)?.try_into().ok()?;
    Some(u64::from_be_bytes(body))
}

/// Returns the view key for `offset`.
#[must_use]
pub fn view_key(offset: &Offset) -> Vec<u8> {
    Prefix::VIEW.key(offset.as_bytes())
}

/// Decodes the offset from a view key.
///
/// Returns `None` if `key` is not a well-formed view key.
#[must_use]
pub fn decode_view_offset(key: &[u8]) -> Option<Offset> {
    Offset::from_slice(Prefix::VIEW.strip(key)?).ok()
}

/// Returns the smallest key greater than every key starting with `prefix`.
///
/// Trailing `0xFF` bytes are dropped and the last remaining byte is
/// incremented. Returns `None` when no such key exists (empty prefix, or a
/// prefix made only of `0xFF`), in which case the prefix range extends to
/// the end of the keyspace.
#[must_use]
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&b| b != 0xFF)?;
    let mut successor = prefix[..=last].to_vec();
    successor[last] += 1;
    Some(successor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_tags_are_bit_exact() {
        assert_eq!(Prefix::PENDING.as_bytes(), &[0x01, b'p']);
        assert_eq!(Prefix::VIEW.as_bytes(), &[0x01, b'v']);
        assert_eq!(Prefix::WAL.as_bytes(), &[0x01, b'w']);
    }

    #[test]
    fn compose_key_inserts_separator() {
        assert_eq!(compose_key(b"ab", b"cd"), b"ab|cd".to_vec());
        assert_eq!(compose_key(b"ab", b""), b"ab|".to_vec());
    }

    #[test]
    fn compose_parts_joins_every_part() {
        let parts = [b"group".as_slice(), b"c1".as_slice(), b"7".as_slice()];
        let key = compose_parts(Prefix::PENDING.as_bytes(), &parts);
        assert_eq!(key, b"\x01p|group|c1|7".to_vec());
        assert_eq!(compose_parts(b"x", &[]), b"x".to_vec());
    }

    #[test]
    fn wal_key_layout() {
        let key = wal_key(0x0102);
        assert_eq!(key, vec![0x01, b'w', b'|', 0, 0, 0, 0, 0, 0, 0x01, 0x02]);
        assert_eq!(decode_wal_index(&key), Some(0x0102));
    }

    #[test]
    fn wal_keys_sort_numerically() {
        let indexes = [1u64, 2, 255, 256, 65_536, u64::MAX];
        for pair in indexes.windows(2) {
            assert!(wal_key(pair[0]) < wal_key(pair[1]));
        }
    }

    #[test]
    fn decode_wal_index_rejects_foreign_keys() {
        assert_eq!(decode_wal_index(&view_key(&Offset::new(1, 1))), None);
        assert_eq!(decode_wal_index(b"\x01w|short"), None);
        assert_eq!(decode_wal_index(b"\x01w"), None);
    }

    #[test]
    fn view_key_roundtrip() {
        let offset = Offset::new(9, 4);
        assert_eq!(decode_view_offset(&view_key(&offset)), Some(offset));
        assert_eq!(decode_view_offset(&wal_key(1)), None);
    }

    #[test]
    fn strip_requires_separator() {
        assert_eq!(Prefix::WAL.strip(b"\x01w|abc"), Some(&b"abc"[..]));
        assert_eq!(Prefix::WAL.strip(b"\x01wabc"), None);
        assert_eq!(Prefix::WAL.strip(b"\x01v|abc"), None);
    }

    #[test]
    fn successor_increments_last_byte() {
        assert_eq!(prefix_successor(b"ab"), Some(b"ac".to_vec()));
        assert_eq!(prefix_successor(&[0x01, b'w']), Some(vec![0x01, b'x']));
    }

    #[test]
    fn successor_drops_trailing_ff() {
        assert_eq!(prefix_successor(&[0x01, 0xFF, 0xFF]), Some(vec![0x02]));
        assert_eq!(prefix_successor(&[0xFF, 0xFF]), None);
        assert_eq!(prefix_successor(&[]), None);
    }

    #[test]
    fn successor_is_above_every_extension() {
        let prefix = [0x01, b'p'];
        let successor = prefix_successor(&prefix).unwrap();
        let longest = compose_parts(&prefix, &[[0xFF; 32].as_slice()]);
        assert!(longest.as_slice() < successor.as_slice());
        assert!(prefix.as_slice() < successor.as_slice());
    }
}
