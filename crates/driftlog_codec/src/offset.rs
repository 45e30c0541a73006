//! Message offsets.

use crate::error::{CodecError, CodecResult};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Size of an encoded offset in bytes.
pub const OFFSET_SIZE: usize = 16;

/// Position of a message in a partition log.
///
/// An offset is 16 bytes: an 8-byte big-endian timestamp followed by an
/// 8-byte big-endian index. Offsets compare bytewise, so the order of
/// encoded keys matches the order of offsets.
///
/// [`Offset::NIL`] sorts before every real offset and [`Offset::MAX`]
/// after every real offset.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Offset([u8; OFFSET_SIZE]);

impl Offset {
    /// The start-of-log sentinel.
    pub const NIL: Offset = Offset([0; OFFSET_SIZE]);

    /// The end-of-log sentinel.
    pub const MAX: Offset = Offset([0xFF; OFFSET_SIZE]);

    /// Creates an offset from its timestamp and index components.
    #[must_use]
    pub fn new(timestamp: u64, index: u64) -> Self {
        let mut bytes = [0u8; OFFSET_SIZE];
        bytes[..8].copy_from_slice(&timestamp.to_be_bytes());
        bytes[8..].copy_from_slice(&index.to_be_bytes());
        Self(bytes)
    }

    /// Creates an offset from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; OFFSET_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parses an offset from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not exactly [`OFFSET_SIZE`] long.
    pub fn from_slice(bytes: &[u8]) -> CodecResult<Self> {
        let raw: [u8; OFFSET_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CodecError::InvalidOffsetLength {
                    expected: OFFSET_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(raw))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; OFFSET_SIZE] {
        &self.0
    }

    /// Returns the timestamp component.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(raw)
    }

    /// Returns the index component.
    #[must_use]
    pub fn index(&self) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.0[8..]);
        u64::from_be_bytes(raw)
    }

    /// Returns true if this is the start-of-log sentinel.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Returns true if this offset sorts strictly after `other`.
    #[must_use]
    pub fn after(&self, other: &Offset) -> bool {
        self > other
    }

    /// Returns true if this offset sorts strictly before `other`.
    #[must_use]
    pub fn before(&self, other: &Offset) -> bool {
        self < other
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::NIL
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offset({self})")
    }
}

impl Serialize for Offset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Offset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OffsetVisitor;

        impl Visitor<'_> for OffsetVisitor {
            type Value = Offset;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a {OFFSET_SIZE}-byte offset")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Offset, E> {
                Offset::from_slice(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_bytes(OffsetVisitor)
    }
}
