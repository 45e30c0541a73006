//! Log messages.

use crate::error::{CodecError, CodecResult};
use crate::offset::Offset;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A record of a partition log.
///
/// Messages are stored twice: once in the view keyspace under their
/// [`Offset`], and once in the write-ahead log under their `index`.
/// Both copies carry the same encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Topic the message belongs to.
    pub topic: String,
    /// Partition within the topic.
    pub partition: String,
    /// Position in the partition log.
    pub offset: Offset,
    /// Write-ahead log index (monotonically increasing per partition).
    pub index: u64,
    /// Optional routing key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Bytes>,
    /// Message payload.
    pub value: Bytes,
}

impl Message {
    /// Creates a message without a routing key.
    pub fn new(
        topic: impl Into<String>,
        partition: impl Into<String>,
        offset: Offset,
        index: u64,
        value: impl Into<Bytes>,
    ) -> Self {
        Self {
            topic: topic.into(),
            partition: partition.into(),
            offset,
            index,
            key: None,
            value: value.into(),
        }
    }

    /// Sets the routing key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Bytes>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Encodes to CBOR bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(64 + self.value.len());
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
        Ok(buf)
    }

    /// Decodes from CBOR bytes.
    ///
    /// The input must hold exactly one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid message or if bytes
    /// remain after it.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        let mut reader = bytes;
        let message: Message = ciborium::from_reader(&mut reader)
            .map_err(|e| CodecError::decoding_failed(e.to_string()))?;
        if !reader.is_empty() {
            return Err(CodecError::TrailingBytes {
                count: reader.len(),
            });
        }
        Ok(message)
    }
}
