//! # driftlog Codec
//!
//! Message and offset wire format for driftlog.
//!
//! This crate provides:
//! - [`Offset`]: the 16-byte, bytewise-ordered position of a message
//! - [`Message`]: the decoded log record
//! - CBOR encoding/decoding of messages via `serde` and `ciborium`
//!
//! The storage layer treats offsets as opaque: it compares them and reads
//! them back from stored bytes, nothing more.
//!
//! ## Usage
//!
//! ```
//! use driftlog_codec::{Message, Offset};
//!
//! let message = Message::new("events", "p0", Offset::new(1, 1), 1, &b"hello"[..]);
//! let bytes = message.encode().unwrap();
//! assert_eq!(Message::decode(&bytes).unwrap(), message);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod message;
mod offset;

pub use error::{CodecError, CodecResult};
pub use message::Message;
pub use offset::{Offset, OFFSET_SIZE};
