//! # driftlog Core
//!
//! Read path of the driftlog message log.
//!
//! This crate provides:
//! - The key-space layout: pending, view and WAL prefixes ([`keyspace`])
//! - Last-key lookups under a prefix, with optional suffix filtering
//! - Offset range reads over the message log
//! - WAL tailing for replicas, by key or by index range
//! - Bounded catch-up batches built on the WAL tailer
//!
//! ## Design Principles
//!
//! - Works against any [`OrderedStore`](driftlog_storage::OrderedStore)
//! - Every scan owns its iterator and releases it before returning
//! - Visitors steer scans with [`Visit`]; their errors come back unchanged
//! - No writes, no locks, no background work
//!
//! ## Example
//!
//! ```rust
//! use driftlog_codec::{Message, Offset};
//! use driftlog_core::{keyspace, CoreError, LogReader, Visit};
//! use driftlog_storage::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! for i in 1..=3u64 {
//!     let msg = Message::new("orders", "0", Offset::new(100, i), i, vec![i as u8]);
//!     store.put(keyspace::wal_key(i), msg.encode().unwrap());
//! }
//!
//! let reader = LogReader::new(store);
//! let mut tail = Vec::new();
//! reader
//!     .for_range_wal(1, 0, |msg| {
//!         tail.push(msg.index);
//!         Ok::<_, CoreError>(Visit::Continue)
//!     })
//!     .unwrap();
//! assert_eq!(tail, vec![2, 3]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catchup;
mod config;
mod error;
pub mod keyspace;
mod scan;

pub use catchup::{CatchupBatch, WalCatchup};
pub use config::CatchupConfig;
pub use error::{CoreError, CoreResult};
pub use scan::{LogReader, MessageIterator, ScanSummary, Visit};
