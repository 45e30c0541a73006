//! # driftlog Storage
//!
//! Ordered key-value store capability for driftlog.
//!
//! This crate is the lowest layer of driftlog. It defines what the read
//! path needs from a storage engine, and nothing more: snapshot iteration
//! in either direction, seek, and prefix validity checks. Stores are
//! **opaque byte maps**; they know nothing about prefixes, offsets or
//! messages.
//!
//! ## Design Principles
//!
//! - Any engine with ordered iteration can implement [`OrderedStore`]
//! - Iterators are scoped: dropping one releases it
//! - Items borrow their iterator and cannot outlive a cursor move
//! - Stores must be `Send + Sync` for concurrent readers
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - `BTreeMap` snapshots, for tests and replicas
//!
//! ## Example
//!
//! ```rust
//! use driftlog_storage::{InMemoryStore, IterOptions, OrderedStore};
//!
//! let store = InMemoryStore::new();
//! store.put(b"k1".to_vec(), b"v1".to_vec());
//!
//! let mut it = store.iter(IterOptions::forward()).unwrap();
//! it.seek(b"k").unwrap();
//! assert!(it.valid_for_prefix(b"k"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use store::{IterOptions, Item, OrderedStore, StoreIterator};
