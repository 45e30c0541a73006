//! # driftlog Testkit
//!
//! Test utilities for driftlog.
//!
//! This crate provides:
//! - Prebuilt logs with known content ([`fixtures`])
//! - Property-based test generators using proptest ([`generators`])
//! - Store fault injection ([`faults`])
//!
//! ## Usage
//!
//! ```rust
//! use driftlog_core::{CoreError, Visit};
//! use driftlog_testkit::prelude::*;
//!
//! let fixture = LogFixture::new(5);
//! let mut seen = 0;
//! fixture
//!     .reader()
//!     .for_each(|_msg| {
//!         seen += 1;
//!         Ok::<_, CoreError>(Visit::Continue)
//!     })
//!     .unwrap();
//! assert_eq!(seen, 5);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faults;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faults::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use faults::FaultyStore;
pub use fixtures::LogFixture;
