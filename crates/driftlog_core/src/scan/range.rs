//! Offset range reads over the message log.

use super::{LogReader, MessageIterator, ScanSummary, Visit};
use crate::error::CoreError;
use driftlog_codec::{Message, Offset};
use driftlog_storage::OrderedStore;
use tracing::debug;

impl<S: OrderedStore> LogReader<S> {
    /// Visits every message of the log in ascending offset order.
    ///
    /// Equivalent to `for_range(Offset::NIL, Offset::MAX, visit)`.
    ///
    /// # Errors
    ///
    /// See [`for_range`](Self::for_range).
    pub fn for_each<F, E>(&self, visit: F) -> Result<ScanSummary, E>
    where
        F: FnMut(Message) -> Result<Visit, E>,
        E: From<CoreError>,
    {
        self.for_range(Offset::NIL, Offset::MAX, visit)
    }

    /// Visits, in ascending offset order, every message whose offset lies in
    /// `[min, max]`.
    ///
    /// `min == Offset::NIL` starts at the first message. The scan stops at
    /// the first message whose offset is after `max`, without visiting it.
    ///
    /// # Errors
    ///
    /// - store failures and undecodable messages, as `E::from(CoreError)`
    /// - the first error returned by `visit`, unchanged
    pub fn for_range<F, E>(&self, min: Offset, max: Offset, mut visit: F) -> Result<ScanSummary, E>
    where
        F: FnMut(Message) -> Result<Visit, E>,
        E: From<CoreError>,
    {
        let mut it = MessageIterator::new(&self.store)?;
        if min.is_nil() {
            it.rewind()?;
        } else {
            it.seek(&min)?;
        }

        let mut summary = ScanSummary::default();
        while let Some(message) = it.take_message() {
            if message.offset.after(&max) {
                break;
            }
            if !summary.record(visit(message)?) {
                break;
            }
            it.next()?;
        }

        debug!(%min, %max, visited = summary.visited, stopped = summary.stopped, "range scan finished");
        Ok(summary)
    }
}
