//! Live collection subscription trait.

use futures_core::Stream;

use crate::Result;
use crate::documents::Snapshot;

/// Live subscription stream over a collection.
///
/// Each item is the full ordered record list; the consumer replaces its
/// local copy wholesale. Dropping the stream releases the subscription.
pub trait Watch: Stream<Item = Result<Snapshot>> + Send {}

impl<T> Watch for T where T: Stream<Item = Result<Snapshot>> + Send {}
