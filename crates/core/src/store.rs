//! The store seam.
//!
//! A [`RecordStore`] handle addresses exactly one remote table and
//! offers only single-item operations; it gives no cross-table
//! atomicity. The services in this crate build everything else on top
//! of that contract. Handles are created once per service and shared
//! read-only, so they are safe for concurrent use exactly insofar as
//! the underlying client is.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::TableRecord;

/// Single-table, single-item access to a remote keyed store.
#[async_trait]
pub trait RecordStore<T: TableRecord>: Send + Sync {
    /// Writes the record, replacing any item with the same key pair.
    async fn put(&self, record: &T) -> Result<()>;

    /// Loads a single item. `Ok(None)` means the key pair is absent,
    /// which callers must keep distinguishable from transport failure.
    async fn get(&self, partition: &T::Partition, range: &T::Range) -> Result<Option<T>>;

    /// Returns every item in the partition, in store-native order.
    async fn query(&self, partition: &T::Partition) -> Result<Vec<T>>;

    /// Deletes a single item. Deleting an absent key pair succeeds.
    async fn delete(&self, partition: &T::Partition, range: &T::Range) -> Result<()>;
}
