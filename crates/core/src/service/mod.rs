//! Table services.
//!
//! [`TableService`] covers CRUD for a single table. [`IndexedTableService`]
//! keeps a (data table, index table) pair consistent without cross-table
//! transactions, using ordered writes, bounded retries, and a
//! compensating index delete.

mod indexed;
mod simple;

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{IndexedRecord, TableRecord};

pub use indexed::IndexedTableService;
pub use simple::TableService;

/// CRUD over a single table.
#[async_trait]
pub trait TableCrud<T: TableRecord>: Send + Sync {
    /// Writes the record and returns its range key.
    async fn create(&self, record: &T) -> Result<T::Range>;

    /// Loads one record; a missing key pair is `NotFound`, which stays
    /// distinguishable from transport failure.
    async fn read(&self, partition: &T::Partition, range: &T::Range) -> Result<T>;

    /// Returns every record in the partition, in store-native order.
    async fn read_partition(&self, partition: &T::Partition) -> Result<Vec<T>>;

    /// Always fails with [`TableError::Unimplemented`]: updating is a
    /// deliberate contract gap until index-update semantics are settled.
    ///
    /// [`TableError::Unimplemented`]: crate::error::TableError::Unimplemented
    async fn update(&self, record: &T) -> Result<()>;

    /// Deletes one record.
    async fn delete(&self, partition: &T::Partition, range: &T::Range) -> Result<()>;
}

/// CRUD over a (data table, index table) pair.
///
/// Partition listing goes through the index table only; it holds just
/// key pairs, so listing stays cheap regardless of payload size.
#[async_trait]
pub trait IndexedTableCrud<D: IndexedRecord>: Send + Sync {
    /// Writes the index row then the data row, retrying within budget
    /// and rolling the index back if the data write never lands.
    async fn create(&self, record: &D) -> Result<D::Range>;

    /// Loads one data record from the data table.
    async fn read(&self, partition: &D::Partition, range: &D::Range) -> Result<D>;

    /// Lists the partition's index records from the index table.
    async fn read_partition(&self, partition: &D::Partition) -> Result<Vec<D::Index>>;

    /// Always fails with [`TableError::Unimplemented`]; see
    /// [`IndexUpdatePolicy`](crate::retry::IndexUpdatePolicy) for the
    /// unresolved index-update question.
    ///
    /// [`TableError::Unimplemented`]: crate::error::TableError::Unimplemented
    async fn update(&self, record: &D) -> Result<()>;

    /// Deletes the index row then the data row, retrying within budget.
    async fn delete(&self, partition: &D::Partition, range: &D::Range) -> Result<()>;
}
