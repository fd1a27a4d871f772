//! Single-table service: no secondary index, no compensation.

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::{Result, TableError};
use crate::record::TableRecord;
use crate::service::TableCrud;
use crate::store::RecordStore;

/// CRUD for one table. Every operation is a single store call; failures
/// surface to the caller unchanged. Retry logic belongs to the indexed
/// sibling, where partial writes have to be repaired.
#[derive(Debug, Clone)]
pub struct TableService<T, S> {
    store: S,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> TableService<T, S> {
    /// Creates a service over a store handle. The handle is kept for
    /// the lifetime of the service and shared read-only across calls.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T, S> TableCrud<T> for TableService<T, S>
where
    T: TableRecord,
    S: RecordStore<T>,
{
    async fn create(&self, record: &T) -> Result<T::Range> {
        self.store.put(record).await?;
        Ok(record.range_key())
    }

    async fn read(&self, partition: &T::Partition, range: &T::Range) -> Result<T> {
        match self.store.get(partition, range).await? {
            Some(record) => Ok(record),
            None => Err(TableError::not_found(T::ENTITY, partition, range)),
        }
    }

    async fn read_partition(&self, partition: &T::Partition) -> Result<Vec<T>> {
        self.store.query(partition).await
    }

    async fn update(&self, _record: &T) -> Result<()> {
        Err(TableError::Unimplemented("update"))
    }

    async fn delete(&self, partition: &T::Partition, range: &T::Range) -> Result<()> {
        self.store.delete(partition, range).await
    }
}
