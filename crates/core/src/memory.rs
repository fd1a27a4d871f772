//! In-memory store backend for testing.
//!
//! Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
//! Data is not persisted and is lost when the last clone is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::record::TableRecord;
use crate::store::RecordStore;

/// One in-memory table; clones share the same underlying map.
#[derive(Debug)]
pub struct MemoryTable<T: TableRecord> {
    items: Arc<RwLock<HashMap<(T::Partition, T::Range), T>>>,
}

impl<T: TableRecord> Clone for MemoryTable<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: TableRecord> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableRecord> MemoryTable<T> {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of items currently stored.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// True when an item exists for the key pair.
    pub async fn contains(&self, partition: &T::Partition, range: &T::Range) -> bool {
        self.items
            .read()
            .await
            .contains_key(&(partition.clone(), range.clone()))
    }
}

#[async_trait]
impl<T: TableRecord> RecordStore<T> for MemoryTable<T> {
    async fn put(&self, record: &T) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert((record.partition_key(), record.range_key()), record.clone());
        Ok(())
    }

    async fn get(&self, partition: &T::Partition, range: &T::Range) -> Result<Option<T>> {
        let items = self.items.read().await;
        Ok(items.get(&(partition.clone(), range.clone())).cloned())
    }

    async fn query(&self, partition: &T::Partition) -> Result<Vec<T>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|record| record.partition_key() == *partition)
            .cloned()
            .collect())
    }

    async fn delete(&self, partition: &T::Partition, range: &T::Range) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(&(partition.clone(), range.clone()));
        Ok(())
    }
}
