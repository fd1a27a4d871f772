//! DynamoDB store handle.

use std::marker::PhantomData;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use duotable_core::{key_display, RecordStore, Result};

use crate::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
};
use crate::record::{apply_version, DynamoRecord, KeyAttribute};

/// One DynamoDB table, addressed through a shared `Client`.
///
/// The client is created once and reused for every call; cloning the
/// handle clones the client cheaply. An indexed service takes two
/// handles built from the same client, one per table.
#[derive(Debug, Clone)]
pub struct DynamoTable<T> {
    client: Client,
    table_name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> DynamoTable<T> {
    /// Creates a handle for the given table.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            _record: PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl<T> RecordStore<T> for DynamoTable<T>
where
    T: DynamoRecord,
    T::Partition: KeyAttribute,
    T::Range: KeyAttribute,
{
    async fn put(&self, record: &T) -> Result<()> {
        let mut item = record.to_item()?;
        apply_version(&mut item, record.version());
        let key = key_display(&record.partition_key(), &record.range_key());

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, T::ENTITY, key))?;

        Ok(())
    }

    async fn get(&self, partition: &T::Partition, range: &T::Range) -> Result<Option<T>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(T::partition_attribute(), partition.to_attribute_value())
            .key(T::range_attribute(), range.to_attribute_value())
            .send()
            .await
            .map_err(|e| map_get_item_error(e, T::ENTITY, key_display(partition, range)))?;

        match result.item {
            Some(item) => Ok(Some(T::from_item(&item)?)),
            None => Ok(None),
        }
    }

    async fn query(&self, partition: &T::Partition) -> Result<Vec<T>> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", T::partition_attribute())
            .expression_attribute_values(":pk", partition.to_attribute_value())
            .send()
            .await
            .map_err(|e| map_query_error(e, T::ENTITY))?;

        let items = result.items.unwrap_or_default();
        items.iter().map(T::from_item).collect()
    }

    async fn delete(&self, partition: &T::Partition, range: &T::Range) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(T::partition_attribute(), partition.to_attribute_value())
            .key(T::range_attribute(), range.to_attribute_value())
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, T::ENTITY, key_display(partition, range)))?;

        Ok(())
    }
}
