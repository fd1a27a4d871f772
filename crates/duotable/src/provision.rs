//! Table provisioning.
//!
//! Creates the (partition, range) key schema for a table when it does
//! not exist yet. `ensure_table` is idempotent per call: it describes
//! the table first and only creates on absence. There is no
//! process-global "initialized" flag and no distributed coordination,
//! so concurrent first-time creation from several processes can still
//! race; DynamoDB resolves that race with `ResourceInUseException`,
//! which callers may treat as another process having won.

use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;

use duotable_core::{Result, TableError};

use crate::error::map_create_table_error;

/// Scalar type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    String,
    Number,
    Binary,
}

impl KeyKind {
    fn scalar_type(self) -> ScalarAttributeType {
        match self {
            KeyKind::String => ScalarAttributeType::S,
            KeyKind::Number => ScalarAttributeType::N,
            KeyKind::Binary => ScalarAttributeType::B,
        }
    }
}

/// Name and type of one key attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub name: String,
    pub kind: KeyKind,
}

impl KeyDefinition {
    pub fn new(name: impl Into<String>, kind: KeyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Declared key schema for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub partition: KeyDefinition,
    pub range: KeyDefinition,
}

impl TableSchema {
    pub fn new(
        table_name: impl Into<String>,
        partition: KeyDefinition,
        range: KeyDefinition,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            partition,
            range,
        }
    }
}

fn schema_error(err: impl std::fmt::Display) -> TableError {
    TableError::store("Table", "provision", err)
}

fn key_schema(schema: &TableSchema) -> Result<Vec<KeySchemaElement>> {
    Ok(vec![
        KeySchemaElement::builder()
            .attribute_name(&schema.partition.name)
            .key_type(KeyType::Hash)
            .build()
            .map_err(schema_error)?,
        KeySchemaElement::builder()
            .attribute_name(&schema.range.name)
            .key_type(KeyType::Range)
            .build()
            .map_err(schema_error)?,
    ])
}

fn attribute_definitions(schema: &TableSchema) -> Result<Vec<AttributeDefinition>> {
    Ok(vec![
        AttributeDefinition::builder()
            .attribute_name(&schema.partition.name)
            .attribute_type(schema.partition.kind.scalar_type())
            .build()
            .map_err(schema_error)?,
        AttributeDefinition::builder()
            .attribute_name(&schema.range.name)
            .attribute_type(schema.range.kind.scalar_type())
            .build()
            .map_err(schema_error)?,
    ])
}

/// Returns whether the table exists.
pub async fn table_exists(client: &Client, table_name: &str) -> Result<bool> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => Ok(true),
        Err(err) => match err.into_service_error() {
            DescribeTableError::ResourceNotFoundException(_) => Ok(false),
            err => Err(TableError::store(
                "Table",
                "describe",
                format!("DescribeTable failed for {table_name}: {err:?}"),
            )),
        },
    }
}

/// Creates the table if it does not exist, on-demand billing.
///
/// Returns `true` when this call created the table, `false` when it
/// already existed.
pub async fn ensure_table(client: &Client, schema: &TableSchema) -> Result<bool> {
    if table_exists(client, &schema.table_name).await? {
        tracing::debug!(table = %schema.table_name, "table already exists");
        return Ok(false);
    }

    client
        .create_table()
        .table_name(&schema.table_name)
        .set_key_schema(Some(key_schema(schema)?))
        .set_attribute_definitions(Some(attribute_definitions(schema)?))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(|e| map_create_table_error(e, &schema.table_name))?;

    tracing::info!(table = %schema.table_name, "table created");
    Ok(true)
}
