//! Item mapping for DynamoDB-backed records.
//!
//! Conversions between records and `AttributeValue` maps are explicit,
//! statically-typed functions supplied by the record type; no
//! reflection, no dynamic field assignment. The helper getters keep
//! `from_item` implementations short and give uniform error context.

use std::collections::HashMap;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;
use uuid::Uuid;

use duotable_core::{Result, TableError, TableKey, TableRecord};

/// A DynamoDB item.
pub type Item = HashMap<String, AttributeValue>;

/// Attribute name under which a record's declared version is written.
///
/// The store's optimistic-lock mechanism owns this attribute; this
/// layer only persists it.
pub const VERSION_ATTRIBUTE: &str = "VersionNumber";

/// Key types that map onto a DynamoDB scalar key attribute.
pub trait KeyAttribute: TableKey {
    fn to_attribute_value(&self) -> AttributeValue;
}

impl KeyAttribute for String {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::S(self.clone())
    }
}

impl KeyAttribute for Uuid {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::S(self.to_string())
    }
}

impl KeyAttribute for &'static str {
    fn to_attribute_value(&self) -> AttributeValue {
        AttributeValue::S((*self).to_string())
    }
}

macro_rules! numeric_key_attribute {
    ($($ty:ty),*) => {
        $(
            impl KeyAttribute for $ty {
                fn to_attribute_value(&self) -> AttributeValue {
                    AttributeValue::N(self.to_string())
                }
            }
        )*
    };
}

numeric_key_attribute!(i32, i64, u32, u64);

/// A record that knows its DynamoDB table layout.
///
/// `to_item` and `from_item` must round-trip; the key attributes must
/// appear in the item under the declared names, matching the table's
/// key schema.
pub trait DynamoRecord: TableRecord
where
    Self::Partition: KeyAttribute,
    Self::Range: KeyAttribute,
{
    /// Name of the partition (hash) key attribute.
    fn partition_attribute() -> &'static str;

    /// Name of the range (sort) key attribute.
    fn range_attribute() -> &'static str;

    fn to_item(&self) -> Result<Item>;

    fn from_item(item: &Item) -> Result<Self>;
}

/// Writes the declared version under [`VERSION_ATTRIBUTE`] unless the
/// record's own `to_item` already did.
pub(crate) fn apply_version(item: &mut Item, version: Option<i64>) {
    if let Some(version) = version {
        item.entry(VERSION_ATTRIBUTE.to_string())
            .or_insert_with(|| AttributeValue::N(version.to_string()));
    }
}

fn missing(attribute: &str) -> TableError {
    TableError::InvalidRecord(format!("missing or mistyped attribute: {attribute}"))
}

/// Reads a string attribute.
pub fn get_string(item: &Item, attribute: &str) -> Result<String> {
    item.get(attribute)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| missing(attribute))
}

/// Reads a numeric attribute and parses it into `T`.
pub fn get_number<T: FromStr>(item: &Item, attribute: &str) -> Result<T> {
    item.get(attribute)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| missing(attribute))
}

/// Reads a string attribute and parses it as a UUID.
pub fn get_uuid(item: &Item, attribute: &str) -> Result<Uuid> {
    let raw = get_string(item, attribute)?;
    Uuid::parse_str(&raw)
        .map_err(|e| TableError::InvalidRecord(format!("attribute {attribute} is not a UUID: {e}")))
}
