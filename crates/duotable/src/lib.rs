//! DynamoDB backend for the `duotable_core` table services.
//!
//! A [`DynamoTable`] implements `duotable_core::RecordStore` for any
//! record type that maps itself to items via [`DynamoRecord`]. Build
//! one client through [`StoreConfig`], wrap a handle per table, and
//! hand the handles to `TableService` or `IndexedTableService`:
//!
//! ```no_run
//! use duotable::{DynamoTable, StoreConfig};
//! use duotable_core::IndexedTableService;
//! # use duotable_core::{IndexedRecord, TableRecord};
//! # #[derive(Clone)] struct Track;
//! # #[derive(Clone)] struct TrackIndex;
//! # impl TableRecord for Track {
//! #     type Partition = String;
//! #     type Range = String;
//! #     const ENTITY: &'static str = "Track";
//! #     fn partition_key(&self) -> String { unimplemented!() }
//! #     fn range_key(&self) -> String { unimplemented!() }
//! # }
//! # impl TableRecord for TrackIndex {
//! #     type Partition = String;
//! #     type Range = String;
//! #     const ENTITY: &'static str = "TrackIndex";
//! #     fn partition_key(&self) -> String { unimplemented!() }
//! #     fn range_key(&self) -> String { unimplemented!() }
//! # }
//! # impl IndexedRecord for Track {
//! #     type Index = TrackIndex;
//! #     fn to_index(&self) -> TrackIndex { TrackIndex }
//! # }
//! # impl duotable::DynamoRecord for Track {
//! #     fn partition_attribute() -> &'static str { "Artist" }
//! #     fn range_attribute() -> &'static str { "Title" }
//! #     fn to_item(&self) -> duotable_core::Result<duotable::Item> { unimplemented!() }
//! #     fn from_item(_: &duotable::Item) -> duotable_core::Result<Self> { unimplemented!() }
//! # }
//! # impl duotable::DynamoRecord for TrackIndex {
//! #     fn partition_attribute() -> &'static str { "Artist" }
//! #     fn range_attribute() -> &'static str { "Title" }
//! #     fn to_item(&self) -> duotable_core::Result<duotable::Item> { unimplemented!() }
//! #     fn from_item(_: &duotable::Item) -> duotable_core::Result<Self> { unimplemented!() }
//! # }
//! #
//! # #[tokio::main]
//! # async fn main() {
//! let client = StoreConfig::default().connect().await;
//! let data = DynamoTable::<Track>::new(client.clone(), "tracks");
//! let index = DynamoTable::<TrackIndex>::new(client, "tracks-index");
//! let service: IndexedTableService<Track, _, _> = IndexedTableService::new(data, index);
//! # let _ = service;
//! # }
//! ```
//!
//! Provisioning ([`ensure_table`]) is separate from the services and
//! idempotent per call; production deployments may prefer to leave it
//! to infrastructure-as-code entirely.

mod config;
mod error;
mod provision;
mod record;
mod store;

pub use config::StoreConfig;
pub use provision::{ensure_table, table_exists, KeyDefinition, KeyKind, TableSchema};
pub use record::{
    get_number, get_string, get_uuid, DynamoRecord, Item, KeyAttribute, VERSION_ATTRIBUTE,
};
pub use store::DynamoTable;
