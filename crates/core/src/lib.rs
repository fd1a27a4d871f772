//! Generic CRUD services over a remote (partition key, range key) store.
//!
//! The store offers only single-item put/get/query/delete, with no
//! multi-item transactions. [`TableService`] wraps one table with plain
//! CRUD; [`IndexedTableService`] keeps a primary data table and a
//! keys-only index table consistent using ordered writes, bounded
//! retries, and a compensating index delete, and reports divergence
//! loudly instead of hiding it.
//!
//! Record types participate through the small capability traits in
//! [`record`]; store backends plug in through [`store::RecordStore`].
//! The `inmemory` feature (default) ships [`MemoryTable`] for tests.

pub mod error;
pub mod record;
pub mod retry;
pub mod service;
pub mod store;

#[cfg(feature = "inmemory")]
pub mod memory;

pub use error::{key_display, Result, TableError};
pub use record::{IndexEntry, IndexedRecord, TableKey, TableRecord};
pub use retry::{IndexUpdatePolicy, IndexedConfig, RetryPolicy};
pub use service::{IndexedTableCrud, IndexedTableService, TableCrud, TableService};
pub use store::RecordStore;

#[cfg(feature = "inmemory")]
pub use memory::MemoryTable;
