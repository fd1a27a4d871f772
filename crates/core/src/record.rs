//! Record capability contracts.
//!
//! A type participates in a table service by exposing its keys through
//! [`TableRecord`]; a type stored alongside a keys-only index table
//! additionally implements [`IndexedRecord`]. These are small capability
//! traits, not base classes: any concrete representation that can hand
//! out its keys qualifies.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Marker for key attribute types.
///
/// `Display` feeds human-readable error and log context; `Eq + Hash`
/// let the in-memory store address items without extra bounds at the
/// call sites.
pub trait TableKey: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<K> TableKey for K where K: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// A record addressable by a (partition key, range key) pair.
///
/// Identity is the key pair; both keys are immutable for the lifetime
/// of the record.
pub trait TableRecord: Clone + Send + Sync + 'static {
    /// Attribute type used to partition the table.
    type Partition: TableKey;

    /// Attribute type used to order and identify records within a partition.
    type Range: TableKey;

    /// Human-readable entity kind, used for error and log context.
    const ENTITY: &'static str;

    fn partition_key(&self) -> Self::Partition;

    fn range_key(&self) -> Self::Range;

    /// Monotonic version attribute enforced by the store's own
    /// optimistic-lock mechanism. Declared here so backends can persist
    /// it; this layer never interprets or bumps it.
    fn version(&self) -> Option<i64> {
        None
    }
}

/// A data record that derives a keys-only index representation.
pub trait IndexedRecord: TableRecord {
    /// The index-table representation. It must share the data record's
    /// key pair so the two tables stay addressable by the same keys.
    type Index: TableRecord<Partition = Self::Partition, Range = Self::Range>;

    /// Derives the index record. Must be pure and deterministic: no
    /// side effects, no store access.
    fn to_index(&self) -> Self::Index;
}

/// Minimal index record holding only the key pair.
///
/// The common choice for [`IndexedRecord::Index`]: one `IndexEntry`
/// marks the existence of exactly one data record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry<P, R> {
    pub partition: P,
    pub range: R,
}

impl<P, R> IndexEntry<P, R> {
    pub fn new(partition: P, range: R) -> Self {
        Self { partition, range }
    }
}

impl<P: TableKey, R: TableKey> TableRecord for IndexEntry<P, R> {
    type Partition = P;
    type Range = R;

    const ENTITY: &'static str = "IndexEntry";

    fn partition_key(&self) -> P {
        self.partition.clone()
    }

    fn range_key(&self) -> R {
        self.range.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        owner: String,
        id: u64,
        body: String,
    }

    impl TableRecord for Note {
        type Partition = String;
        type Range = u64;

        const ENTITY: &'static str = "Note";

        fn partition_key(&self) -> String {
            self.owner.clone()
        }

        fn range_key(&self) -> u64 {
            self.id
        }
    }

    impl IndexedRecord for Note {
        type Index = IndexEntry<String, u64>;

        fn to_index(&self) -> Self::Index {
            IndexEntry::new(self.partition_key(), self.range_key())
        }
    }

    #[test]
    fn index_derivation_preserves_the_key_pair() {
        let note = Note {
            owner: "ada".to_string(),
            id: 7,
            body: "hello".to_string(),
        };

        let index = note.to_index();

        assert_eq!(index.partition_key(), note.partition_key());
        assert_eq!(index.range_key(), note.range_key());
    }

    #[test]
    fn index_derivation_is_deterministic() {
        let note = Note {
            owner: "ada".to_string(),
            id: 7,
            body: "hello".to_string(),
        };

        assert_eq!(note.to_index(), note.to_index());
    }

    #[test]
    fn version_defaults_to_none() {
        let note = Note {
            owner: "ada".to_string(),
            id: 7,
            body: "hello".to_string(),
        };

        assert_eq!(note.version(), None);
    }
}
