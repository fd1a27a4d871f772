//! Indexed dual-table service.
//!
//! The store offers no cross-table transactions, so create and delete
//! approximate them with ordered single-item writes: index row first,
//! data row second, bounded retries around each phase, and a
//! compensating index delete when the data write never lands. The
//! invariant being protected: an index row must not outlive the create
//! call without a matching data row, except through the loudly reported
//! `Inconsistent` error.

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::{key_display, Result, TableError};
use crate::record::{IndexedRecord, TableRecord};
use crate::retry::IndexedConfig;
use crate::service::IndexedTableCrud;
use crate::store::RecordStore;

/// CRUD over a (data table, index table) pair.
///
/// Holds one handle per table, created at construction and shared
/// read-only across calls. Concurrent callers racing on the same key
/// pair are arbitrated by the store's own per-item versioning; this
/// layer adds no ordering across callers.
#[derive(Debug, Clone)]
pub struct IndexedTableService<D, SD, SI> {
    data: SD,
    index: SI,
    config: IndexedConfig,
    _record: PhantomData<fn() -> D>,
}

impl<D, SD, SI> IndexedTableService<D, SD, SI> {
    /// Creates a service with the default attempt budgets.
    pub fn new(data: SD, index: SI) -> Self {
        Self::with_config(data, index, IndexedConfig::default())
    }

    /// Creates a service with caller-supplied retry policies.
    pub fn with_config(data: SD, index: SI, config: IndexedConfig) -> Self {
        Self {
            data,
            index,
            config,
            _record: PhantomData,
        }
    }

    pub fn config(&self) -> &IndexedConfig {
        &self.config
    }
}

impl<D, SD, SI> IndexedTableService<D, SD, SI>
where
    D: IndexedRecord,
    SD: RecordStore<D>,
    SI: RecordStore<D::Index>,
{
    /// Compensating delete of an index row whose data write failed.
    ///
    /// Runs under its own short budget. Exhausting it means the index
    /// row persists with no data row behind it, which is exactly the
    /// divergence `Inconsistent` exists to report.
    async fn rollback_index(&self, index: &D::Index) -> Result<()> {
        let partition = index.partition_key();
        let range = index.range_key();
        let key = key_display(&partition, &range);
        let attempts = self.config.compensation.max_attempts();

        for attempt in 1..=attempts {
            match self.index.delete(&partition, &range).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    tracing::warn!(
                        entity = D::ENTITY,
                        key = %key,
                        attempt,
                        error = %err,
                        "compensating index delete failed"
                    );
                    if attempt < attempts {
                        self.config.compensation.pause().await;
                    }
                }
            }
        }

        Err(TableError::Inconsistent {
            detail: format!(
                "unable to delete index row {key}: {} was added to the index but not the data table",
                D::ENTITY
            ),
        })
    }
}

#[async_trait]
impl<D, SD, SI> IndexedTableCrud<D> for IndexedTableService<D, SD, SI>
where
    D: IndexedRecord,
    SD: RecordStore<D>,
    SI: RecordStore<D::Index>,
{
    async fn create(&self, record: &D) -> Result<D::Range> {
        let index = record.to_index();
        let key = key_display(&record.partition_key(), &record.range_key());
        let attempts = self.config.create.max_attempts();
        let mut index_written = false;

        for attempt in 1..=attempts {
            let last = attempt == attempts;

            if !index_written {
                match self.index.put(&index).await {
                    Ok(()) => index_written = true,
                    // The data row was never attempted; nothing to undo.
                    Err(err) if last => return Err(err),
                    Err(err) => {
                        tracing::warn!(
                            entity = D::ENTITY,
                            key = %key,
                            attempt,
                            error = %err,
                            "index write failed, retrying"
                        );
                        self.config.create.pause().await;
                        continue;
                    }
                }
            }

            match self.data.put(record).await {
                Ok(()) => return Ok(record.range_key()),
                Err(err) if last => {
                    tracing::warn!(
                        entity = D::ENTITY,
                        key = %key,
                        attempt,
                        error = %err,
                        "data write failed on final attempt, rolling back index"
                    );
                    // On rollback success the create still failed, but
                    // neither table holds the record. Rollback failure
                    // escalates to `Inconsistent` instead.
                    self.rollback_index(&index).await?;
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        entity = D::ENTITY,
                        key = %key,
                        attempt,
                        error = %err,
                        "data write failed, retrying"
                    );
                    self.config.create.pause().await;
                }
            }
        }

        // Every attempt path above returns on its final iteration; this
        // covers budgets the type system cannot see through.
        Err(TableError::RetriesExhausted {
            entity: D::ENTITY,
            operation: "create",
            key,
        })
    }

    async fn read(&self, partition: &D::Partition, range: &D::Range) -> Result<D> {
        match self.data.get(partition, range).await? {
            Some(record) => Ok(record),
            None => Err(TableError::not_found(D::ENTITY, partition, range)),
        }
    }

    async fn read_partition(&self, partition: &D::Partition) -> Result<Vec<D::Index>> {
        // Listing never touches the data table; index rows are keys
        // only, so the query stays cheap regardless of payload size.
        self.index.query(partition).await
    }

    async fn update(&self, _record: &D) -> Result<()> {
        Err(TableError::Unimplemented("update"))
    }

    async fn delete(&self, partition: &D::Partition, range: &D::Range) -> Result<()> {
        let key = key_display(partition, range);
        let attempts = self.config.delete.max_attempts();
        let mut index_deleted = false;

        for attempt in 1..=attempts {
            let last = attempt == attempts;

            if !index_deleted {
                match self.index.delete(partition, range).await {
                    Ok(()) => index_deleted = true,
                    // Neither table was touched; the pair is still intact.
                    Err(err) if last => return Err(err),
                    Err(err) => {
                        tracing::warn!(
                            entity = D::ENTITY,
                            key = %key,
                            attempt,
                            error = %err,
                            "index delete failed, retrying"
                        );
                        self.config.delete.pause().await;
                        continue;
                    }
                }
            }

            match self.data.delete(partition, range).await {
                Ok(()) => return Ok(()),
                Err(err) if last => {
                    // The index row is gone but the data row survives:
                    // the tables have diverged and that must stay loud.
                    return Err(TableError::Inconsistent {
                        detail: format!(
                            "index row {key} deleted but the {} data row survives: {err}",
                            D::ENTITY
                        ),
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        entity = D::ENTITY,
                        key = %key,
                        attempt,
                        error = %err,
                        "data delete failed, retrying"
                    );
                    self.config.delete.pause().await;
                }
            }
        }

        Err(TableError::RetriesExhausted {
            entity: D::ENTITY,
            operation: "delete",
            key,
        })
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::memory::MemoryTable;
    use crate::record::IndexEntry;
    use crate::retry::RetryPolicy;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Track {
        artist: String,
        title: String,
        plays: u64,
    }

    impl Track {
        fn new(artist: &str, title: &str) -> Self {
            Self {
                artist: artist.to_string(),
                title: title.to_string(),
                plays: 0,
            }
        }
    }

    impl TableRecord for Track {
        type Partition = String;
        type Range = String;

        const ENTITY: &'static str = "Track";

        fn partition_key(&self) -> String {
            self.artist.clone()
        }

        fn range_key(&self) -> String {
            self.title.clone()
        }
    }

    impl IndexedRecord for Track {
        type Index = IndexEntry<String, String>;

        fn to_index(&self) -> Self::Index {
            IndexEntry::new(self.partition_key(), self.range_key())
        }
    }

    /// Failure script for one store handle.
    #[derive(Debug, Default)]
    struct Faults {
        fail_next_puts: u32,
        fail_all_puts: bool,
        fail_next_deletes: u32,
        fail_all_deletes: bool,
    }

    /// Wraps a `MemoryTable` with scripted failures and call counting.
    #[derive(Debug)]
    struct FlakyTable<T: TableRecord> {
        inner: MemoryTable<T>,
        faults: Arc<Mutex<Faults>>,
        calls: Arc<AtomicUsize>,
        deletes: Arc<AtomicUsize>,
    }

    impl<T: TableRecord> Clone for FlakyTable<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
                faults: Arc::clone(&self.faults),
                calls: Arc::clone(&self.calls),
                deletes: Arc::clone(&self.deletes),
            }
        }
    }

    impl<T: TableRecord> FlakyTable<T> {
        fn new() -> Self {
            Self {
                inner: MemoryTable::new(),
                faults: Arc::new(Mutex::new(Faults::default())),
                calls: Arc::new(AtomicUsize::new(0)),
                deletes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn fail_next_puts(&self, count: u32) {
            self.faults.lock().unwrap().fail_next_puts = count;
        }

        fn fail_all_puts(&self) {
            self.faults.lock().unwrap().fail_all_puts = true;
        }

        fn fail_next_deletes(&self, count: u32) {
            self.faults.lock().unwrap().fail_next_deletes = count;
        }

        fn fail_all_deletes(&self) {
            self.faults.lock().unwrap().fail_all_deletes = true;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn delete_calls(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
        }

        fn should_fail_put(&self) -> bool {
            let mut faults = self.faults.lock().unwrap();
            if faults.fail_all_puts {
                return true;
            }
            if faults.fail_next_puts > 0 {
                faults.fail_next_puts -= 1;
                return true;
            }
            false
        }

        fn should_fail_delete(&self) -> bool {
            let mut faults = self.faults.lock().unwrap();
            if faults.fail_all_deletes {
                return true;
            }
            if faults.fail_next_deletes > 0 {
                faults.fail_next_deletes -= 1;
                return true;
            }
            false
        }
    }

    #[async_trait]
    impl<T: TableRecord> RecordStore<T> for FlakyTable<T> {
        async fn put(&self, record: &T) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.should_fail_put() {
                return Err(TableError::store(T::ENTITY, "put", "injected failure"));
            }
            self.inner.put(record).await
        }

        async fn get(&self, partition: &T::Partition, range: &T::Range) -> Result<Option<T>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(partition, range).await
        }

        async fn query(&self, partition: &T::Partition) -> Result<Vec<T>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.query(partition).await
        }

        async fn delete(&self, partition: &T::Partition, range: &T::Range) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.should_fail_delete() {
                return Err(TableError::store(T::ENTITY, "delete", "injected failure"));
            }
            self.inner.delete(partition, range).await
        }
    }

    type Service = IndexedTableService<
        Track,
        FlakyTable<Track>,
        FlakyTable<IndexEntry<String, String>>,
    >;

    fn service() -> (Service, FlakyTable<Track>, FlakyTable<IndexEntry<String, String>>) {
        let data = FlakyTable::new();
        let index = FlakyTable::new();
        let service = IndexedTableService::new(data.clone(), index.clone());
        (service, data, index)
    }

    #[tokio::test]
    async fn create_writes_both_rows() {
        let (service, _data, _index) = service();
        let track = Track::new("holst", "jupiter");

        let range = service.create(&track).await.unwrap();
        assert_eq!(range, "jupiter");

        let loaded = service
            .read(&"holst".to_string(), &"jupiter".to_string())
            .await
            .unwrap();
        assert_eq!(loaded, track);

        let listing = service.read_partition(&"holst".to_string()).await.unwrap();
        assert!(listing
            .iter()
            .any(|e| e.partition == "holst" && e.range == "jupiter"));
    }

    #[tokio::test]
    async fn create_recovers_from_one_transient_index_failure() {
        let data = FlakyTable::new();
        let index = FlakyTable::new();
        index.fail_next_puts(1);
        let config = IndexedConfig {
            create: RetryPolicy::attempts(2),
            ..IndexedConfig::default()
        };
        let service: Service =
            IndexedTableService::with_config(data.clone(), index.clone(), config);
        let track = Track::new("holst", "mars");

        let range = service.create(&track).await.unwrap();

        assert_eq!(range, "mars");
        assert!(data.inner.contains(&track.partition_key(), &track.range_key()).await);
        assert!(index.inner.contains(&track.partition_key(), &track.range_key()).await);
    }

    #[tokio::test]
    async fn create_recovers_from_one_transient_data_failure() {
        let (service, data, index) = service();
        data.fail_next_puts(1);
        let track = Track::new("holst", "venus");

        service.create(&track).await.unwrap();

        assert!(data.inner.contains(&track.partition_key(), &track.range_key()).await);
        // The index write succeeded on the first attempt and is not repeated.
        assert_eq!(index.calls(), 1);
    }

    #[tokio::test]
    async fn create_propagates_index_failure_without_touching_data() {
        let (service, data, index) = service();
        index.fail_all_puts();
        let track = Track::new("holst", "saturn");

        let err = service.create(&track).await.unwrap_err();

        assert!(matches!(err, TableError::Store { operation: "put", .. }));
        assert_eq!(data.calls(), 0);
        assert!(index.inner.is_empty().await);
    }

    #[tokio::test]
    async fn create_rolls_back_index_when_data_writes_exhaust_budget() {
        let (service, data, index) = service();
        data.fail_all_puts();
        let track = Track::new("holst", "uranus");

        let err = service.create(&track).await.unwrap_err();

        // The create fails with the data-write error, but neither table
        // holds the record afterwards.
        assert!(matches!(err, TableError::Store { operation: "put", .. }));
        assert!(data.inner.is_empty().await);
        assert!(index.inner.is_empty().await);
        // Three data attempts under the default budget.
        assert_eq!(data.calls(), 3);
    }

    #[tokio::test]
    async fn create_reports_inconsistent_state_when_rollback_fails() {
        let (service, data, index) = service();
        data.fail_all_puts();
        index.fail_all_deletes();
        let track = Track::new("holst", "neptune");

        let err = service.create(&track).await.unwrap_err();

        assert!(err.is_inconsistent());
        // The orphaned index row is observably still present.
        assert!(index.inner.contains(&track.partition_key(), &track.range_key()).await);
        assert!(data.inner.is_empty().await);
        // Compensation ran its own bounded budget.
        assert_eq!(index.delete_calls(), 2);
    }

    #[tokio::test]
    async fn repeated_reads_return_equal_results() {
        let (service, _data, _index) = service();
        let track = Track::new("elgar", "nimrod");
        service.create(&track).await.unwrap();

        let first = service
            .read(&"elgar".to_string(), &"nimrod".to_string())
            .await
            .unwrap();
        let second = service
            .read(&"elgar".to_string(), &"nimrod".to_string())
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn read_missing_record_is_not_found() {
        let (service, _data, _index) = service();

        let err = service
            .read(&"elgar".to_string(), &"missing".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, TableError::NotFound { .. }));
    }

    #[tokio::test]
    async fn partition_listing_never_leaks_other_partitions() {
        let (service, _data, _index) = service();
        service.create(&Track::new("elgar", "nimrod")).await.unwrap();
        service.create(&Track::new("elgar", "salut")).await.unwrap();
        service.create(&Track::new("holst", "mars")).await.unwrap();

        let listing = service.read_partition(&"elgar".to_string()).await.unwrap();

        assert_eq!(listing.len(), 2);
        assert!(listing.iter().all(|e| e.partition == "elgar"));
    }

    #[tokio::test]
    async fn delete_removes_both_rows() {
        let (service, data, index) = service();
        let track = Track::new("elgar", "nimrod");
        service.create(&track).await.unwrap();

        service
            .delete(&track.partition_key(), &track.range_key())
            .await
            .unwrap();

        assert!(data.inner.is_empty().await);
        assert!(index.inner.is_empty().await);
        let err = service
            .read(&track.partition_key(), &track.range_key())
            .await
            .unwrap_err();
        assert!(matches!(err, TableError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_resumes_at_data_phase_once_index_is_confirmed() {
        let (service, data, index) = service();
        let track = Track::new("elgar", "salut");
        service.create(&track).await.unwrap();
        data.fail_next_deletes(1);

        service
            .delete(&track.partition_key(), &track.range_key())
            .await
            .unwrap();

        assert!(data.inner.is_empty().await);
        // The confirmed index delete is not re-attempted on retry.
        assert_eq!(index.delete_calls(), 1);
    }

    #[tokio::test]
    async fn delete_propagates_index_failure_leaving_the_pair_intact() {
        let (service, data, index) = service();
        let track = Track::new("elgar", "pomp");
        service.create(&track).await.unwrap();
        index.fail_all_deletes();

        let err = service
            .delete(&track.partition_key(), &track.range_key())
            .await
            .unwrap_err();

        assert!(matches!(err, TableError::Store { operation: "delete", .. }));
        assert!(data.inner.contains(&track.partition_key(), &track.range_key()).await);
        assert!(index.inner.contains(&track.partition_key(), &track.range_key()).await);
    }

    #[tokio::test]
    async fn delete_reports_inconsistency_when_only_the_index_goes() {
        let (service, data, index) = service();
        let track = Track::new("elgar", "enigma");
        service.create(&track).await.unwrap();
        data.fail_all_deletes();

        let err = service
            .delete(&track.partition_key(), &track.range_key())
            .await
            .unwrap_err();

        assert!(err.is_inconsistent());
        assert!(index.inner.is_empty().await);
        assert!(data.inner.contains(&track.partition_key(), &track.range_key()).await);
    }

    #[tokio::test]
    async fn update_fails_without_any_store_call() {
        let (service, data, index) = service();

        let err = service.update(&Track::new("elgar", "nimrod")).await.unwrap_err();

        assert_eq!(err, TableError::Unimplemented("update"));
        assert_eq!(data.calls(), 0);
        assert_eq!(index.calls(), 0);
    }
}
