// src/listings.rs
use crate::apify::{decode_listings, FetchError, ListingSource, SourceListing};
use crate::cache::{Clock, SnapshotCache};
use crate::domain::{flatten_listings, FlatRecord, NeighborhoodOverrides};
use std::sync::Arc;

/// What a fetch produced. `failed` means upstream could not be used and `records` is empty.
#[derive(Debug, Default, Clone)]
pub struct FetchOutcome {
    pub records: Vec<FlatRecord>,
    pub failed: bool,
    pub from_snapshot: bool,
}

/// Fetch-and-cache front for the upstream listings.
pub struct ListingService {
    source: Box<dyn ListingSource>,
    cache: SnapshotCache,
    overrides: NeighborhoodOverrides,
    clock: Arc<dyn Clock>,
}

impl ListingService {
    pub fn new(
        source: Box<dyn ListingSource>,
        cache: SnapshotCache,
        overrides: NeighborhoodOverrides,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            cache,
            overrides,
            clock,
        }
    }

    /// Fresh snapshot if there is one, otherwise a single upstream attempt.
    pub fn fetch(&self) -> FetchOutcome {
        if let Some(payload) = self.cache.fresh_payload() {
            match decode_listings(&payload) {
                Ok(listings) => {
                    return FetchOutcome {
                        records: self.flatten(&listings),
                        failed: false,
                        from_snapshot: true,
                    }
                }
                Err(e) => tracing::warn!(error = %e, "listings snapshot unreadable, refetching"),
            }
        }

        match self.fetch_upstream() {
            Ok(listings) => FetchOutcome {
                records: self.flatten(&listings),
                failed: false,
                from_snapshot: false,
            },
            Err(e) => {
                tracing::warn!(error = %e, "upstream listings unavailable");
                FetchOutcome {
                    failed: true,
                    ..FetchOutcome::default()
                }
            }
        }
    }

    fn fetch_upstream(&self) -> Result<Vec<SourceListing>, FetchError> {
        let payload = self.source.fetch_payload()?;
        let listings = decode_listings(&payload)?;
        self.cache.store(&payload);
        Ok(listings)
    }

    fn flatten(&self, listings: &[SourceListing]) -> Vec<FlatRecord> {
        flatten_listings(listings, &self.overrides, self.clock.today())
    }
}


#[cfg(test)]
mod tests {
    use super::stub::StubSource;
    use super::*;
    use crate::cache::{ManualClock, MemorySnapshotStore, SnapshotStore};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::sync::atomic::Ordering;

    const PAYLOAD: &str = r#"[{
        "propertyName": "Camden NoDa",
        "location": { "neighborhood": "NoDa" },
        "models": [{
            "details": ["1 Bed", "1 Bath", "700 sqft"],
            "units": [
                { "type": "101", "price": "$1,200", "availability": "Now" },
                { "type": "102", "price": "$1,250" }
            ]
        }]
    }]"#;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::at(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn service_with(source: StubSource, clock: Arc<ManualClock>) -> ListingService {
        service_with_store(source, Box::new(MemorySnapshotStore::default()), clock)
    }

    fn service_with_store(
        source: StubSource,
        store: Box<dyn SnapshotStore>,
        clock: Arc<ManualClock>,
    ) -> ListingService {
        let cache = SnapshotCache::new(store, clock.clone(), Duration::hours(24));
        ListingService::new(
            Box::new(source),
            cache,
            NeighborhoodOverrides::empty(),
            clock,
        )
    }

    #[test]
    fn fetches_then_serves_from_snapshot() {
        let source = StubSource::ok(PAYLOAD);
        let calls = source.calls();
        let clock = clock();
        let service = service_with(source, clock.clone());

        let first = service.fetch();
        assert!(!first.failed);
        assert!(!first.from_snapshot);
        assert_eq!(first.records.len(), 2);
        assert_eq!(
            first.records[0].availability_date,
            Some(clock.today())
        );

        clock.advance(Duration::hours(23) + Duration::minutes(59));
        let second = service.fetch();
        assert!(second.from_snapshot);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let units = |records: &[FlatRecord]| -> Vec<(String, String)> {
            records
                .iter()
                .map(|r| (r.unit_number.clone(), r.rent.clone()))
                .collect()
        };
        assert_eq!(units(&second.records), units(&first.records));
        // the snapshot is flattened again, so "Now" follows the new day
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(second.records[0].availability_date, Some(clock.today()));

        clock.advance(Duration::minutes(2));
        let third = service.fetch();
        assert!(!third.from_snapshot);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn upstream_failure_gives_empty_failed_outcome() {
        for err in [
            FetchError::Status(503),
            FetchError::Network("connection refused".into()),
        ] {
            let service = service_with(StubSource::failing(err), clock());
            let outcome = service.fetch();
            assert!(outcome.failed);
            assert!(outcome.records.is_empty());
        }
    }

    #[test]
    fn undecodable_body_is_a_failure_and_not_cached() {
        let store = Arc::new(MemorySnapshotStore::default());
        let service = service_with_store(
            StubSource::ok("<html>rate limited</html>"),
            Box::new(SharedStore(store.clone())),
            clock(),
        );

        let outcome = service.fetch();
        assert!(outcome.failed);
        assert!(store.read().is_none());
    }

    #[test]
    fn undecodable_snapshot_is_treated_as_absent() {
        let clock = clock();
        let store = MemorySnapshotStore::default();
        store.write("not json", clock.now()).unwrap();

        let source = StubSource::ok(PAYLOAD);
        let calls = source.calls();
        let service = service_with_store(source, Box::new(store), clock);

        let outcome = service.fetch();
        assert!(!outcome.failed);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stale_snapshot_with_upstream_down_fails() {
        let clock = clock();
        let store = MemorySnapshotStore::default();
        store
            .write(PAYLOAD, clock.now() - Duration::hours(30))
            .unwrap();

        let service = service_with_store(
            StubSource::failing(FetchError::Status(500)),
            Box::new(store),
            clock,
        );
        let outcome = service.fetch();
        assert!(outcome.failed);
        assert!(outcome.records.is_empty());
    }

    struct SharedStore(Arc<MemorySnapshotStore>);

    impl SnapshotStore for SharedStore {
        fn read(&self) -> Option<crate::cache::Snapshot> {
            self.0.read()
        }

        fn write(&self, payload: &str, at: chrono::DateTime<Utc>) -> std::io::Result<()> {
            self.0.write(payload, at)
        }
    }
}
