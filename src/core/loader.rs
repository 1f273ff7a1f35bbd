use crate::domain::model::{sort_descending, DrawRecord};
use crate::domain::ports::{DrawSource, RecordStore};
use crate::utils::error::{Result, SsqError};
use std::collections::HashSet;

/// First period ever drawn; a full download starts here.
pub const FIRST_PERIOD: u32 = 1;

/// Sorts most-recent-first and keeps only the first record seen for each period.
pub fn normalize(records: Vec<DrawRecord>) -> Vec<DrawRecord> {
    let mut seen = HashSet::new();
    let mut unique: Vec<DrawRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.period.clone()))
        .collect();
    sort_descending(&mut unique);
    unique
}

/// Merges freshly fetched draws into the cached collection.
///
/// A fetched draw whose period is already cached replaces the cached entry,
/// since the source republishing a period means it corrected it. The result
/// holds every period once, in strictly descending order.
pub fn merge_records(fresh: Vec<DrawRecord>, cached: Vec<DrawRecord>) -> Vec<DrawRecord> {
    let mut combined = fresh;
    combined.extend(cached);
    normalize(combined)
}

/// Cache-first access to the draw history.
pub struct DataLoader<F: DrawSource, S: RecordStore> {
    source: F,
    store: S,
}

impl<F: DrawSource, S: RecordStore> DataLoader<F, S> {
    pub fn new(source: F, store: S) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the cache when it has data, otherwise (or when forced)
    /// downloads the full history and replaces the cache with it.
    pub async fn load(&self, force_refresh: bool) -> Result<Vec<DrawRecord>> {
        if !force_refresh {
            let cached = self.store.load()?;
            if !cached.is_empty() {
                tracing::debug!("Using {} cached draws", cached.len());
                return Ok(cached);
            }
        }

        tracing::info!("Downloading full draw history");
        let fetched = self.source.fetch(FIRST_PERIOD, None).await?;
        let records = normalize(fetched);
        self.store.save(&records)?;
        tracing::info!("Cached {} draws", records.len());
        Ok(records)
    }

    /// Fetches only the draws newer than the cached latest period and
    /// prepends them to the cache. An empty cache falls back to a full load.
    pub async fn update_incremental(&self) -> Result<Vec<DrawRecord>> {
        let cached = self.store.load()?;
        let latest = match cached.first() {
            None => {
                tracing::info!("Cache is empty, downloading full history");
                return self.load(true).await;
            }
            Some(first) => first.period_number().ok_or_else(|| SsqError::InvalidRecord {
                message: format!("cached period '{}' is not numeric", first.period),
            })?,
        };

        let start = latest.checked_add(1).ok_or_else(|| SsqError::InvalidRecord {
            message: format!("cached period {} has no successor", latest),
        })?;
        let fresh = self.source.fetch(start, None).await?;
        if fresh.is_empty() {
            tracing::info!("Cache already up to date at period {:05}", latest);
            return Ok(cached);
        }

        let cached_periods: HashSet<&str> = cached.iter().map(|r| r.period.as_str()).collect();
        let replaced = fresh
            .iter()
            .filter(|r| cached_periods.contains(r.period.as_str()))
            .count();
        if replaced > 0 {
            tracing::warn!("{} fetched draws replace cached entries with the same period", replaced);
        }

        let fetched = fresh.len();
        let merged = merge_records(fresh, cached.clone());
        if merged == cached {
            tracing::info!("Fetched draws match the cache, nothing to save");
            return Ok(cached);
        }

        self.store.save(&merged)?;
        tracing::info!(
            "Added {} draws, cache now holds {}",
            fetched - replaced,
            merged.len()
        );
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::is_descending;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn draw(period: &str, blue: &str) -> DrawRecord {
        DrawRecord::new(
            period,
            format!("date-{}", period),
            ["01", "02", "03", "04", "05", "06"].map(String::from),
            blue,
        )
    }

    /// Serves its draws filtered by the requested range, like the real page.
    #[derive(Clone, Default)]
    struct MockSource {
        draws: Vec<DrawRecord>,
        ignore_range: bool,
        calls: Arc<Mutex<Vec<(u32, Option<u32>)>>>,
    }

    impl MockSource {
        fn new(draws: Vec<DrawRecord>) -> Self {
            Self {
                draws,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(u32, Option<u32>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DrawSource for MockSource {
        async fn fetch(&self, start: u32, end: Option<u32>) -> Result<Vec<DrawRecord>> {
            self.calls.lock().unwrap().push((start, end));
            Ok(self
                .draws
                .iter()
                .filter(|r| {
                    let p = r.period_number().unwrap_or(0);
                    self.ignore_range || (p >= start && end.map_or(true, |e| p <= e))
                })
                .cloned()
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DrawSource for FailingSource {
        async fn fetch(&self, _start: u32, _end: Option<u32>) -> Result<Vec<DrawRecord>> {
            Err(SsqError::ParseError {
                message: "expected at least 3 tables, found 0".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct MockStore {
        records: Arc<Mutex<Vec<DrawRecord>>>,
        saves: Arc<AtomicUsize>,
    }

    impl MockStore {
        fn with(records: Vec<DrawRecord>) -> Self {
            Self {
                records: Arc::new(Mutex::new(records)),
                saves: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        fn contents(&self) -> Vec<DrawRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl RecordStore for MockStore {
        fn save(&self, records: &[DrawRecord]) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.records.lock().unwrap() = records.to_vec();
            Ok(())
        }

        fn load(&self) -> Result<Vec<DrawRecord>> {
            Ok(self.contents())
        }
    }

    fn periods(records: &[DrawRecord]) -> Vec<&str> {
        records.iter().map(|r| r.period.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_prefers_cache() {
        let store = MockStore::with(vec![draw("22064", "06")]);
        let source = MockSource::new(vec![draw("22065", "02"), draw("22064", "06")]);
        let loader = DataLoader::new(source.clone(), store.clone());

        let records = loader.load(false).await.unwrap();

        assert_eq!(periods(&records), vec!["22064"]);
        assert!(source.calls().is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_load_empty_cache_fetches_sorts_and_saves() {
        let store = MockStore::default();
        let source = MockSource::new(vec![draw("22063", "01"), draw("22065", "02"), draw("22064", "06")]);
        let loader = DataLoader::new(source.clone(), store.clone());

        let records = loader.load(false).await.unwrap();

        assert_eq!(source.calls(), vec![(FIRST_PERIOD, None)]);
        assert_eq!(periods(&records), vec!["22065", "22064", "22063"]);
        assert_eq!(store.saves(), 1);
        assert_eq!(store.contents(), records);
    }

    #[tokio::test]
    async fn test_force_refresh_ignores_cache() {
        let store = MockStore::with(vec![draw("22064", "06")]);
        let source = MockSource::new(vec![draw("22065", "02"), draw("22064", "06")]);
        let loader = DataLoader::new(source.clone(), store.clone());

        let records = loader.load(true).await.unwrap();

        assert_eq!(periods(&records), vec!["22065", "22064"]);
        assert_eq!(store.saves(), 1);
    }

    #[tokio::test]
    async fn test_incremental_prepends_new_draws() {
        let store = MockStore::with(vec![draw("22064", "06"), draw("22063", "01")]);
        let source = MockSource::new(vec![
            draw("22066", "09"),
            draw("22065", "02"),
            draw("22064", "06"),
            draw("22063", "01"),
        ]);
        let loader = DataLoader::new(source.clone(), store.clone());

        let records = loader.update_incremental().await.unwrap();

        assert_eq!(source.calls(), vec![(22065, None)]);
        assert_eq!(periods(&records), vec!["22066", "22065", "22064", "22063"]);
        assert!(is_descending(&records));
        assert_eq!(store.saves(), 1);
        assert_eq!(store.contents(), records);
    }

    #[tokio::test]
    async fn test_incremental_no_new_draws_is_noop() {
        let cached = vec![draw("22065", "02"), draw("22064", "06")];
        let store = MockStore::with(cached.clone());
        let source = MockSource::new(cached.clone());
        let loader = DataLoader::new(source.clone(), store.clone());

        let records = loader.update_incremental().await.unwrap();

        assert_eq!(records, cached);
        assert_eq!(source.calls(), vec![(22066, None)]);
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_incremental_on_empty_cache_matches_forced_load() {
        let draws = vec![draw("22065", "02"), draw("22064", "06")];

        let bootstrap_store = MockStore::default();
        let bootstrap = DataLoader::new(MockSource::new(draws.clone()), bootstrap_store.clone());
        let via_update = bootstrap.update_incremental().await.unwrap();

        let forced_store = MockStore::default();
        let forced = DataLoader::new(MockSource::new(draws), forced_store.clone());
        let via_load = forced.load(true).await.unwrap();

        assert_eq!(via_update, via_load);
        assert_eq!(bootstrap_store.contents(), forced_store.contents());
        assert_eq!(bootstrap_store.saves(), 1);
    }

    #[tokio::test]
    async fn test_incremental_collision_replaces_cached_period() {
        let store = MockStore::with(vec![draw("22065", "02"), draw("22064", "06")]);
        // Source ignores the range and republishes 22065 with a corrected blue ball.
        let source = MockSource {
            draws: vec![draw("22066", "09"), draw("22065", "12")],
            ignore_range: true,
            ..Default::default()
        };
        let loader = DataLoader::new(source, store.clone());

        let records = loader.update_incremental().await.unwrap();

        assert_eq!(periods(&records), vec!["22066", "22065", "22064"]);
        assert_eq!(records[1].blue_ball, "12");
        assert!(is_descending(&records));
    }

    #[tokio::test]
    async fn test_incremental_identical_republication_skips_save() {
        let cached = vec![draw("22065", "02"), draw("22064", "06")];
        let store = MockStore::with(cached.clone());
        let source = MockSource {
            draws: vec![draw("22065", "02")],
            ignore_range: true,
            ..Default::default()
        };
        let loader = DataLoader::new(source, store.clone());

        let records = loader.update_incremental().await.unwrap();

        assert_eq!(records, cached);
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_incremental_rejects_non_numeric_cached_period() {
        let store = MockStore::with(vec![draw("bogus", "02")]);
        let loader = DataLoader::new(MockSource::default(), store);

        let err = loader.update_incremental().await.unwrap_err();
        assert!(matches!(err, SsqError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_incremental_rejects_cached_period_at_upper_bound() {
        let store = MockStore::with(vec![draw("4294967295", "02")]);
        let source = MockSource::default();
        let loader = DataLoader::new(source.clone(), store.clone());

        let err = loader.update_incremental().await.unwrap_err();

        assert!(matches!(err, SsqError::InvalidRecord { .. }));
        assert!(source.calls().is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_cache_untouched() {
        let cached = vec![draw("22065", "02")];
        let store = MockStore::with(cached.clone());
        let loader = DataLoader::new(FailingSource, store.clone());

        let err = loader.update_incremental().await.unwrap_err();

        assert!(matches!(err, SsqError::ParseError { .. }));
        assert_eq!(store.contents(), cached);
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn test_merge_never_duplicates_periods() {
        let merged = merge_records(
            vec![draw("22066", "09"), draw("22066", "10"), draw("22065", "12")],
            vec![draw("22065", "02"), draw("22064", "06")],
        );

        assert_eq!(periods(&merged), vec!["22066", "22065", "22064"]);
        assert_eq!(merged[0].blue_ball, "09");
        assert_eq!(merged[1].blue_ball, "12");
    }
}
