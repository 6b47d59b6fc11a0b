use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use keyscout_core::expand::expand;
use keyscout_core::fallback::fallback_bucket_set;
use keyscout_core::{merge, SuggestionBucketSet};
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::warn;

use crate::cache::ResponseCache;
use crate::config::{CacheConfig, FetchConfig, ResearchConfig};
use crate::protocol::{
    default_country, default_language, LikeRequest, Platform, SearchRequest, SearchResponse,
    SearchType,
};
use crate::source::{Locale, SourceRegistry, SuggestionSource};
use crate::store::{RecordKey, RecordStore, StoredRecord};

struct AggregateOutcome {
    buckets: SuggestionBucketSet,
    attempted: usize,
    failed: usize,
}

impl AggregateOutcome {
    fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

pub struct ResearchRouter {
    registry: SourceRegistry,
    store: Arc<dyn RecordStore>,
    cache: RwLock<ResponseCache>,
    inter_call_delay: Duration,
    enable_fallback: bool,
}

impl ResearchRouter {
    pub fn new(
        registry: SourceRegistry,
        store: Arc<dyn RecordStore>,
        fetch: &FetchConfig,
        cache: &CacheConfig,
        research: &ResearchConfig,
    ) -> Self {
        Self {
            registry,
            store,
            cache: RwLock::new(ResponseCache::new(
                cache.capacity,
                Duration::from_secs(cache.ttl_secs),
            )),
            inter_call_delay: Duration::from_millis(fetch.inter_call_delay_ms),
            enable_fallback: research.enable_fallback,
        }
    }

    pub async fn search(&self, request: SearchRequest) -> SearchResponse {
        let source = self.registry.get(request.platform);
        self.run_search(request, source.as_ref()).await
    }

    /// Likes route to the most-liked existing record for App Store queries,
    /// and to the exact default-locale record everywhere else. Returns
    /// `Ok(None)` when no stored record matches.
    pub fn like(&self, request: &LikeRequest) -> Result<Option<u64>> {
        let target = match request.platform {
            Platform::Appstore => self
                .store
                .find_most_liked(&request.query, request.platform)
                .map(|(key, _)| key),
            _ => {
                let key = RecordKey {
                    query: request.query.clone(),
                    platform: request.platform,
                    search_type: SearchType::Keywords,
                    language: default_language(),
                    country: default_country(),
                };
                self.store.find(&key).map(|_| key)
            }
        };

        match target {
            Some(key) => Ok(Some(self.store.record_like(&key)?)),
            None => Ok(None),
        }
    }

    async fn run_search(
        &self,
        request: SearchRequest,
        source: &dyn SuggestionSource,
    ) -> SearchResponse {
        let request = request.normalized();
        let key = RecordKey {
            query: request.query.clone(),
            platform: request.platform,
            search_type: request.search_type,
            language: request.language.clone(),
            country: request.country.clone(),
        };

        if let Some(cached) = self.cache.read().await.get(&key) {
            return cached;
        }

        let started = Instant::now();
        let locale = Locale {
            language: request.language.clone(),
            country: request.country.clone(),
        };

        let outcome = self.aggregate(source, &request.query, &locale).await;
        let (fresh, is_fallback) =
            if outcome.buckets.is_empty() && outcome.all_failed() && self.enable_fallback {
                warn!(
                    query = %request.query,
                    platform = ?request.platform,
                    "all suggestion variants failed, substituting fallback data"
                );
                (fallback_bucket_set(&request.query), true)
            } else {
                (outcome.buckets, false)
            };

        let existing = self.store.find(&key);
        let prior_merge_count = existing
            .as_ref()
            .map(|record| record.total_merge_count)
            .unwrap_or(0);
        let result = merge(
            existing.as_ref().map(|record| &record.buckets),
            fresh,
            prior_merge_count,
        );

        let now = Utc::now();
        let record = StoredRecord {
            buckets: result.bucket_set.clone(),
            total_merge_count: result.total_merge_count,
            likes: existing.as_ref().map(|r| r.likes).unwrap_or(0),
            views: existing.as_ref().map(|r| r.views).unwrap_or(0) + 1,
            created_at: existing.as_ref().map(|r| r.created_at).unwrap_or(now),
            updated_at: now,
        };
        // Persistence is best-effort telemetry: the computed merge result is
        // returned even when the write fails.
        if let Err(error) = self.store.persist(&key, record) {
            warn!(query = %request.query, "failed to persist merge result: {error:#}");
        }

        let response = SearchResponse {
            action: result.action,
            buckets: result.bucket_set,
            new_item_counts: result.new_item_counts,
            total_merge_count: result.total_merge_count,
            is_fallback,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        self.cache.write().await.insert(key, response.clone());
        response
    }

    /// Drives the expander over the source: one upstream call per variant,
    /// per-variant failures logged and skipped, exact-string dedup keeping
    /// first-seen position, static variations unioned in last.
    async fn aggregate(
        &self,
        source: &dyn SuggestionSource,
        seed: &str,
        locale: &Locale,
    ) -> AggregateOutcome {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();
        let mut attempted = 0;
        let mut failed = 0;

        for (index, variant) in expand(seed).iter().enumerate() {
            if index > 0 && !self.inter_call_delay.is_zero() {
                sleep(self.inter_call_delay).await;
            }
            attempted += 1;
            match source.fetch(variant, locale).await {
                Ok(suggestions) => {
                    for suggestion in suggestions {
                        if seen.insert(suggestion.clone()) {
                            keywords.push(suggestion);
                        }
                    }
                }
                Err(error) => {
                    failed += 1;
                    warn!(variant = %variant, "suggestion fetch failed: {error:#}");
                }
            }
        }

        for variation in source.variations(seed) {
            if seen.insert(variation.clone()) {
                keywords.push(variation);
            }
        }

        AggregateOutcome {
            buckets: SuggestionBucketSet::classify(keywords),
            attempted,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use keyscout_core::MergeAction;

    use crate::config::SourcesConfig;
    use crate::store::JsonFileStore;

    struct StaticSource;

    #[async_trait]
    impl SuggestionSource for StaticSource {
        async fn fetch(&self, query: &str, _locale: &Locale) -> Result<Vec<String>> {
            Ok(vec![
                format!("{query} ideas"),
                "Common Suggestion".to_string(),
            ])
        }

        fn variations(&self, seed: &str) -> Vec<String> {
            vec![format!("{seed} pro")]
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SuggestionSource for FailingSource {
        async fn fetch(&self, _query: &str, _locale: &Locale) -> Result<Vec<String>> {
            Err(anyhow!("connection refused"))
        }
    }

    /// Fails the bare seed query, succeeds on every expanded variant.
    struct FlakySource;

    #[async_trait]
    impl SuggestionSource for FlakySource {
        async fn fetch(&self, query: &str, _locale: &Locale) -> Result<Vec<String>> {
            if !query.contains(' ') {
                return Err(anyhow!("transient upstream error"));
            }
            Ok(vec![format!("{query} result")])
        }
    }

    struct FailingStore;

    impl RecordStore for FailingStore {
        fn find(&self, _key: &RecordKey) -> Option<StoredRecord> {
            None
        }

        fn persist(&self, _key: &RecordKey, _record: StoredRecord) -> Result<()> {
            Err(anyhow!("disk full"))
        }

        fn find_most_liked(
            &self,
            _query: &str,
            _platform: Platform,
        ) -> Option<(RecordKey, StoredRecord)> {
            None
        }

        fn record_like(&self, _key: &RecordKey) -> Result<u64> {
            Err(anyhow!("disk full"))
        }
    }

    fn router_with_store(store: Arc<dyn RecordStore>) -> ResearchRouter {
        let registry =
            SourceRegistry::new(&SourcesConfig::default(), &FetchConfig::default()).unwrap();
        let fetch = FetchConfig {
            inter_call_delay_ms: 0,
            ..Default::default()
        };
        ResearchRouter::new(
            registry,
            store,
            &fetch,
            &CacheConfig::default(),
            &ResearchConfig::default(),
        )
    }

    fn file_store() -> (tempfile::TempDir, Arc<JsonFileStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::open(&dir.path().join("records.json")).unwrap());
        (dir, store)
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            platform: Platform::Google,
            search_type: SearchType::Keywords,
            language: String::new(),
            country: String::new(),
        }
    }

    #[tokio::test]
    async fn first_search_creates_and_persists() {
        let (_dir, store) = file_store();
        let router = router_with_store(store.clone());

        let response = router.run_search(request("fitness"), &StaticSource).await;

        assert_eq!(response.action, MergeAction::Created);
        assert!(!response.is_fallback);
        // 55 per-variant firsts plus the shared suggestion plus the variation.
        assert_eq!(response.buckets.keywords.len(), 57);
        assert_eq!(response.buckets.keywords[0], "fitness ideas");
        assert!(response
            .buckets
            .keywords
            .contains(&"Common Suggestion".to_string()));
        assert!(response.buckets.keywords.contains(&"fitness pro".to_string()));
        assert_eq!(response.total_merge_count, 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn cached_search_skips_merge() {
        let (_dir, store) = file_store();
        let router = router_with_store(store);

        let first = router.run_search(request("fitness"), &StaticSource).await;
        let second = router.run_search(request("fitness"), &StaticSource).await;

        assert_eq!(first.action, MergeAction::Created);
        assert_eq!(second.action, MergeAction::Created);
        assert_eq!(second.total_merge_count, 0);
    }

    #[tokio::test]
    async fn second_search_merges_without_duplicates() {
        let (_dir, store) = file_store();
        let router = router_with_store(store);

        let first = router.run_search(request("fitness"), &StaticSource).await;
        // Expire the cached entry so the second search re-runs the pipeline.
        {
            let mut cache = router.cache.write().await;
            *cache = ResponseCache::new(0, Duration::from_secs(0));
        }
        let second = router.run_search(request("fitness"), &StaticSource).await;

        assert_eq!(second.action, MergeAction::Merged);
        assert_eq!(second.total_merge_count, 1);
        assert_eq!(second.new_item_counts.keywords, 0);
        assert_eq!(second.buckets.keywords, first.buckets.keywords);
    }

    #[tokio::test]
    async fn total_failure_substitutes_fallback() {
        let (_dir, store) = file_store();
        let router = router_with_store(store);

        let response = router.run_search(request("fitness"), &FailingSource).await;

        assert!(response.is_fallback);
        assert!(!response.buckets.is_empty());
        assert!(response
            .buckets
            .keywords
            .contains(&"fitness guide".to_string()));
    }

    #[tokio::test]
    async fn total_failure_without_fallback_returns_empty_buckets() {
        let (_dir, store) = file_store();
        let registry =
            SourceRegistry::new(&SourcesConfig::default(), &FetchConfig::default()).unwrap();
        let fetch = FetchConfig {
            inter_call_delay_ms: 0,
            ..Default::default()
        };
        let router = ResearchRouter::new(
            registry,
            store,
            &fetch,
            &CacheConfig::default(),
            &ResearchConfig {
                enable_fallback: false,
            },
        );

        let response = router.run_search(request("fitness"), &FailingSource).await;

        assert!(!response.is_fallback);
        assert!(response.buckets.is_empty());
        assert_eq!(response.action, MergeAction::Created);
    }

    #[tokio::test]
    async fn partial_failure_keeps_surviving_variants() {
        let (_dir, store) = file_store();
        let router = router_with_store(store);

        let response = router.run_search(request("fitness"), &FlakySource).await;

        assert!(!response.is_fallback);
        assert_eq!(response.buckets.keywords.len(), 54);
        assert!(response
            .buckets
            .keywords
            .contains(&"fitness a result".to_string()));
    }

    #[tokio::test]
    async fn persist_failure_still_returns_merge_result() {
        let router = router_with_store(Arc::new(FailingStore));

        let response = router.run_search(request("fitness"), &StaticSource).await;

        assert_eq!(response.action, MergeAction::Created);
        assert!(!response.buckets.is_empty());
    }

    #[test]
    fn like_routes_to_most_liked_for_appstore() {
        let (_dir, store) = file_store();
        let now = Utc::now();
        let record = |likes| StoredRecord {
            buckets: SuggestionBucketSet::default(),
            total_merge_count: 0,
            likes,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        let key = |language: &str| RecordKey {
            query: "fitness".to_string(),
            platform: Platform::Appstore,
            search_type: SearchType::Keywords,
            language: language.to_string(),
            country: "us".to_string(),
        };
        store.persist(&key("en"), record(1)).unwrap();
        store.persist(&key("de"), record(5)).unwrap();
        let router = router_with_store(store.clone());

        let likes = router
            .like(&LikeRequest {
                query: "fitness".to_string(),
                platform: Platform::Appstore,
            })
            .unwrap();

        assert_eq!(likes, Some(6));
        assert_eq!(store.find(&key("de")).unwrap().likes, 6);
        assert_eq!(store.find(&key("en")).unwrap().likes, 1);
    }

    #[test]
    fn like_without_record_returns_none() {
        let (_dir, store) = file_store();
        let router = router_with_store(store);

        let likes = router
            .like(&LikeRequest {
                query: "missing".to_string(),
                platform: Platform::Google,
            })
            .unwrap();
        assert_eq!(likes, None);
    }
}
