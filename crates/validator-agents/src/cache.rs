//! Caching layer for search responses to reduce API calls

use crate::api::{SearchProvider, SearchResponse};
use crate::error::Result;
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for search requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Query text, normalised to lowercase
    pub query: String,
    /// Requested result count
    pub num: usize,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(query: &str, num: usize) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            num,
        }
    }
}

/// Thread-safe timed cache of search responses
#[derive(Clone)]
pub struct SearchCache {
    cache: Arc<RwLock<TimedCache<CacheKey, SearchResponse>>>,
}

impl SearchCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<SearchResponse> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: SearchResponse) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Search provider that serves repeated queries from a [`SearchCache`]
///
/// Only successful responses are cached.
pub struct CachingSearch {
    inner: Arc<dyn SearchProvider>,
    cache: SearchCache,
}

impl CachingSearch {
    /// Wrap `inner` with a cache of the given TTL
    pub fn new(inner: Arc<dyn SearchProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: SearchCache::new(ttl),
        }
    }

    /// The underlying cache
    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }
}

#[async_trait]
impl SearchProvider for CachingSearch {
    async fn search(&self, query: &str, num: usize) -> Result<SearchResponse> {
        let key = CacheKey::new(query, num);

        if let Some(response) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(response);
        }

        tracing::debug!("Cache miss for key: {:?}", key);
        let response = self.inner.search(query, num).await?;
        self.cache.insert(key, response.clone()).await;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSearchProvider;
    use crate::api::testing::hit;
    use crate::error::ValidatorError;

    fn response(title: &str) -> SearchResponse {
        SearchResponse {
            organic: vec![hit(title, "snippet", "https://example.com")],
            answer_box: None,
        }
    }

    #[test]
    fn test_cache_key_normalises_query() {
        let key = CacheKey::new("  SaaS Market ", 10);
        assert_eq!(key.query, "saas market");
        assert_eq!(key, CacheKey::new("saas market", 10));
        assert_ne!(key, CacheKey::new("saas market", 5));
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = SearchCache::new(Duration::from_secs(60));
        let key = CacheKey::new("fintech", 10);

        cache.insert(key.clone(), response("Fintech")).await;

        assert_eq!(cache.get(&key).await, Some(response("Fintech")));
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_caching_search_calls_inner_once() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(1)
            .returning(|_, _| Ok(response("Edtech")));

        let search = CachingSearch::new(Arc::new(mock), Duration::from_secs(60));

        let first = search.search("edtech market", 10).await.unwrap();
        let second = search.search("EdTech Market", 10).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(search.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_caching_search_does_not_cache_errors() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(2)
            .returning(|_, _| Err(ValidatorError::SearchFailed { status: 500 }));

        let search = CachingSearch::new(Arc::new(mock), Duration::from_secs(60));

        assert!(search.search("ai", 10).await.is_err());
        assert!(search.search("ai", 10).await.is_err());
        assert!(search.cache().is_empty().await);
    }
}
