//! Retrying, caching catalog client.
//!
//! Owns the two retry policies and the process-lifetime detail cache.
//! Neither operation surfaces an error to the caller: a detail fetch that
//! exhausts its attempts yields the `Unknown` sentinel, an exhausted search
//! yields an empty list and the pipeline degrades to corpus-only results.

use crate::api::{ApiError, CatalogApi};
use crate::types::SearchParams;
use ladle_core::RecipeCandidate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Attempt cap shared by both endpoints.
const MAX_ATTEMPTS: u32 = 5;

/// Shared, append-only cache of fetched recipe details.
///
/// Keyed by catalog id, never invalidated during the process lifetime.
/// Failed fetches are NOT cached so a later call can retry. Cloning shares
/// the underlying map; the lock is never held across an await.
#[derive(Debug, Clone, Default)]
pub struct DetailCache {
    inner: Arc<RwLock<HashMap<u64, RecipeCandidate>>>,
}

impl DetailCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached detail.
    pub fn get(&self, id: u64) -> Option<RecipeCandidate> {
        self.inner.read().unwrap().get(&id).cloned()
    }

    /// Insert a fetched detail.
    pub fn insert(&self, id: u64, candidate: RecipeCandidate) {
        self.inner.write().unwrap().insert(id, candidate);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

/// Catalog client: search + detail with per-endpoint retry policies.
pub struct CatalogClient {
    api: Arc<dyn CatalogApi>,
    cache: DetailCache,
}

impl CatalogClient {
    /// Create a client over a transport with an injected cache.
    ///
    /// The cache is constructed once by the process-wide context and passed
    /// in, so concurrent queries share it.
    pub fn new(api: Arc<dyn CatalogApi>, cache: DetailCache) -> Self {
        Self { api, cache }
    }

    /// Access the shared detail cache.
    pub fn cache(&self) -> &DetailCache {
        &self.cache
    }

    /// Fetch full detail for a recipe id, cache-first.
    ///
    /// Up to 5 attempts; every failed attempt (rate limit or transport)
    /// sleeps `2^attempt` seconds before the next. Exhaustion returns the
    /// `Unknown` sentinel, which is never cached.
    pub async fn fetch_detail(&self, id: u64) -> RecipeCandidate {
        if let Some(hit) = self.cache.get(id) {
            tracing::debug!("Detail cache hit for id={}", id);
            return hit;
        }

        for attempt in 1..=MAX_ATTEMPTS {
            match self.api.get_detail(id).await {
                Ok(detail) => {
                    let candidate = detail.into_candidate(id);
                    self.cache.insert(id, candidate.clone());
                    return candidate;
                }
                Err(ApiError::RateLimited) => {
                    let sleep_secs = 2u64.pow(attempt);
                    tracing::warn!(
                        "Detail fetch rate limited (attempt {}/{}), sleeping {}s",
                        attempt,
                        MAX_ATTEMPTS,
                        sleep_secs
                    );
                    tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
                }
                Err(e) => {
                    let sleep_secs = 2u64.pow(attempt);
                    tracing::warn!(
                        "Detail fetch failed (attempt {}/{}): {}, sleeping {}s",
                        attempt,
                        MAX_ATTEMPTS,
                        e,
                        sleep_secs
                    );
                    tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
                }
            }
        }

        tracing::warn!("Detail fetch exhausted all attempts for id={}", id);
        RecipeCandidate::unknown(id)
    }

    /// Search the catalog and resolve each hit to full detail.
    ///
    /// Up to 5 attempts; every failed attempt sleeps `5*attempt` seconds
    /// (linear, distinct from the detail policy). Exhaustion returns an
    /// empty list, not an error.
    pub async fn search(
        &self,
        ingredients: Option<Vec<String>>,
        meal_type: Option<String>,
        diet: Option<String>,
        count: u32,
    ) -> Vec<RecipeCandidate> {
        let params = SearchParams {
            ingredients,
            meal_type,
            diet,
            number: count,
        };

        for attempt in 1..=MAX_ATTEMPTS {
            match self.api.search_ids(&params).await {
                Ok(ids) => {
                    tracing::debug!("Catalog search returned {} hits", ids.len());
                    // Detail fetches are independent and idempotent, so they
                    // resolve concurrently; result order follows hit order.
                    let fetches = ids.into_iter().map(|id| self.fetch_detail(id));
                    return futures::future::join_all(fetches).await;
                }
                Err(e) => {
                    let sleep_secs = 5 * u64::from(attempt);
                    tracing::warn!(
                        "Catalog search failed (attempt {}/{}): {}, sleeping {}s",
                        attempt,
                        MAX_ATTEMPTS,
                        e,
                        sleep_secs
                    );
                    tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
                }
            }
        }

        tracing::warn!("Catalog search exhausted all attempts");
        Vec::new()
    }
}
