//! Request pipeline for the scrape gateway
//!
//! One entry point, `handle_scrape`, runs every request through the same
//! sequence: authenticate, validate, consult the cache, and only then borrow
//! a browser tab to fetch, sanitize and store the page. The tab travels in a
//! guard so it returns to the pool on every path out of the pipeline.
//!
//! Two concurrent misses for the same URL are not collapsed: both fetch and
//! both write the cache, last write wins.

use crate::browser_pool::BrowserPool;
use crate::cache::PageCache;
use crate::config::{ApiKeys, Config};
use crate::engine::BrowserEngine;
use crate::error::GatewayError;
use crate::fingerprint::{fingerprint, CacheKey};
use crate::metrics::GatewayMetrics;
use crate::sanitize::sanitize;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct ProxyService<E: BrowserEngine> {
    pool: BrowserPool<E>,
    cache: Arc<PageCache>,
    keys: ApiKeys,
    metrics: GatewayMetrics,
}

impl<E: BrowserEngine> ProxyService<E> {
    pub fn new(engine: E, config: &Config, keys: ApiKeys) -> Self {
        Self {
            pool: BrowserPool::new(engine, config.pool_size),
            cache: Arc::new(PageCache::new(config.cache_max_size, config.cache_ttl)),
            keys,
            metrics: GatewayMetrics::new(),
        }
    }

    pub fn pool(&self) -> &BrowserPool<E> {
        &self.pool
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    /// Process one scrape request end to end.
    ///
    /// A cache hit never touches the pool. All per-request logging happens
    /// here, one record per completed request with the caller's key, the
    /// outcome and the URL.
    pub async fn handle_scrape(
        &self,
        key: Option<&str>,
        url: Option<&str>,
    ) -> Result<String, GatewayError> {
        let principal = match key {
            Some(k) if self.keys.contains(k) => k,
            _ => {
                self.metrics.record_unauthorized();
                warn!(
                    key = key.unwrap_or("<missing>"),
                    outcome = "unauthorized",
                    "Rejected request"
                );
                return Err(GatewayError::Unauthorized);
            }
        };

        let Some(url) = url else {
            warn!(key = principal, outcome = "missing_url", "Rejected request");
            return Err(GatewayError::MissingUrl);
        };

        let cache_key = fingerprint(url);
        if let Some(body) = self.cache.get(&cache_key) {
            self.metrics.record_cache_hit();
            self.metrics.record_served();
            info!(key = principal, outcome = "cache", url, "Served from cache");
            return Ok(body);
        }

        let result = self.fetch_and_store(cache_key, url).await;
        match &result {
            Ok(_) => {
                self.metrics.record_served();
                info!(key = principal, outcome = "fetched", url, "Served fresh page");
            }
            Err(e) => {
                match e {
                    GatewayError::PoolInit(_) | GatewayError::PoolClosed => {
                        self.metrics.record_pool_unavailable();
                    }
                    GatewayError::Fetch(_) | GatewayError::Sanitize(_) => {
                        self.metrics.record_fetch_failure();
                    }
                    _ => {}
                }
                error!(
                    key = principal,
                    outcome = e.kind(),
                    url,
                    "Request failed: {}",
                    e
                );
            }
        }
        result
    }

    async fn fetch_and_store(
        &self,
        cache_key: CacheKey,
        url: &str,
    ) -> Result<String, GatewayError> {
        // Idempotent and cheap once the pool is up; a pool that failed to
        // start stays retryable instead of hanging acquires.
        self.pool.initialize().await?;

        let tab = self.pool.acquire().await?;
        let raw = self.pool.engine().navigate(tab.session(), url).await?;

        let clean = sanitize(&raw)?;
        self.cache.put(cache_key, clean.clone());

        Ok(clean)
    }
}
