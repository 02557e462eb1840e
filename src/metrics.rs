use metrics::Counter;

pub struct GatewayMetrics {
    pub requests_served: Counter,
    pub cache_hits: Counter,
    pub fetch_failures: Counter,
    pub rejected_unauthorized: Counter,
    pub pool_unavailable: Counter,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self {
            requests_served: Counter::noop(),
            cache_hits: Counter::noop(),
            fetch_failures: Counter::noop(),
            rejected_unauthorized: Counter::noop(),
            pool_unavailable: Counter::noop(),
        }
    }

    pub fn record_served(&self) {
        self.requests_served.increment(1);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.increment(1);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.increment(1);
    }

    pub fn record_unauthorized(&self) {
        self.rejected_unauthorized.increment(1);
    }

    pub fn record_pool_unavailable(&self) {
        self.pool_unavailable.increment(1);
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}
