//! # Scrape Proxy
//!
//! A caching HTTP gateway that fronts a fixed-size pool of headless browser
//! tabs. Clients issue `GET /?key=...&url=...`; the gateway authenticates the
//! key against an allow-list, serves repeated URLs out of a TTL-bounded
//! cache, and otherwise borrows a tab, renders the page, strips executable
//! and resource-loading markup, and returns the result as `text/html`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrape_proxy::{ApiKeys, Chromium, Config, ProxyService, run_server};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let keys = ApiKeys::from_lines("my-secret-key");
//!
//!     let engine = Chromium::new(config.chromium_path.clone());
//!     let service = Arc::new(ProxyService::new(engine, &config, keys));
//!
//!     run_server(service, config.port).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! scrape-proxy --config proxy.conf --keys api_keys.txt --port 8080
//! ```

/// Configuration and API-key allow-list
pub mod config;

/// Error types and HTTP status mapping
pub mod error;

/// URL fingerprinting for cache keys
pub mod fingerprint;

/// Time- and size-bounded page cache
pub mod cache;

/// HTML sanitization of fetched pages
pub mod sanitize;

/// Browser engine trait and the Chromium implementation
pub mod engine;

/// Fixed-size browser session pool
pub mod browser_pool;

/// Request pipeline orchestrating auth, cache, pool and sanitizer
pub mod proxy_service;

/// HTTP surface and service lifecycle
pub mod server;

/// Command-line interface
pub mod cli;

/// Request counters
pub mod metrics;


pub use browser_pool::*;
pub use cache::*;
pub use cli::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use fingerprint::*;
pub use metrics::*;
pub use proxy_service::*;
pub use sanitize::*;
pub use server::*;
