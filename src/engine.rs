//! Browser engine abstraction and the Chromium implementation
//!
//! The pool and pipeline only speak to the engine trait; production wires in
//! Chromium over the DevTools protocol and tests inject a fake.

use crate::error::GatewayError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// External browser collaborator behind the session pool.
///
/// `open` creates the whole session group at once; `navigate` fetches one
/// page through an existing session; `shutdown` tears the group down.
#[async_trait]
pub trait BrowserEngine: Send + Sync + 'static {
    type Session: Send + 'static;

    async fn open(&self, size: usize) -> Result<Vec<Self::Session>, GatewayError>;

    async fn navigate(&self, session: &Self::Session, url: &str) -> Result<String, GatewayError>;

    async fn shutdown(&self);
}

struct BrowserRuntime {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
}

/// Headless Chromium engine: one browser process, N tabs as pool sessions.
pub struct Chromium {
    executable: String,
    runtime: Mutex<Option<BrowserRuntime>>,
}

impl Chromium {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            runtime: Mutex::new(None),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, GatewayError> {
        BrowserConfig::builder()
            .chrome_executable(&self.executable)
            .args(vec![
                "--headless",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--disable-extensions",
                "--no-first-run",
            ])
            .build()
            .map_err(GatewayError::PoolInit)
    }

    fn validate_url(url: &str) -> Result<(), GatewayError> {
        let parsed =
            url::Url::parse(url).map_err(|e| GatewayError::Fetch(format!("invalid URL: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GatewayError::Fetch(format!(
                "unsupported URL scheme: {scheme}"
            ))),
        }
    }
}

#[async_trait]
impl BrowserEngine for Chromium {
    type Session = Page;

    async fn open(&self, size: usize) -> Result<Vec<Page>, GatewayError> {
        let config = self.browser_config()?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| GatewayError::PoolInit(e.to_string()))?;

        // The handler implements Stream and must be polled for the browser
        // connection to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {}", e);
                }
            }
            debug!("browser handler stream ended");
        });

        let mut tabs = Vec::with_capacity(size);
        for i in 0..size {
            match browser.new_page("about:blank").await {
                Ok(page) => tabs.push(page),
                Err(e) => {
                    warn!("Failed to open tab {}: {}", i, e);
                    let _ = browser.close().await;
                    handler_task.abort();
                    return Err(GatewayError::PoolInit(e.to_string()));
                }
            }
        }

        info!("Launched Chromium with {} tabs", tabs.len());
        *self.runtime.lock().await = Some(BrowserRuntime {
            browser,
            handler_task,
        });

        Ok(tabs)
    }

    async fn navigate(&self, session: &Page, url: &str) -> Result<String, GatewayError> {
        Self::validate_url(url)?;

        session
            .goto(url)
            .await
            .map_err(|e| GatewayError::Fetch(e.to_string()))?;

        session
            .wait_for_navigation()
            .await
            .map_err(|e| GatewayError::Fetch(e.to_string()))?;

        session
            .content()
            .await
            .map_err(|e| GatewayError::Fetch(e.to_string()))
    }

    async fn shutdown(&self) {
        if let Some(mut runtime) = self.runtime.lock().await.take() {
            if let Err(e) = runtime.browser.close().await {
                warn!("Error closing browser: {}", e);
            }
            runtime.handler_task.abort();
            info!("Chromium shut down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_schemes() {
        assert!(Chromium::validate_url("https://example.com").is_ok());
        assert!(Chromium::validate_url("http://example.com/page?q=1").is_ok());
        assert!(Chromium::validate_url("file:///etc/passwd").is_err());
        assert!(Chromium::validate_url("not a url").is_err());
    }
}
