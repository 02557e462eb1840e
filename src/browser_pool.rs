//! Fixed-size pool of browser sessions
//!
//! The pool is built lazily by the first `initialize` call, hands out tabs in
//! FIFO order, and tears the whole session group down exactly once on
//! `close`. Borrowed tabs travel inside a [`TabGuard`] whose `Drop` returns
//! them, so a tab comes back on every exit path.

use crate::engine::BrowserEngine;
use crate::error::GatewayError;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
    Closed,
}

pub struct BrowserPool<E: BrowserEngine> {
    engine: Arc<E>,
    capacity: usize,
    lifecycle: Arc<Mutex<Lifecycle>>,
    idle: Arc<std::sync::Mutex<VecDeque<E::Session>>>,
    // Starts with zero permits; initialize() adds one per session and
    // close() closes it to fail all pending and future acquires.
    permits: Arc<Semaphore>,
}

impl<E: BrowserEngine> BrowserPool<E> {
    pub fn new(engine: E, capacity: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            capacity,
            lifecycle: Arc::new(Mutex::new(Lifecycle::Uninitialized)),
            idle: Arc::new(std::sync::Mutex::new(VecDeque::new())),
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tabs currently idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap().len()
    }

    /// Build the session group if it does not exist yet.
    ///
    /// Exactly one caller performs construction; concurrent callers wait on
    /// the lifecycle lock and observe the result. A failed attempt leaves the
    /// pool uninitialized so a later call can retry. Returns `PoolClosed`
    /// once the pool has been closed.
    pub async fn initialize(&self) -> Result<(), GatewayError> {
        let mut lifecycle = self.lifecycle.lock().await;

        match *lifecycle {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Closed => Err(GatewayError::PoolClosed),
            Lifecycle::Uninitialized => {
                let sessions = self.engine.open(self.capacity).await?;
                let count = sessions.len();

                self.idle.lock().unwrap().extend(sessions);
                self.permits.add_permits(count);
                *lifecycle = Lifecycle::Ready;

                info!("Browser pool initialized with {} sessions", count);
                Ok(())
            }
        }
    }

    /// Borrow a tab, waiting in FIFO order if none is idle.
    ///
    /// Fails with `PoolClosed` once the pool is closed, including for
    /// waiters already queued when close happens.
    pub async fn acquire(&self) -> Result<TabGuard<E>, GatewayError> {
        let permit = self.permits.acquire().await?;
        permit.forget();

        // A forgotten permit corresponds to exactly one idle session, except
        // when close() drained the idle set after this waiter was admitted.
        let session = self.idle.lock().unwrap().pop_front();
        match session {
            Some(session) => Ok(TabGuard {
                session: Some(session),
                pool: self.clone(),
            }),
            None => Err(GatewayError::PoolClosed),
        }
    }

    /// Return a tab to the pool and wake the longest-waiting acquirer.
    ///
    /// Accepts the tab regardless of what happened to it while borrowed.
    /// After close the session group no longer exists, so the tab is dropped.
    pub fn release(&self, session: E::Session) {
        if self.permits.is_closed() {
            debug!("Tab returned after close, dropping");
            return;
        }

        self.idle.lock().unwrap().push_back(session);
        self.permits.add_permits(1);
    }

    /// Tear down the session group. Idempotent; the first call wins and
    /// subsequent calls are no-ops.
    pub async fn close(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if *lifecycle == Lifecycle::Closed {
            return;
        }
        let was_ready = *lifecycle == Lifecycle::Ready;
        *lifecycle = Lifecycle::Closed;

        self.permits.close();
        self.idle.lock().unwrap().clear();

        if was_ready {
            self.engine.shutdown().await;
        }

        info!("Browser pool closed");
    }
}

impl<E: BrowserEngine> Clone for BrowserPool<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            capacity: self.capacity,
            lifecycle: self.lifecycle.clone(),
            idle: self.idle.clone(),
            permits: self.permits.clone(),
        }
    }
}

/// Exclusive loan of one browser tab.
///
/// Dropping the guard returns the tab, so release happens on success, error
/// and cancellation paths alike.
pub struct TabGuard<E: BrowserEngine> {
    session: Option<E::Session>,
    pool: BrowserPool<E>,
}

impl<E: BrowserEngine> TabGuard<E> {
    pub fn session(&self) -> &E::Session {
        // Present from construction until drop.
        self.session.as_ref().expect("tab guard holds a session")
    }
}

impl<E: BrowserEngine> Drop for TabGuard<E> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.pool.release(session);
        }
    }
}
