//! # Query Observer
//!
//! Keeps one view from showing an answer to a question it no longer asks.
//!
//! ```text
//! search "sh"    ──► request #1 ───────────────────────► done (superseded, dropped)
//! search "shirt" ──►        request #2 ──► done (current, applied)
//! ```
//!
//! In-flight requests are not aborted; only the most recently started
//! read's result is applied.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::state::QueryKey;

/// Outcome of an observed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed<T> {
    /// The latest read for this view.
    Current(T),
    /// A newer read started meanwhile; this result was dropped.
    Superseded,
}

impl<T> Observed<T> {
    pub fn current(self) -> Option<T> {
        match self {
            Observed::Current(value) => Some(value),
            Observed::Superseded => None,
        }
    }
}

/// Ticket for one started read.
#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }
}

/// Tracks the current key of one view.
#[derive(Debug, Clone, Default)]
pub struct QueryObserver {
    latest: Arc<AtomicU64>,
    key: Arc<Mutex<Option<QueryKey>>>,
}

impl QueryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as what the view now shows.
    pub fn begin(&self, key: QueryKey) -> Ticket {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut current) = self.key.lock() {
            *current = Some(key);
        }
        Ticket {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    pub fn current_key(&self) -> Option<QueryKey> {
        self.key.lock().ok().and_then(|key| key.clone())
    }

    /// Runs `read` for `key` and keeps its result only if no newer read
    /// began before it finished.
    pub async fn observe<T, Fut>(&self, key: QueryKey, read: Fut) -> Observed<T>
    where
        Fut: Future<Output = T>,
    {
        let ticket = self.begin(key.clone());
        let value = read.await;
        if ticket.is_current() {
            Observed::Current(value)
        } else {
            debug!(%key, "Dropping superseded result");
            Observed::Superseded
        }
    }
}
