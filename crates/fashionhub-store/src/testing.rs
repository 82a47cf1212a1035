//! # Test Transport
//!
//! An in-memory [`Transport`] that records every request and answers from a
//! queue or a routing function. Used by this crate's unit tests and by the
//! dashboard's tests, which enable the `testing` feature.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fashionhub_store::testing::RecordingTransport;
//! use fashionhub_store::transport::StoreResponse;
//!
//! let transport = Arc::new(RecordingTransport::new());
//! transport.respond(StoreResponse::new(200, "[]"));
//! assert_eq!(transport.request_count(), 0);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::transport::{StoreRequest, StoreResponse, Transport, TransportError};

type Router = Arc<dyn Fn(&StoreRequest) -> StoreResponse + Send + Sync>;

/// Records requests; replies with queued responses first, then the router
/// (or `200 []` when there is none).
#[derive(Default)]
pub struct RecordingTransport {
    queue: Mutex<VecDeque<Result<StoreResponse, String>>>,
    requests: Mutex<Vec<StoreRequest>>,
    router: Option<Router>,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every request that has no queued response with `router`.
    pub fn routed(router: impl Fn(&StoreRequest) -> StoreResponse + Send + Sync + 'static) -> Self {
        RecordingTransport {
            router: Some(Arc::new(router)),
            ..Default::default()
        }
    }

    /// Holds every response for `delay` (to overlap concurrent reads).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues one response.
    pub fn respond(&self, response: StoreResponse) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Ok(response));
        }
    }

    /// Queues one transport failure.
    pub fn fail(&self, reason: &str) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Err(reason.to_string()));
        }
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<StoreRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<StoreRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: StoreRequest) -> Result<StoreResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        match queued {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(TransportError(reason)),
            None => Ok(match &self.router {
                Some(router) => router(&request),
                None => StoreResponse::new(200, "[]"),
            }),
        }
    }
}
