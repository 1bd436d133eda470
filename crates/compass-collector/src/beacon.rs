use std::sync::{Arc, Mutex, PoisonError};

use reqwest::header::CONTENT_TYPE;

/// Fire-and-forget event delivery.
///
/// `send` takes the serialized payload and returns immediately; there is no
/// delivery confirmation, no retry, and no error path — the same contract as
/// `navigator.sendBeacon`. At-most-once is the accepted tradeoff for never
/// blocking the caller.
pub trait Beacon: Send + Sync {
    fn send(&self, body: String);
}

/// HTTP beacon posting JSON to the ingestion endpoint on a detached task.
///
/// The spawned task owns its client handle, so delivery keeps running even
/// if the tracker that triggered it is dropped — the library analogue of a
/// beacon surviving page unload. Must be constructed inside a tokio runtime.
pub struct HttpBeacon {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpBeacon {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Beacon for HttpBeacon {
    fn send(&self, body: String) {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            match http
                .post(&endpoint)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
            {
                Ok(response) => {
                    tracing::debug!(status = %response.status(), "beacon delivered");
                }
                Err(e) => {
                    // Nothing upstream can act on this.
                    tracing::debug!(error = %e, "beacon delivery failed");
                }
            }
        });
    }
}

/// Recording beacon for tests: collects every payload it was handed.
#[derive(Default, Clone)]
pub struct MemoryBeacon {
    sent: Arc<Mutex<Vec<String>>>,
}

impl MemoryBeacon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Beacon for MemoryBeacon {
    fn send(&self, body: String) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(body);
    }
}
