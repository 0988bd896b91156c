//! Diagnostics hooks for the query task client
//!
//! The client never logs directly. It reports what happened through a
//! [`ClientObserver`], so protocol handling stays free of side effects and
//! callers decide where diagnostics go. [`TracingObserver`] is the default and
//! emits `tracing` events; a `broadcast::Sender<ClientEvent>` can be used to
//! fan events out to subscribers instead.

use serde::Serialize;
use tokio::sync::broadcast;

/// Something noteworthy observed while talking to the remote service
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// The fetch endpoint had nothing queued for the collection
    NoTaskWaiting {
        /// Collection that polled
        collection_id: String,
    },

    /// The fetch endpoint handed out a task
    TaskFound {
        /// Identifier of the task
        task_id: String,
    },

    /// A response body did not have the expected shape
    InvalidResponse {
        /// Endpoint URL the response came from
        endpoint: String,
        /// Raw response body
        body: String,
    },

    /// The remote service answered with a non-success status code
    RequestFailed {
        /// Endpoint URL the request was sent to
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// The results endpoint reported a status other than "OK"
    UnsuccessfulResult {
        /// Endpoint URL the response came from
        endpoint: String,
        /// Raw response body
        body: String,
    },

    /// The results endpoint acknowledged a submission or cancellation
    ResultAccepted {
        /// Task the result belonged to
        task_id: String,
        /// Whether the task was cancelled rather than completed
        cancelled: bool,
    },
}

/// Receives [`ClientEvent`]s from a query task client
pub trait ClientObserver: Send + Sync {
    /// Called synchronously for every event; implementations must not block
    fn notify(&self, event: &ClientEvent);
}

/// Observer that writes events to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ClientObserver for TracingObserver {
    fn notify(&self, event: &ClientEvent) {
        match event {
            ClientEvent::NoTaskWaiting { collection_id } => {
                tracing::info!(collection_id = %collection_id, "no query tasks waiting");
            }
            ClientEvent::TaskFound { task_id } => {
                tracing::info!(task_id = %task_id, "found query task");
            }
            ClientEvent::InvalidResponse { endpoint, body } => {
                tracing::error!(endpoint = %endpoint, "invalid response format");
                tracing::debug!(endpoint = %endpoint, body = %body, "invalid response body");
            }
            ClientEvent::RequestFailed { endpoint, status } => {
                tracing::error!(endpoint = %endpoint, status = *status, "request failed");
            }
            ClientEvent::UnsuccessfulResult { endpoint, body } => {
                tracing::error!(endpoint = %endpoint, "unsuccessful response from results endpoint");
                tracing::debug!(endpoint = %endpoint, body = %body, "response body");
            }
            ClientEvent::ResultAccepted { task_id, cancelled } => {
                tracing::info!(task_id = %task_id, cancelled, "result accepted");
            }
        }
    }
}

/// Observer that discards every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ClientObserver for NoopObserver {
    fn notify(&self, _event: &ClientEvent) {}
}

impl ClientObserver for broadcast::Sender<ClientEvent> {
    fn notify(&self, event: &ClientEvent) {
        // No subscribers is not an error
        self.send(event.clone()).ok();
    }
}
