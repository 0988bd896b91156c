//! Query task client for the remote query-distribution API
//!
//! The client is decomposed into focused submodules:
//! - `fetch` - polling for a waiting task
//! - `results` - submitting and cancelling tasks through the results endpoint
//!
//! Every response is classified into exactly one outcome: no task, a task,
//! an acknowledged result, or one of the remote [`Error`] kinds.
//! Success on the results endpoint needs both a 2xx status and a body whose
//! status field is `"OK"`.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::observer::{ClientEvent, ClientObserver, TracingObserver};
use crate::types::QueryTask;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

mod fetch;
mod results;


/// Operations offered by the remote query-distribution service
///
/// [`QueryTaskClient`] is the HTTP implementation; the poller depends only on
/// this trait so other transports or test doubles can stand in.
#[async_trait]
pub trait QueryTaskApi: Send + Sync {
    /// Fetch the next waiting task for a collection, `None` when nothing is queued
    async fn fetch_query(&self, collection_id: &str) -> Result<Option<QueryTask>>;

    /// Report the result of an executed task
    async fn submit_query_result(&self, task_id: &str, count: i64) -> Result<()>;

    /// Give a task back to the service without a result
    async fn cancel_query_task(&self, task_id: &str) -> Result<()>;
}

/// HTTP client for the fetch and results endpoints
///
/// Holds only immutable configuration, so clones can be shared freely
/// between tasks polling for different collections.
#[derive(Clone)]
pub struct QueryTaskClient {
    http: reqwest::Client,
    fetch_url: Url,
    submit_url: Url,
    observer: Arc<dyn ClientObserver>,
}

impl std::fmt::Debug for QueryTaskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryTaskClient")
            .field("fetch_url", &self.fetch_url.as_str())
            .field("submit_url", &self.submit_url.as_str())
            .finish_non_exhaustive()
    }
}

impl QueryTaskClient {
    /// Create a client with its own HTTP transport
    ///
    /// # Errors
    /// Returns an error if the configured URLs are invalid or the HTTP client
    /// cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Self::with_http_client(config, http)
    }

    /// Create a client on top of an existing HTTP transport
    ///
    /// Authentication, proxies and timeouts are whatever `http` was built with.
    pub fn with_http_client(config: &ApiConfig, http: reqwest::Client) -> Result<Self> {
        Ok(Self {
            http,
            fetch_url: config.fetch_query_url()?,
            submit_url: config.submit_result_url()?,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the default [`TracingObserver`]
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ClientObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Resolved fetch-query endpoint
    pub fn fetch_url(&self) -> &Url {
        &self.fetch_url
    }

    /// Resolved submit-result endpoint
    pub fn submit_url(&self) -> &Url {
        &self.submit_url
    }

    fn emit(&self, event: ClientEvent) {
        self.observer.notify(&event);
    }

    /// Turn a non-2xx response into [`Error::RemoteRequest`]
    async fn request_failed(&self, endpoint: &Url, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        self.emit(ClientEvent::RequestFailed {
            endpoint: endpoint.to_string(),
            status,
        });
        Error::RemoteRequest {
            endpoint: endpoint.to_string(),
            status,
            body: response.text().await.unwrap_or_default(),
        }
    }

    /// Build [`Error::ResponseFormat`] and report the offending body
    fn invalid_response(
        &self,
        endpoint: &Url,
        reason: impl Into<String>,
        body: String,
        source: Option<serde_json::Error>,
    ) -> Error {
        self.emit(ClientEvent::InvalidResponse {
            endpoint: endpoint.to_string(),
            body: body.clone(),
        });
        Error::ResponseFormat {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
            body,
            source,
        }
    }
}

#[async_trait]
impl QueryTaskApi for QueryTaskClient {
    async fn fetch_query(&self, collection_id: &str) -> Result<Option<QueryTask>> {
        QueryTaskClient::fetch_query(self, collection_id).await
    }

    async fn submit_query_result(&self, task_id: &str, count: i64) -> Result<()> {
        QueryTaskClient::submit_query_result(self, task_id, count).await
    }

    async fn cancel_query_task(&self, task_id: &str) -> Result<()> {
        QueryTaskClient::cancel_query_task(self, task_id).await
    }
}
