//! Fetching waiting query tasks.

use crate::error::Result;
use crate::observer::ClientEvent;
use crate::types::{FetchQueryRequest, QueryTask};
use reqwest::StatusCode;

use super::QueryTaskClient;

impl QueryTaskClient {
    /// Ask the service for the next task queued for `collection_id`
    ///
    /// The collection id is sent as given; rejecting an empty one is up to
    /// the caller.
    ///
    /// # Returns
    /// - `Ok(None)` when the service answers 204 No Content
    /// - `Ok(Some(task))` when a 2xx body parses as a [`QueryTask`]
    ///
    /// # Errors
    /// - [`Error::RemoteRequest`](crate::Error::RemoteRequest) for any non-2xx status
    /// - [`Error::ResponseFormat`](crate::Error::ResponseFormat) when the body is not a
    ///   task; the raw body is kept on the error
    /// - [`Error::Network`](crate::Error::Network) when the service cannot be reached
    pub async fn fetch_query(&self, collection_id: &str) -> Result<Option<QueryTask>> {
        let request = FetchQueryRequest {
            collection_id: collection_id.to_string(),
        };

        let response = self
            .http
            .post(self.fetch_url.clone())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.request_failed(&self.fetch_url, response).await);
        }

        if response.status() == StatusCode::NO_CONTENT {
            self.emit(ClientEvent::NoTaskWaiting {
                collection_id: collection_id.to_string(),
            });
            return Ok(None);
        }

        let body = response.text().await?;
        let task = match serde_json::from_str::<Option<QueryTask>>(&body) {
            Ok(Some(task)) => task,
            Ok(None) => {
                return Err(self.invalid_response(
                    &self.fetch_url,
                    "response body is null",
                    body,
                    None,
                ));
            }
            Err(e) => {
                return Err(self.invalid_response(
                    &self.fetch_url,
                    format!("not a query task: {}", e),
                    body,
                    Some(e),
                ));
            }
        };

        if task.task_id.is_empty() {
            return Err(self.invalid_response(
                &self.fetch_url,
                "task_id is empty",
                body,
                None,
            ));
        }

        self.emit(ClientEvent::TaskFound {
            task_id: task.task_id.clone(),
        });
        Ok(Some(task))
    }
}
