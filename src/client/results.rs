//! Submitting and cancelling query tasks through the results endpoint.

use crate::error::{Error, Result};
use crate::observer::ClientEvent;
use crate::types::{QueryTaskResult, ResultResponse};

use super::QueryTaskClient;

impl QueryTaskClient {
    /// Report `count` as the result of task `task_id`
    ///
    /// Neither the task id nor the count is checked locally.
    pub async fn submit_query_result(&self, task_id: &str, count: i64) -> Result<()> {
        self.post_result(QueryTaskResult::completed(task_id, count))
            .await
    }

    /// Cancel task `task_id` by posting a result without a count
    ///
    /// Whether cancelling the same task twice succeeds is up to the service.
    pub async fn cancel_query_task(&self, task_id: &str) -> Result<()> {
        self.post_result(QueryTaskResult::cancelled(task_id)).await
    }

    /// Post a result payload and check both the HTTP status and the body status
    ///
    /// # Errors
    /// - [`Error::RemoteRequest`] for any non-2xx status
    /// - [`Error::ResponseFormat`] when a 2xx body is not a result response
    /// - [`Error::RemoteLogicalFailure`] when a 2xx body carries a status other than "OK"
    /// - [`Error::Network`] when the service cannot be reached
    async fn post_result(&self, result: QueryTaskResult) -> Result<()> {
        let response = self
            .http
            .post(self.submit_url.clone())
            .json(&result)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.request_failed(&self.submit_url, response).await);
        }

        // A 2xx alone is not success; the body has the final say
        let body = response.text().await?;
        let status = match serde_json::from_str::<Option<ResultResponse>>(&body) {
            Ok(Some(parsed)) if parsed.is_ok() => {
                self.emit(ClientEvent::ResultAccepted {
                    task_id: result.task_id,
                    cancelled: result.count.is_none(),
                });
                return Ok(());
            }
            Ok(parsed) => parsed.and_then(|r| r.status),
            Err(e) => {
                return Err(self.invalid_response(
                    &self.submit_url,
                    format!("not a result response: {}", e),
                    body,
                    Some(e),
                ));
            }
        };

        self.emit(ClientEvent::UnsuccessfulResult {
            endpoint: self.submit_url.to_string(),
            body: body.clone(),
        });
        Err(Error::RemoteLogicalFailure {
            endpoint: self.submit_url.to_string(),
            status,
            body,
        })
    }
}
