//! Wire types exchanged with the remote query-distribution service

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status value the results endpoint reports when an operation succeeded
pub const RESULT_STATUS_OK: &str = "OK";

/// Request body for the fetch-query endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchQueryRequest {
    /// Collection (biobank) asking for work
    pub collection_id: String,
}

/// A query task issued by the remote service
///
/// Only the task identifier is interpreted by this crate. Every other field in
/// the payload is kept as-is in [`QueryTask::payload`] for the query executor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryTask {
    /// Identifier used to submit or cancel the task
    pub task_id: String,

    /// Remaining task fields (the query itself, owner, project, ...)
    ///
    /// Must not contain a `"task_id"` key, or serialization writes it twice.
    /// [`QueryTask::with_payload`] strips it.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl QueryTask {
    /// Create a task with an identifier and no payload
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            payload: Map::new(),
        }
    }

    /// Create a task from an identifier and its remaining fields
    ///
    /// A `"task_id"` entry in `payload` is dropped in favour of `task_id`.
    pub fn with_payload(task_id: impl Into<String>, mut payload: Map<String, Value>) -> Self {
        payload.remove("task_id");
        Self {
            task_id: task_id.into(),
            payload,
        }
    }

    /// Look up a payload field by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }
}

/// Body posted to the results endpoint
///
/// A present `count` submits a result; an absent one asks the service to
/// cancel the task. `count` is always serialized, as `null` when cancelling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTaskResult {
    /// Task the result belongs to
    pub task_id: String,
    /// Query result, or `None` to cancel
    pub count: Option<i64>,
}

impl QueryTaskResult {
    /// Result of a completed query execution
    pub fn completed(task_id: impl Into<String>, count: i64) -> Self {
        Self {
            task_id: task_id.into(),
            count: Some(count),
        }
    }

    /// Cancellation request for a task that cannot be executed
    pub fn cancelled(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            count: None,
        }
    }

    /// Whether this payload cancels the task instead of completing it
    pub fn is_cancellation(&self) -> bool {
        self.count.is_none()
    }
}

/// Acknowledgement returned by the results endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultResponse {
    /// Service-level status; only [`RESULT_STATUS_OK`] means success
    ///
    /// The key must be present, but may be `null`.
    #[serde(deserialize_with = "nullable_status")]
    pub status: Option<String>,
}

impl ResultResponse {
    /// Whether the service reported success
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some(RESULT_STATUS_OK)
    }
}

// Without `default`, a custom deserializer keeps the field required
fn nullable_status<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_task_keeps_unknown_fields_in_payload() {
        let task: QueryTask = serde_json::from_value(json!({
            "task_id": "abc",
            "project": "p-1",
            "cohort": {"groups": []}
        }))
        .unwrap();

        assert_eq!(task.task_id, "abc");
        assert_eq!(task.field("project"), Some(&json!("p-1")));
        assert_eq!(task.field("cohort"), Some(&json!({"groups": []})));
        assert!(task.field("task_id").is_none(), "id must not be duplicated");
    }

    #[test]
    fn with_payload_serializes_a_single_task_id() {
        let payload = json!({"task_id": "stale", "project": "p-1"})
            .as_object()
            .unwrap()
            .clone();
        let task = QueryTask::with_payload("abc", payload);

        let body = serde_json::to_string(&task).unwrap();
        assert_eq!(body.matches("task_id").count(), 1, "body: {body}");
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"task_id": "abc", "project": "p-1"})
        );
    }

    #[test]
    fn query_task_without_task_id_is_rejected() {
        let result = serde_json::from_value::<QueryTask>(json!({"project": "p-1"}));
        assert!(result.is_err());
    }

    #[test]
    fn completed_result_serializes_count() {
        let body = serde_json::to_value(QueryTaskResult::completed("abc", 42)).unwrap();
        assert_eq!(body, json!({"task_id": "abc", "count": 42}));
    }

    #[test]
    fn cancellation_serializes_null_count() {
        let result = QueryTaskResult::cancelled("abc");
        assert!(result.is_cancellation());

        let body = serde_json::to_value(result).unwrap();
        assert_eq!(body, json!({"task_id": "abc", "count": null}));
    }

    #[test]
    fn only_exact_ok_status_is_success() {
        for (status, expected) in [("OK", true), ("ok", false), ("ERROR", false), ("", false)] {
            let response = ResultResponse {
                status: Some(status.to_string()),
            };
            assert_eq!(response.is_ok(), expected, "status {status:?}");
        }
    }

    #[test]
    fn result_response_accepts_null_status_but_requires_the_key() {
        let response: ResultResponse = serde_json::from_str(r#"{"status":null}"#).unwrap();
        assert_eq!(response.status, None);
        assert!(!response.is_ok());

        assert!(serde_json::from_str::<ResultResponse>(r#"{"message":"stored"}"#).is_err());
    }

    #[test]
    fn result_response_ignores_extra_fields() {
        let response: ResultResponse =
            serde_json::from_str(r#"{"status":"OK","message":"stored"}"#).unwrap();
        assert!(response.is_ok());
    }
}
