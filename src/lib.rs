//! # query-task-connector
//!
//! Client for the remote query-distribution API of a federated query network,
//! used by a data-holding collection (biobank) to:
//! - **poll** for a waiting query task,
//! - **submit** the count produced by running it,
//! - **cancel** a task it cannot run.
//!
//! ## Design Philosophy
//!
//! - **Explicit outcomes** - every response becomes either a value or one
//!   specific [`Error`] kind; nothing is retried or swallowed
//! - **Dual success check** - a result is only accepted when the HTTP status is
//!   2xx *and* the body reports `"OK"`
//! - **Side-effect free core** - diagnostics go through an injected
//!   [`ClientObserver`] instead of being logged inline
//!
//! ## Quick Start
//!
//! ```no_run
//! use query_task_connector::{ApiConfig, QueryTaskClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QueryTaskClient::new(&ApiConfig::new("https://rquest.example.org/api"))?;
//!
//!     if let Some(task) = client.fetch_query("RQ-CC-1234").await? {
//!         let count = 42; // run the query locally
//!         client.submit_query_result(&task.task_id, count).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Query task client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Client diagnostics hooks
pub mod observer;
/// Periodic polling and task execution
pub mod poller;
/// Wire types
pub mod types;

// Re-export commonly used types
pub use client::{QueryTaskApi, QueryTaskClient};
pub use config::{ApiConfig, Config, PollingConfig};
pub use error::{Error, Result};
pub use observer::{ClientEvent, ClientObserver, NoopObserver, TracingObserver};
pub use poller::{PollOutcome, QueryExecutor, QueryPoller};
pub use types::{FetchQueryRequest, QueryTask, QueryTaskResult, RESULT_STATUS_OK, ResultResponse};
