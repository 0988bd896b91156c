//! Periodic polling for query tasks
//!
//! [`QueryPoller`] ties the pieces together for one collection: fetch a task,
//! hand it to a [`QueryExecutor`], then submit the count or cancel the task if
//! execution failed. [`QueryPoller::run`] repeats this on a fixed cadence until
//! shut down.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use query_task_connector::{
//!     Config, QueryExecutor, QueryPoller, QueryTask, QueryTaskClient, Result,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! struct CountEverything;
//!
//! #[async_trait]
//! impl QueryExecutor for CountEverything {
//!     async fn execute(&self, _task: &QueryTask) -> Result<i64> {
//!         Ok(0)
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let config = Config::from_file("connector.json")?;
//! let client = QueryTaskClient::new(&config.api)?;
//! let poller = QueryPoller::new(client, CountEverything, config.polling);
//!
//! let shutdown = CancellationToken::new();
//! poller.run(shutdown.clone()).await?;
//! # Ok(())
//! # }
//! ```

use crate::client::QueryTaskApi;
use crate::config::PollingConfig;
use crate::error::{Error, Result};
use crate::types::QueryTask;
use async_trait::async_trait;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Runs a fetched query and produces its count
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `task` against local data
    ///
    /// # Errors
    /// Any error causes the task to be cancelled on the remote service.
    async fn execute(&self, task: &QueryTask) -> Result<i64>;
}

/// What a single polling round did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// No task was waiting
    Idle,
    /// A task was executed and its result accepted
    Submitted {
        /// Task identifier
        task_id: String,
        /// Reported count
        count: i64,
    },
    /// A task could not be executed and was handed back
    Cancelled {
        /// Task identifier
        task_id: String,
        /// Why execution failed
        reason: String,
    },
}

/// Polls the remote service for one collection
pub struct QueryPoller<A, E> {
    api: A,
    executor: E,
    config: PollingConfig,
}

impl<A, E> QueryPoller<A, E>
where
    A: QueryTaskApi,
    E: QueryExecutor,
{
    /// Create a poller for the collection named in `config`
    pub fn new(api: A, executor: E, config: PollingConfig) -> Self {
        Self {
            api,
            executor,
            config,
        }
    }

    /// Polling settings in use
    pub fn config(&self) -> &PollingConfig {
        &self.config
    }

    /// Fetch at most one task, execute it, and report the outcome
    ///
    /// # Errors
    /// Errors from the remote service propagate unchanged. Executor failures
    /// do not; they turn into a cancellation.
    pub async fn poll_once(&self) -> Result<PollOutcome> {
        let collection_id = &self.config.collection_id;

        let Some(task) = self.api.fetch_query(collection_id).await? else {
            return Ok(PollOutcome::Idle);
        };

        match self.executor.execute(&task).await {
            Ok(count) => {
                self.api.submit_query_result(&task.task_id, count).await?;
                info!(task_id = %task.task_id, count, "submitted query result");
                Ok(PollOutcome::Submitted {
                    task_id: task.task_id,
                    count,
                })
            }
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "query execution failed, cancelling task");
                self.api.cancel_query_task(&task.task_id).await?;
                Ok(PollOutcome::Cancelled {
                    task_id: task.task_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Poll every `query_polling_interval` until `shutdown` is cancelled
    ///
    /// Failed rounds are logged and polling continues at the normal cadence.
    /// Shutdown is only observed between rounds; a round in progress runs to
    /// completion, submitting or cancelling any task it fetched.
    ///
    /// # Errors
    /// Returns [`Error::Config`] without polling if the collection id is empty
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        if self.config.collection_id.trim().is_empty() {
            return Err(Error::config(
                "collection id must not be empty",
                "polling.collection_id",
            ));
        }

        info!(
            collection_id = %self.config.collection_id,
            interval = ?self.config.query_polling_interval,
            "query poller started"
        );

        let mut ticker = tokio::time::interval(self.config.query_polling_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            // Shutdown is not observed mid-round
            match self.poll_once().await {
                Ok(PollOutcome::Idle) => {
                    debug!(collection_id = %self.config.collection_id, "no task this round");
                }
                Ok(outcome) => {
                    debug!(outcome = ?outcome, "polling round finished");
                }
                Err(e) => {
                    error!(
                        collection_id = %self.config.collection_id,
                        error = %e,
                        code = e.error_code(),
                        "polling round failed"
                    );
                }
            }
        }

        info!(collection_id = %self.config.collection_id, "query poller stopped");
        Ok(())
    }
}
