//! AWS Athena connection backed by the AWS SDK.
//!
//! [`SdkConnection`] starts query executions, polls them with
//! exponential backoff until they reach a terminal state, stops them when the
//! caller's [`QueryContext`] is cancelled or expires, and returns a paging
//! [`SdkResultStream`] over the results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecution, QueryExecutionState, ResultConfiguration};
use quarry_core::{QueryContext, ResultStream};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::DriverConfig;
use crate::connection::Connection;
use crate::result::QueryMetadata;
use crate::statement;
use crate::stream::SdkResultStream;

const INITIAL_DELAY_MS: u64 = 200;
const MAX_DELAY_MS: u64 = 2000;
const BACKOFF_FACTOR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors that can occur during Athena operations.
#[derive(Debug, thiserror::Error)]
pub enum AthenaError {
    /// The query execution failed on the Athena side.
    #[error("Query {query_id} failed: {reason}")]
    QueryFailed { query_id: String, reason: String },

    /// Athena reports the query as cancelled.
    #[error("Query {query_id} was cancelled")]
    QueryCancelled { query_id: String },

    /// The caller's context was cancelled. `query_id` is set when the query
    /// had already been started.
    #[error("query cancelled by caller")]
    Cancelled { query_id: Option<String> },

    /// The caller's deadline passed before the query finished.
    #[error("query deadline exceeded")]
    Timeout { query_id: Option<String> },

    #[error("{verb} statements are not allowed in read-only mode")]
    ReadOnly { verb: String },

    #[error("connection is closed")]
    Closed,

    #[error("invalid configuration: {0}")]
    Config(String),

    /// An AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    /// Failed to parse Athena result data.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<AthenaError> for quarry_core::Error {
    fn from(err: AthenaError) -> Self {
        quarry_core::Error::driver(err)
    }
}

pub(crate) fn sdk_err<E>(err: E) -> AthenaError
where
    E: std::error::Error,
{
    AthenaError::AwsSdk(DisplayErrorContext(err).to_string())
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Connection to Athena for a single [`DriverConfig`].
///
/// Safe to share across tasks; every query is an independent execution on
/// the Athena side.
pub struct SdkConnection {
    config: DriverConfig,
    athena_client: aws_sdk_athena::Client,
    closed: AtomicBool,
}

impl SdkConnection {
    /// Load AWS configuration for the configured region and build a client.
    ///
    /// When a workgroup is configured and remote creation is allowed, the
    /// workgroup is created if it does not exist yet.
    pub async fn open(config: DriverConfig) -> Result<Self, AthenaError> {
        validate_output_location(config.output_location.as_deref())?;

        let region = aws_sdk_athena::config::Region::new(config.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let conn = Self::from_client(config, aws_sdk_athena::Client::new(&aws_cfg));

        if conn.config.allow_work_group_creation {
            if let Some(work_group) = conn.config.work_group.as_deref() {
                conn.ensure_work_group(work_group).await?;
            }
        }

        info!(
            region = %conn.config.region,
            work_group = ?conn.config.work_group,
            output_location = ?conn.config.output_location,
            read_only = conn.config.read_only,
            "Athena connection opened"
        );

        Ok(conn)
    }

    /// Wrap an already configured SDK client.
    pub fn from_client(config: DriverConfig, athena_client: aws_sdk_athena::Client) -> Self {
        Self {
            config,
            athena_client,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Cancel a running Athena query.
    pub async fn stop_query(&self, query_id: &str) -> Result<(), AthenaError> {
        info!(query_id = %query_id, "Cancelling query");

        self.athena_client
            .stop_query_execution()
            .query_execution_id(query_id)
            .send()
            .await
            .map_err(sdk_err)?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    async fn ensure_work_group(&self, name: &str) -> Result<(), AthenaError> {
        match self.athena_client.get_work_group().work_group(name).send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(
                    work_group = %name,
                    error = %DisplayErrorContext(&e),
                    "Workgroup lookup failed, creating it"
                );
                self.athena_client
                    .create_work_group()
                    .name(name)
                    .send()
                    .await
                    .map_err(sdk_err)?;
                info!(work_group = %name, "Created Athena workgroup");
                Ok(())
            }
        }
    }

    async fn start_query(&self, sql: &str) -> Result<String, AthenaError> {
        let mut request = self.athena_client.start_query_execution().query_string(sql);

        if let Some(work_group) = &self.config.work_group {
            request = request.work_group(work_group);
        }
        if let Some(output_location) = &self.config.output_location {
            request = request.result_configuration(
                ResultConfiguration::builder()
                    .output_location(output_location)
                    .build(),
            );
        }

        let resp = request.send().await.map_err(sdk_err)?;

        resp.query_execution_id()
            .map(str::to_string)
            .ok_or_else(|| AthenaError::AwsSdk("No query execution ID returned".into()))
    }

    /// Poll `GetQueryExecution` with exponential backoff until the query
    /// reaches a terminal state, or stop it when `ctx` is cancelled or its
    /// deadline passes.
    async fn poll_until_complete(
        &self,
        ctx: &QueryContext,
        query_id: &str,
    ) -> Result<QueryExecution, AthenaError> {
        let start = Instant::now();
        let mut delay_ms = INITIAL_DELAY_MS;

        loop {
            let resp = self
                .athena_client
                .get_query_execution()
                .query_execution_id(query_id)
                .send()
                .await
                .map_err(sdk_err)?;

            let qe = resp
                .query_execution()
                .ok_or_else(|| AthenaError::AwsSdk("No query execution in response".into()))?
                .clone();

            let state = qe
                .status()
                .and_then(|s| s.state())
                .cloned()
                .unwrap_or(QueryExecutionState::Queued);

            debug!(
                query_id = %query_id,
                state = ?state,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Polling query status"
            );

            match state {
                QueryExecutionState::Succeeded => return Ok(qe),

                QueryExecutionState::Failed => {
                    let reason = qe
                        .status()
                        .and_then(|s| s.state_change_reason())
                        .unwrap_or("unknown")
                        .to_string();
                    return Err(AthenaError::QueryFailed {
                        query_id: query_id.to_string(),
                        reason,
                    });
                }

                QueryExecutionState::Cancelled => {
                    return Err(AthenaError::QueryCancelled {
                        query_id: query_id.to_string(),
                    });
                }

                // Queued | Running | unknown future variant
                _ => {}
            }

            if ctx.is_cancelled() {
                warn!(query_id = %query_id, "Query cancelled by caller, stopping");
                // Best-effort stop; the caller gets the cancellation either way.
                let _ = self.stop_query(query_id).await;
                return Err(AthenaError::Cancelled {
                    query_id: Some(query_id.to_string()),
                });
            }

            if ctx.is_expired() {
                warn!(query_id = %query_id, "Query deadline exceeded, stopping");
                let _ = self.stop_query(query_id).await;
                return Err(AthenaError::Timeout {
                    query_id: Some(query_id.to_string()),
                });
            }

            let mut wake = Instant::now() + Duration::from_millis(delay_ms + jitter_ms());
            if let Some(deadline) = ctx.deadline() {
                wake = wake.min(deadline);
            }
            tokio::select! {
                _ = tokio::time::sleep_until(wake) => {}
                _ = ctx.cancelled() => {}
            }

            delay_ms = next_delay_ms(delay_ms);
        }
    }
}

#[async_trait]
impl Connection for SdkConnection {
    async fn query(
        &self,
        ctx: &QueryContext,
        sql: &str,
    ) -> Result<Box<dyn ResultStream>, AthenaError> {
        if self.is_closed() {
            return Err(AthenaError::Closed);
        }
        if self.config.read_only {
            if let Some(verb) = statement::write_verb(sql) {
                return Err(AthenaError::ReadOnly { verb });
            }
        }
        if ctx.is_cancelled() {
            return Err(AthenaError::Cancelled { query_id: None });
        }
        if ctx.is_expired() {
            return Err(AthenaError::Timeout { query_id: None });
        }

        debug!(sql = %sql, "Starting Athena query");
        let query_id = self.start_query(sql).await?;
        let qe = self.poll_until_complete(ctx, &query_id).await?;

        let metadata = extract_metadata(&query_id, &qe);
        if let Some(report) = cost_report(&self.config, &metadata) {
            info!(
                query_id = %metadata.query_id,
                billed_bytes = metadata.billed_bytes(),
                "{report}"
            );
        }

        let stream =
            SdkResultStream::open(self.athena_client.clone(), query_id, qe.statement_type())
                .await?;
        Ok(Box::new(stream))
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(region = %self.config.region, "Athena connection closed");
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn validate_output_location(location: Option<&str>) -> Result<(), AthenaError> {
    match location {
        Some(loc) if !loc.starts_with("s3://") => Err(AthenaError::Config(format!(
            "s3_staging_dir must start with s3://, got {loc:?}"
        ))),
        _ => Ok(()),
    }
}

/// Cost line logged after a successful query, `None` when moneywise is off.
fn cost_report(config: &DriverConfig, metadata: &QueryMetadata) -> Option<String> {
    config.moneywise.then(|| metadata.to_string())
}

/// Jitter without rand: nanosecond fraction of the current time, in [0, 100).
fn jitter_ms() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    u64::from(nanos % 100)
}

fn next_delay_ms(delay_ms: u64) -> u64 {
    ((delay_ms as f64 * BACKOFF_FACTOR) as u64).min(MAX_DELAY_MS)
}

/// Extract [`QueryMetadata`] from an SDK `QueryExecution`.
fn extract_metadata(query_id: &str, qe: &QueryExecution) -> QueryMetadata {
    let stats = qe.statistics();
    let status = qe.status();

    QueryMetadata {
        query_id: query_id.to_string(),
        bytes_scanned: stats
            .and_then(|s| s.data_scanned_in_bytes())
            .unwrap_or(0)
            .max(0) as u64,
        execution_time_ms: stats
            .and_then(|s| s.engine_execution_time_in_millis())
            .unwrap_or(0)
            .max(0) as u64,
        state: status
            .and_then(|s| s.state())
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        output_location: qe
            .result_configuration()
            .and_then(|rc| rc.output_location())
            .map(|s| s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests — no AWS calls
// ---------------------------------------------------------------------------
