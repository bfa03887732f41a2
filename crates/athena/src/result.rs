use std::fmt;

use serde::{Deserialize, Serialize};

/// Athena pricing: $5 per TB scanned.
const DOLLARS_PER_BYTE: f64 = 5.0 / (1024.0 * 1024.0 * 1024.0 * 1024.0);

/// Athena bills at least 10 MB for every query that scans data.
const MIN_BILLED_BYTES: u64 = 10 * 1024 * 1024;

/// Execution metadata for a completed Athena query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryMetadata {
    /// Athena query execution ID.
    pub query_id: String,
    /// Total bytes scanned during execution.
    pub bytes_scanned: u64,
    /// Engine execution time in milliseconds.
    pub execution_time_ms: u64,
    /// Final execution state ("SUCCEEDED", "FAILED", "CANCELLED").
    pub state: String,
    /// S3 output location where results were written, if available.
    pub output_location: Option<String>,
}

impl QueryMetadata {
    /// Bytes Athena charges for: zero when nothing was scanned, otherwise at
    /// least [`MIN_BILLED_BYTES`].
    pub fn billed_bytes(&self) -> u64 {
        if self.bytes_scanned == 0 {
            0
        } else {
            self.bytes_scanned.max(MIN_BILLED_BYTES)
        }
    }

    /// Estimated query cost in USD.
    pub fn cost_estimate_usd(&self) -> f64 {
        self.billed_bytes() as f64 * DOLLARS_PER_BYTE
    }
}

impl fmt::Display for QueryMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Query {} | {:.3} MB scanned | {}ms | ${:.6}",
            self.query_id,
            self.bytes_scanned as f64 / (1024.0 * 1024.0),
            self.execution_time_ms,
            self.cost_estimate_usd(),
        )
    }
}
