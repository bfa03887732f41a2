//! Lazily consumed query results.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::Result;
use crate::value::Row;

/// Sequence of rows produced by a query.
///
/// Consumers call [`next_row`](Self::next_row) until it returns `Ok(None)`
/// (exhausted) or an error. Implementations may fetch more data from the
/// backend between calls.
#[async_trait]
pub trait ResultStream: Send {
    /// Column labels, in row order.
    fn header(&self) -> &[String];

    async fn next_row(&mut self) -> Result<Option<Row>>;
}

/// A result stream over rows that are already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    header: Vec<String>,
    rows: VecDeque<Row>,
}

impl MemoryStream {
    pub fn new(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            header,
            rows: rows.into(),
        }
    }
}

#[async_trait]
impl ResultStream for MemoryStream {
    fn header(&self) -> &[String] {
        &self.header
    }

    async fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}

/// Drain a stream into memory. Stops at the first error.
pub async fn collect_rows(stream: &mut dyn ResultStream) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    while let Some(row) = stream.next_row().await? {
        rows.push(row);
    }
    Ok(rows)
}
