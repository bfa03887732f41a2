//! Cancellation and deadline carrier for query execution.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Execution context handed to [`Driver::query`](crate::Driver::query).
///
/// The adapter never enforces anything itself; the connection that runs the
/// statement checks [`is_cancelled`](Self::is_cancelled) and
/// [`deadline`](Self::deadline) while it waits.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves when the context is cancelled. Never resolves for a
    /// background context.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
