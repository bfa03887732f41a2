//! The connection seam between the adapter and whatever actually talks to Athena.

use async_trait::async_trait;
use quarry_core::{QueryContext, ResultStream};

use crate::client::{AthenaError, SdkConnection};
use crate::config::DriverConfig;

/// An open handle that executes statements.
///
/// Thread-safety and close semantics belong to the implementation; the
/// adapter adds no guard of its own.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn query(
        &self,
        ctx: &QueryContext,
        sql: &str,
    ) -> Result<Box<dyn ResultStream>, AthenaError>;

    async fn close(&self);
}

/// Opens connections from a validated [`DriverConfig`].
#[async_trait]
pub trait ConnectionOpener: Send + Sync {
    async fn open(&self, config: &DriverConfig) -> Result<Box<dyn Connection>, AthenaError>;
}

/// Opens [`SdkConnection`]s backed by the AWS SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdkOpener;

#[async_trait]
impl ConnectionOpener for SdkOpener {
    async fn open(&self, config: &DriverConfig) -> Result<Box<dyn Connection>, AthenaError> {
        let conn = SdkConnection::open(config.clone()).await?;
        Ok(Box::new(conn))
    }
}
