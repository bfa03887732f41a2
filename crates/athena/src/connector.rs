//! Athena entry point: URL → configured connection → [`AthenaDriver`].

use std::collections::HashMap;

use async_trait::async_trait;
use quarry_core::{Adapter, Driver, Error, TableOptions};
use tracing::info;

use crate::config::{DriverConfig, SCHEMES};
use crate::connection::{ConnectionOpener, SdkOpener};
use crate::driver::AthenaDriver;
use crate::sdk_env;

/// Athena adapter.
///
/// The connection URL looks like
///
/// ```text
/// athena://<region>[?options]
/// ```
///
/// where `region` is the AWS region queries run in and `options` is an
/// `&`-separated list of:
///
/// - `work_group`: Athena workgroup to run queries in
/// - `s3_staging_dir`: S3 bucket and path for results and metadata
/// - `read_only`: `false` allows write statements (default `true`)
/// - `moneywise`: `false` turns off cost reporting (default `true`)
///
/// At least one of `work_group` and `s3_staging_dir` is required.
/// `awsathena://` is accepted as an alias.
#[derive(Debug, Clone, Default)]
pub struct Athena<O = SdkOpener> {
    opener: O,
}

impl Athena {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: ConnectionOpener> Athena<O> {
    /// Use a custom opener, e.g. to connect through a pre-built client.
    pub fn with_opener(opener: O) -> Self {
        Self { opener }
    }

    /// Validate `url`, open a connection and wrap it in a driver.
    pub async fn connect_driver(&self, url: &str) -> Result<AthenaDriver, Error> {
        sdk_env::init();

        let config = DriverConfig::from_url(url)?;
        let conn = self
            .opener
            .open(&config)
            .await
            .map_err(|e| Error::Connect {
                backend: "athena",
                source: Box::new(e),
            })?;

        info!(
            region = %config.region,
            work_group = ?config.work_group,
            read_only = config.read_only,
            moneywise = config.moneywise,
            "connected to athena"
        );

        Ok(AthenaDriver::new(conn))
    }
}

#[async_trait]
impl<O: ConnectionOpener + 'static> Adapter for Athena<O> {
    fn schemes(&self) -> &[&'static str] {
        &SCHEMES
    }

    async fn connect(&self, url: &str) -> Result<Box<dyn Driver>, Error> {
        Ok(Box::new(self.connect_driver(url).await?))
    }

    fn helpers(&self, opts: &TableOptions) -> HashMap<String, String> {
        helper_queries(opts)
    }
}

/// Canned statements for browsing a table.
pub fn helper_queries(opts: &TableOptions) -> HashMap<String, String> {
    let TableOptions { schema, table } = opts;
    HashMap::from([
        (
            "List".to_string(),
            format!(r#"SELECT * from "{schema}"."{table}" LIMIT 500;"#),
        ),
        ("Columns".to_string(), format!("DESCRIBE {schema}.{table};")),
        ("Tables".to_string(), format!("SHOW TABLES IN {schema};")),
        ("Views".to_string(), format!("SHOW VIEWS IN {schema};")),
    ])
}
