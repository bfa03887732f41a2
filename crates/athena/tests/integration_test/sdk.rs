//! Tests for SdkConnection checks that run before any AWS call.

use std::time::Duration;

use aws_sdk_athena::config::{BehaviorVersion, Region};
use quarry_athena::{AthenaError, Connection, DriverConfig, SdkConnection};
use quarry_core::QueryContext;

fn offline_connection(config: DriverConfig) -> SdkConnection {
    let sdk_config = aws_sdk_athena::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .build();
    SdkConnection::from_client(config, aws_sdk_athena::Client::from_conf(sdk_config))
}

fn config() -> DriverConfig {
    DriverConfig::from_url("athena://eu-west-1?work_group=wg").expect("valid url")
}

#[tokio::test]
async fn test_read_only_rejects_writes() {
    let conn = offline_connection(config());

    for (sql, verb) in [
        ("DROP TABLE t", "DROP"),
        ("insert into t select 1", "INSERT"),
        ("-- note\nCREATE TABLE t AS SELECT 1", "CREATE"),
    ] {
        let err = conn
            .query(&QueryContext::background(), sql)
            .await
            .err()
            .expect("must fail");
        assert!(matches!(err, AthenaError::ReadOnly { verb: ref v } if v == verb), "{sql}");
    }
}

#[tokio::test]
async fn test_closed_connection_rejects_queries() {
    let conn = offline_connection(config());

    conn.close().await;
    assert!(conn.is_closed());
    // Second close is a no-op.
    conn.close().await;

    let err = conn
        .query(&QueryContext::background(), "SELECT 1")
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, AthenaError::Closed));
}

#[tokio::test]
async fn test_cancelled_context_skips_execution() {
    let conn = offline_connection(config());
    let ctx = QueryContext::background();
    ctx.cancel();

    let err = conn.query(&ctx, "SELECT 1").await.err().expect("must fail");
    assert!(matches!(err, AthenaError::Cancelled { query_id: None }));
}

#[tokio::test]
async fn test_expired_context_skips_execution() {
    let conn = offline_connection(config());
    let ctx = QueryContext::with_timeout(Duration::ZERO);

    let err = conn.query(&ctx, "SELECT 1").await.err().expect("must fail");
    assert!(matches!(err, AthenaError::Timeout { query_id: None }));
}

#[tokio::test]
async fn test_invalid_staging_dir_fails_open() {
    let cfg = DriverConfig::from_url("athena://eu-west-1?s3_staging_dir=bucket/path").unwrap();
    let err = SdkConnection::open(cfg).await.err().expect("must fail");
    assert!(matches!(err, AthenaError::Config(_)));
}

/// Requires AWS credentials and network access.
///
/// Run with: `cargo test -p quarry-athena test_real_athena_query -- --ignored`
/// after exporting `ATHENA_URL=athena://<region>?work_group=<wg>`.
#[tokio::test]
#[ignore]
async fn test_real_athena_query() {
    use quarry_athena::Athena;
    use quarry_core::{collect_rows, Adapter, Driver, Value};

    let url = std::env::var("ATHENA_URL").expect("ATHENA_URL must be set");
    let mut driver = Athena::new().connect(&url).await.expect("connect");

    let mut stream = driver
        .query(&QueryContext::background(), "SELECT 1 AS test_column")
        .await
        .expect("query");
    assert_eq!(stream.header(), ["test_column".to_string()]);

    let rows = collect_rows(stream.as_mut()).await.expect("rows");
    assert_eq!(rows, vec![vec![Value::Int(1)]]);

    let tree = driver.structure().await.expect("structure");
    assert!(!tree.is_empty());

    driver.close().await;
}
