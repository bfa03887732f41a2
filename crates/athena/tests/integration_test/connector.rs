//! Tests for Athena::connect: URL validation, config mapping, open failures.

use quarry_athena::Athena;
use quarry_core::{Adapter, Driver, Error, TableOptions};

use crate::support::FakeOpener;

#[tokio::test]
async fn test_connect_with_work_group() {
    let opener = FakeOpener::default();
    let athena = Athena::with_opener(opener.clone());

    athena
        .connect_driver("athena://eu-central-1?work_group=nxAthena-v1")
        .await
        .expect("connect");

    assert_eq!(opener.open_count(), 1);
    let cfg = opener.last_config().unwrap();
    assert_eq!(cfg.region, "eu-central-1");
    assert_eq!(cfg.work_group.as_deref(), Some("nxAthena-v1"));
    assert!(!cfg.allow_work_group_creation);
    assert!(cfg.read_only);
    assert!(cfg.moneywise);
}

#[tokio::test]
async fn test_connect_with_all_options() {
    let opener = FakeOpener::default();
    let athena = Athena::with_opener(opener.clone());

    athena
        .connect_driver(
            "awsathena://us-east-2?s3_staging_dir=s3://results/athena/&read_only=false&moneywise=false",
        )
        .await
        .expect("connect");

    let cfg = opener.last_config().unwrap();
    assert_eq!(cfg.region, "us-east-2");
    assert_eq!(cfg.work_group, None);
    assert_eq!(cfg.output_location.as_deref(), Some("s3://results/athena/"));
    assert!(!cfg.read_only);
    assert!(!cfg.moneywise);
}

#[tokio::test]
async fn test_missing_region_never_opens() {
    let opener = FakeOpener::default();
    let athena = Athena::with_opener(opener.clone());

    for url in [
        "athena://?work_group=wg",
        "athena:///?s3_staging_dir=s3://b/",
        "athena://",
    ] {
        let err = athena.connect_driver(url).await.err().expect("must fail");
        assert!(matches!(err, Error::MissingRegion(_)), "{url}: {err}");
    }
    assert_eq!(opener.open_count(), 0);
}

#[tokio::test]
async fn test_missing_work_group_and_staging_dir() {
    let opener = FakeOpener::default();
    let athena = Athena::with_opener(opener.clone());

    let err = athena
        .connect_driver("athena://eu-west-1?read_only=true")
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, Error::MissingParameter(_)));
    assert_eq!(
        err.to_string(),
        "one of work_group or s3_staging_dir must be set in: athena://eu-west-1?read_only=true"
    );
    assert_eq!(opener.open_count(), 0);
}

#[tokio::test]
async fn test_unexpected_scheme_and_malformed_url() {
    let opener = FakeOpener::default();
    let athena = Athena::with_opener(opener.clone());

    let err = athena
        .connect_driver("mysql://eu-west-1?work_group=wg")
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, Error::UnexpectedScheme(_)));

    let err = athena.connect_driver("::not-a-url").await.err().expect("must fail");
    assert!(matches!(err, Error::MalformedUrl(_)));

    assert_eq!(opener.open_count(), 0);
}

#[tokio::test]
async fn test_read_only_defaults_on() {
    let opener = FakeOpener::default();
    let athena = Athena::with_opener(opener.clone());

    for value in ["", "true", "False", "0", "off", "yes"] {
        let url = format!("athena://eu-west-1?work_group=wg&read_only={value}");
        athena.connect_driver(&url).await.expect("connect");
        assert!(opener.last_config().unwrap().read_only, "{url}");
    }
}

#[tokio::test]
async fn test_open_failure_is_wrapped() {
    let opener = FakeOpener::failing();
    let athena = Athena::with_opener(opener.clone());

    let err = athena
        .connect_driver("athena://eu-west-1?work_group=wg")
        .await
        .err()
        .expect("must fail");

    assert!(matches!(err, Error::Connect { backend: "athena", .. }));
    assert_eq!(
        err.to_string(),
        "unable to connect to athena: invalid configuration: bucket unreachable"
    );
    assert_eq!(opener.open_count(), 1);
}

#[tokio::test]
async fn test_connect_through_adapter_trait() {
    let opener = FakeOpener::default();
    let adapter: Box<dyn Adapter> = Box::new(Athena::with_opener(opener.clone()));

    let mut driver = adapter
        .connect("athena://eu-west-1?work_group=wg")
        .await
        .expect("connect");
    driver.close().await;

    assert!(opener.connection.is_closed());
    assert_eq!(
        adapter.helpers(&TableOptions::new("s", "t"))["Tables"],
        "SHOW TABLES IN s;"
    );
}
