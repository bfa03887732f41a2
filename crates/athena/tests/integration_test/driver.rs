//! Tests for AthenaDriver: forwarding, column and structure caching, close.

use quarry_athena::AthenaDriver;
use quarry_core::{collect_rows, Driver, Error, QueryContext, StructureType, TableOptions, Value};

use crate::support::{row, FakeConnection};

fn driver(conn: &FakeConnection) -> AthenaDriver {
    AthenaDriver::new(Box::new(conn.clone()))
}

fn sample_tables() -> Vec<quarry_core::Row> {
    vec![
        row(&["public", "users", "BASE TABLE"]),
        row(&["public", "logs", "VIEW"]),
        row(&["audit", "events", "BASE TABLE"]),
    ]
}

// ── query ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_forwards_statements_unchanged() {
    let conn = FakeConnection::default();
    let driver = driver(&conn);
    let ctx = QueryContext::background();

    for sql in ["SELECT 1", "DELETE FROM t WHERE id = 1", "insert into t values (1)"] {
        let mut stream = driver.query(&ctx, sql).await.expect("query");
        let rows = collect_rows(stream.as_mut()).await.unwrap();
        assert_eq!(rows, vec![vec![Value::from(sql)]]);
        assert_eq!(conn.last_query().as_deref(), Some(sql));
    }
    assert_eq!(conn.calls(), 3);
}

#[tokio::test]
async fn test_query_error_propagates_verbatim() {
    let conn = FakeConnection::failing("SYNTAX_ERROR: line 1:8");
    let driver = driver(&conn);

    let err = driver
        .query(&QueryContext::background(), "SELEC 1")
        .await
        .err()
        .expect("must fail");

    assert!(matches!(err, Error::Driver(_)));
    assert_eq!(err.to_string(), "Query fake-1 failed: SYNTAX_ERROR: line 1:8");
}

// ── structure ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_structure_groups_by_schema() {
    let conn = FakeConnection::with_tables(sample_tables());
    let mut driver = driver(&conn);

    let tree = driver.structure().await.expect("structure");
    assert_eq!(tree.len(), 2);

    let public = tree.iter().find(|s| s.name == "public").expect("public");
    assert_eq!(public.kind, StructureType::None);
    assert_eq!(public.children.len(), 2);
    assert_eq!(public.child("users").unwrap().kind, StructureType::Table);
    assert_eq!(public.child("logs").unwrap().kind, StructureType::View);

    let audit = tree.iter().find(|s| s.name == "audit").expect("audit");
    assert_eq!(audit.children.len(), 1);
    assert_eq!(audit.child("events").unwrap().kind, StructureType::Table);

    assert_eq!(
        conn.last_query().as_deref(),
        Some("SELECT table_schema, table_name, table_type FROM information_schema.tables;")
    );
}

#[tokio::test]
async fn test_structure_is_cached() {
    let conn = FakeConnection::with_tables(sample_tables());
    let mut driver = driver(&conn);

    let first = driver.structure().await.unwrap();
    let second = driver.structure().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(conn.calls(), 1);
    assert!(driver.cached_structure().is_some());
}

#[tokio::test]
async fn test_structure_short_row_leaves_cache_unset() {
    let conn = FakeConnection::with_tables(vec![
        row(&["public", "users", "BASE TABLE"]),
        row(&["public", "broken"]),
    ]);
    let mut driver = driver(&conn);

    let err = driver.structure().await.err().expect("must fail");
    assert!(matches!(err, Error::InsufficientInfo("structure")));
    assert_eq!(err.to_string(), "could not retrieve structure: insufficient info");
    assert!(driver.cached_structure().is_none());

    // Nothing was cached, so the next call queries again.
    let _ = driver.structure().await;
    assert_eq!(conn.calls(), 2);
}

#[tokio::test]
async fn test_structure_query_error_is_not_cached() {
    let conn = FakeConnection::failing("AccessDenied");
    let mut driver = driver(&conn);

    assert!(driver.structure().await.is_err());
    assert!(driver.cached_structure().is_none());
}

#[tokio::test]
async fn test_invalidate_cache_forces_requery() {
    let conn = FakeConnection::with_tables(sample_tables());
    let mut driver = driver(&conn);

    driver.structure().await.unwrap();
    driver.invalidate_cache();
    assert!(driver.cached_structure().is_none());

    driver.structure().await.unwrap();
    assert_eq!(conn.calls(), 2);
}

// ── columns ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_columns_are_cached() {
    let conn = FakeConnection::with_columns(vec![
        row(&["id", "bigint"]),
        row(&["email", "varchar"]),
    ]);
    let mut driver = driver(&conn);
    let opts = TableOptions::new("sales", "customers");

    let first = driver.columns(&opts).await.expect("columns");
    let second = driver.columns(&opts).await.expect("columns");

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "id");
    assert_eq!(first[0].data_type, "bigint");
    assert_eq!(first[1].name, "email");
    assert_eq!(conn.calls(), 1);
    assert_eq!(driver.cached_column_sets(), 1);
}

#[tokio::test]
async fn test_columns_strip_schema_quotes() {
    let conn = FakeConnection::with_columns(vec![row(&["id", "bigint"])]);
    let mut driver = driver(&conn);

    driver
        .columns(&TableOptions::new("\"2024\"", "events"))
        .await
        .unwrap();
    let sql = conn.last_query().unwrap();
    assert!(sql.contains("table_schema = '2024'"), "{sql}");
    assert!(sql.contains("table_name = 'events'"), "{sql}");

    // Quoted and unquoted schema share a cache entry.
    driver.columns(&TableOptions::new("2024", "events")).await.unwrap();
    assert_eq!(conn.calls(), 1);
}

#[tokio::test]
async fn test_columns_per_table() {
    let conn = FakeConnection::with_columns(vec![row(&["id", "bigint"])]);
    let mut driver = driver(&conn);

    driver.columns(&TableOptions::new("s", "a")).await.unwrap();
    driver.columns(&TableOptions::new("s", "b")).await.unwrap();
    assert_eq!(conn.calls(), 2);
    assert_eq!(driver.cached_column_sets(), 2);
}

#[tokio::test]
async fn test_columns_short_row_is_not_cached() {
    let conn = FakeConnection::with_columns(vec![row(&["id"])]);
    let mut driver = driver(&conn);

    let err = driver
        .columns(&TableOptions::new("s", "t"))
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, Error::InsufficientInfo("columns")));
    assert_eq!(driver.cached_column_sets(), 0);
}

// ── close ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_close_releases_connection() {
    let conn = FakeConnection::default();
    let mut driver = driver(&conn);

    driver.close().await;
    assert!(conn.is_closed());
}
