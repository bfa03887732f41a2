//! Host-facing driver for an open Athena connection.

use std::collections::HashMap;

use async_trait::async_trait;
use quarry_core::{
    Column, Driver, Error, QueryContext, ResultStream, Structure, TableOptions,
};

use crate::connection::Connection;
use crate::structure::{build_structure, STRUCTURE_QUERY};

/// Adapter over a single Athena [`Connection`].
///
/// Column lists and the structure tree are cached for the lifetime of the
/// driver; schema changes become visible after
/// [`invalidate_cache`](Self::invalidate_cache) or on a new driver.
pub struct AthenaDriver {
    conn: Box<dyn Connection>,
    columns: HashMap<String, Vec<Column>>,
    structure: Option<Vec<Structure>>,
}

impl AthenaDriver {
    pub fn new(conn: Box<dyn Connection>) -> Self {
        Self {
            conn,
            columns: HashMap::new(),
            structure: None,
        }
    }

    /// Forget cached column lists and the structure tree.
    pub fn invalidate_cache(&mut self) {
        self.columns.clear();
        self.structure = None;
    }

    pub fn cached_structure(&self) -> Option<&[Structure]> {
        self.structure.as_deref()
    }

    pub fn cached_column_sets(&self) -> usize {
        self.columns.len()
    }
}

#[async_trait]
impl Driver for AthenaDriver {
    /// Statements are forwarded unchanged, writes included.
    async fn query(&self, ctx: &QueryContext, query: &str) -> Result<Box<dyn ResultStream>, Error> {
        Ok(self.conn.query(ctx, query).await?)
    }

    async fn columns(&mut self, opts: &TableOptions) -> Result<Vec<Column>, Error> {
        let schema = opts.schema.trim_matches('"');
        let key = format!("{}{}", schema, opts.table);
        if let Some(cached) = self.columns.get(&key) {
            return Ok(cached.clone());
        }

        let sql = columns_query(schema, &opts.table);
        let mut rows = self.query(&QueryContext::background(), &sql).await?;
        let columns = collect_columns(rows.as_mut()).await?;

        self.columns.insert(key, columns.clone());
        Ok(columns)
    }

    async fn structure(&mut self) -> Result<Vec<Structure>, Error> {
        if let Some(cached) = &self.structure {
            return Ok(cached.clone());
        }

        let mut rows = self
            .query(&QueryContext::background(), STRUCTURE_QUERY)
            .await?;
        let structure = build_structure(rows.as_mut()).await?;

        self.structure = Some(structure.clone());
        Ok(structure)
    }

    async fn close(&mut self) {
        self.conn.close().await;
    }
}

fn columns_query(schema: &str, table: &str) -> String {
    format!(
        "SELECT column_name, data_type FROM information_schema.columns \
         WHERE table_schema = '{}' and table_name = '{}';",
        escape_literal(schema),
        escape_literal(table),
    )
}

fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

async fn collect_columns(rows: &mut dyn ResultStream) -> Result<Vec<Column>, Error> {
    let mut columns = Vec::new();
    while let Some(row) = rows.next_row().await? {
        let [name, data_type, ..] = row.as_slice() else {
            return Err(Error::InsufficientInfo("columns"));
        };
        columns.push(Column::new(name.to_text(), data_type.to_text()));
    }
    Ok(columns)
}
