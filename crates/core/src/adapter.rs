//! Traits a backend implements to plug into the host.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::context::QueryContext;
use crate::error::Result;
use crate::schema::{Column, Structure, TableOptions};
use crate::stream::ResultStream;

/// Entry point of a backend: builds drivers from connection URLs.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// URL schemes this adapter answers to.
    fn schemes(&self) -> &[&'static str];

    async fn connect(&self, url: &str) -> Result<Box<dyn Driver>>;

    /// Canned statements for a table, keyed by display name.
    fn helpers(&self, opts: &TableOptions) -> HashMap<String, String>;
}

/// An open connection as seen by the host.
///
/// Methods that fill adapter-local caches take `&mut self`, so callers
/// cannot populate them concurrently.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn query(&self, ctx: &QueryContext, query: &str) -> Result<Box<dyn ResultStream>>;

    async fn columns(&mut self, opts: &TableOptions) -> Result<Vec<Column>>;

    async fn structure(&mut self) -> Result<Vec<Structure>>;

    async fn close(&mut self);
}
