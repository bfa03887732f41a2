//! Host-facing contract shared by every quarry backend.
//!
//! A backend exposes an [`Adapter`] that turns a connection URL into a
//! [`Driver`]. The host talks to drivers only through the traits and types
//! defined here.

pub mod adapter;
pub mod context;
pub mod error;
pub mod schema;
pub mod stream;
pub mod table;
pub mod value;

pub use adapter::{Adapter, Driver};
pub use context::QueryContext;
pub use error::{BoxError, Error, Result};
pub use schema::{Column, Structure, StructureType, TableOptions};
pub use stream::{collect_rows, MemoryStream, ResultStream};
pub use table::render_table;
pub use value::{Row, Value};
