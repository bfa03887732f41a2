pub mod client;
pub mod config;
pub mod connection;
pub mod connector;
pub mod convert;
pub mod driver;
pub mod result;
pub mod sdk_env;
pub mod statement;
pub mod stream;
pub mod structure;

pub use client::{AthenaError, SdkConnection};
pub use config::{DriverConfig, SCHEMES};
pub use connection::{Connection, ConnectionOpener, SdkOpener};
pub use connector::Athena;
pub use driver::AthenaDriver;
pub use result::QueryMetadata;
pub use stream::SdkResultStream;
