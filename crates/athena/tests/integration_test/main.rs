//! Integration tests for quarry-athena.
//!
//! Everything here runs against fake connections and needs no AWS
//! credentials, except tests marked `#[ignore]`.

mod connector;
mod driver;
mod sdk;
