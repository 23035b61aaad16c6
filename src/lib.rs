//! recordschema - declarative record schemas for document collections
//!
//! Record types are declared as data, registered once at startup, and
//! used to validate untyped JSON input into typed records bound for a
//! named collection.

pub mod cli;
pub mod config;
pub mod observability;
pub mod schema;
