//! Schema registry and validator
//!
//! Record types are declared as plain data (`RecordTypeDef`) and
//! interpreted by one generic validator.
//!
//! # Design Principles
//!
//! - Definitions are immutable once registered
//! - Type names are unique; collection names default to the lowercase type
//!   name unless overridden per type
//! - Validation collects every field error before reporting
//! - Validation is pure and deterministic

pub mod catalog;
mod coerce;
mod errors;
mod naming;
mod record;
mod registry;
mod types;
mod validator;

pub use catalog::{parse, PartnerLead, Product, RecordType, User};
pub use coerce::is_valid_email;
pub use errors::{
    FieldError, FieldErrorKind, SchemaError, SchemaErrorCode, SchemaResult, ValidationReport,
};
pub use naming::default_collection_name;
pub use record::{FieldValue, Record};
pub use registry::{collection_name_for, global, register, save_definition, validate, SchemaRegistry};
pub use types::{Constraint, FieldDef, RecordTypeDef, StringFormat, ValueType};
pub use validator::{validate_record, SchemaValidator, UnknownKeyPolicy};
