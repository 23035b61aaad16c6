//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded
    ConfigLoaded,
    /// Definition added to a registry
    SchemaRegistered,
    /// Definition refused by a registry
    SchemaRejected,
    /// Built-in catalog could not be registered
    CatalogFailed,
    /// Definition directory loaded
    SchemasLoaded,
    /// Definitions written to disk
    SchemasExported,
    /// Input accepted
    ValidationPassed,
    /// Input rejected
    ValidationRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::CatalogFailed => "CATALOG_FAILED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemasExported => "SCHEMAS_EXPORTED",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationRejected => "VALIDATION_REJECTED",
        }
    }

    /// Returns true if this event reports a refusal
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::SchemaRejected | Event::ValidationRejected)
    }

    /// Severity the event is logged at.
    ///
    /// Registration happens on every registry build, so it stays at TRACE.
    pub fn severity(&self) -> Severity {
        match self {
            Event::CatalogFailed => Severity::Error,
            Event::SchemaRegistered => Severity::Trace,
            e if e.is_rejection() => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
