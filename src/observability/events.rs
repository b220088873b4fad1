//! Observable events
//!
//! Events are explicit and typed. Covers:
//! - Startup (configuration, struct catalog)
//! - Validation calls and their verdicts

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration loaded
    ConfigLoaded,
    /// Struct catalog populated
    CatalogLoaded,
    /// Single structure registered
    StructRegistered,
    /// Startup failed (FATAL)
    StartupFailed,

    // Validation
    /// Validation call begins
    ValidationStart,
    /// Definition accepted
    ValidationAccepted,
    /// Definition rejected with field errors
    ValidationRejected,
    /// Raw options could not be decoded
    OptionsMalformed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "STRUCT_CATALOG_LOADED",
            Event::StructRegistered => "STRUCT_REGISTERED",
            Event::StartupFailed => "STARTUP_FAILED",
            Event::ValidationStart => "VALIDATION_BEGIN",
            Event::ValidationAccepted => "VALIDATION_ACCEPTED",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::OptionsMalformed => "OPTIONS_MALFORMED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StartupFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
