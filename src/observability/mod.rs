//! Observability subsystem
//!
//! Structured JSON-lines logging of typed events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use slotattr::observability::{Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Info);
//! Logger::info(Event::CatalogLoaded, &[("structs", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a startup lifecycle event; fatal events at FATAL, the rest at INFO
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event, fields);
}
