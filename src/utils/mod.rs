/// Date and time parsing/formatting helpers
pub mod datetime;
/// Structured logging helpers for command handling
pub mod logging;
/// Input validation helpers
pub mod validation;
