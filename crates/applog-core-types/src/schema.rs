//! Canonical schema constants for emitted records
//!
//! The production key names are a contract with downstream log ingestion.

// Entry keys
pub const KEY_TIME: &str = "ts";
pub const KEY_LEVEL: &str = "level";
pub const KEY_LOGGER: &str = "logger";
pub const KEY_CALLER: &str = "caller";
pub const KEY_MESSAGE: &str = "msg";
pub const KEY_STACKTRACE: &str = "stacktrace";

// Field attached by a caller-aware log instance
pub const FIELD_CALLER: &str = "caller";

// Caller sentinel
pub const NO_CALLER: &str = "<nocaller>";

// Record terminators
pub const LINE_ENDING_CRLF: &str = "\r\n";
pub const LINE_ENDING_LF: &str = "\n";

// Environment variables read by the logger configuration
pub const ENV_PROFILE: &str = "APPLOG_PROFILE";
pub const ENV_LEVEL: &str = "APPLOG_LEVEL";
pub const ENV_NAME: &str = "APPLOG_NAME";
