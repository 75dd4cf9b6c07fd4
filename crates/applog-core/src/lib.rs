//! applog Core - Process-wide structured logging facade
//!
//! This crate provides a single access point through which any call site
//! emits leveled, structured log records, including:
//! - One-time, race-free initialization with production or development policy
//! - Caller attribution that names the application's call site
//! - Enrichment of records from a request-scoped context
//! - JSON and console encoders, a `tracing` bridge, and an in-memory capture sink
//!
//! # Usage
//!
//! ```no_run
//! use applog_core::{enhance_with_caller_info, initialize, log_info, RequestContext, ContextKey};
//!
//! initialize(true);
//!
//! let ctx = RequestContext::new().attach(ContextKey::ContextId, "abc123");
//! let log = enhance_with_caller_info(Some(&ctx));
//! log_info!(log, "charged {} cents", 1250);
//! ```

pub mod caller;
pub mod config;
pub mod encoder;
pub mod enhancer;
pub mod errors;
pub mod facade;
pub mod instance;
pub mod level;
pub mod logger;
pub mod macros;
pub mod record;
pub mod sink;
pub mod test_capture;

// Re-export commonly used types
pub use applog_core_types::{
    attach_context, ContextId, ContextKey, ContextValues, Field, RequestContext, Value,
};
pub use config::{LoggerConfig, Output, Profile};
pub use enhancer::{context_fields, enhance, enhance_with_caller_info};
pub use errors::{LogError, LogErrorKind, Result};
pub use facade::{
    debug, debugf, debugw, dpanic, dpanicf, dpanicw, error, errorf, errorw, fatal, fatalf,
    fatalw, global, info, infof, infow, init, init_with, initialize, lifecycle, panic, panicf,
    panicw, sugared_logger, sync, warn, warnf, warnw, Facade, Lifecycle,
};
pub use instance::LogInstance;
pub use level::{level_capital_string, level_string, Severity};
pub use logger::{Log, Logger, LoggerOptions};
pub use record::{Message, Outcome, Record};
pub use sink::{install_tracing_subscriber, NopSink, SharedBuffer, Sink, TracingSink, WriterSink};
pub use test_capture::{CaptureSink, CapturedRecord};
