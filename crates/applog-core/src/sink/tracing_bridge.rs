//! Bridge from facade records to `tracing` events
//!
//! Lets an application that already runs a `tracing` subscriber route facade
//! output through it. Structured fields are rendered into a single `fields`
//! value because `tracing` field names are fixed at compile time.

use std::sync::{Arc, Once};

use applog_core_types::{merge_fields, Field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::caller::short_caller;
use crate::config::Profile;
use crate::errors::Result;
use crate::level::Severity;
use crate::record::Record;
use crate::sink::Sink;

/// Target of every bridged event
pub const TRACING_TARGET: &str = "applog";

/// Sink emitting one `tracing` event per record
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    fields: Vec<Field>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

fn tracing_level(severity: Severity) -> Level {
    match severity {
        Severity::Debug => Level::DEBUG,
        Severity::Info => Level::INFO,
        Severity::Warn => Level::WARN,
        Severity::Error | Severity::DPanic | Severity::Panic | Severity::Fatal => Level::ERROR,
    }
}

/// `key=value` pairs separated by spaces
fn render_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{}={}", f.key(), f.value()))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Sink for TracingSink {
    fn enabled(&self, severity: Severity) -> bool {
        match tracing_level(severity) {
            Level::DEBUG => tracing::enabled!(target: TRACING_TARGET, Level::DEBUG),
            Level::INFO => tracing::enabled!(target: TRACING_TARGET, Level::INFO),
            Level::WARN => tracing::enabled!(target: TRACING_TARGET, Level::WARN),
            _ => tracing::enabled!(target: TRACING_TARGET, Level::ERROR),
        }
    }

    fn write(&self, record: &Record<'_>) {
        let fields = render_fields(&merge_fields([&self.fields[..], record.fields]));
        let caller = record.location.map(short_caller).unwrap_or_default();
        let severity = record.severity.name();
        let logger = record.logger_name.unwrap_or_default();
        let message = record.message;

        match tracing_level(record.severity) {
            Level::DEBUG => tracing::debug!(
                target: TRACING_TARGET,
                severity, logger, caller = %caller, fields = %fields,
                "{}", message
            ),
            Level::INFO => tracing::info!(
                target: TRACING_TARGET,
                severity, logger, caller = %caller, fields = %fields,
                "{}", message
            ),
            Level::WARN => tracing::warn!(
                target: TRACING_TARGET,
                severity, logger, caller = %caller, fields = %fields,
                "{}", message
            ),
            _ => tracing::error!(
                target: TRACING_TARGET,
                severity, logger, caller = %caller, fields = %fields,
                "{}", message
            ),
        }
    }

    fn with_fields(&self, fields: &[Field]) -> Arc<dyn Sink> {
        Arc::new(Self {
            fields: merge_fields([&self.fields[..], fields]),
        })
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

static SUBSCRIBER_ONCE: Once = Once::new();

/// Install a global `tracing` subscriber matching `profile`.
///
/// - **Development**: human-readable output, `debug` by default
/// - **Production**: JSON output, `info` by default
///
/// `RUST_LOG` overrides the default filter. Only the first call has an
/// effect, and an already installed subscriber is left in place.
pub fn install_tracing_subscriber(profile: Profile) {
    SUBSCRIBER_ONCE.call_once(|| {
        let default_filter = match profile {
            Profile::Development => "debug",
            Profile::Production => "info",
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}
