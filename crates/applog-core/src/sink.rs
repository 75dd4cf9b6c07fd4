//! Record destinations
//!
//! A [`Sink`] renders and writes finished records. Every sink supports field
//! attachment through [`Sink::with_fields`], which is how enrichment and caller
//! attribution reach the encoder.
//!
//! - [`NopSink`] discards everything; the facade is bound to it until initialized
//! - [`WriterSink`] encodes records and writes them to any `io::Write`
//! - [`TracingSink`] forwards records to `tracing` events

pub mod tracing_bridge;
pub mod writer;

use std::fmt::Debug;
use std::sync::Arc;

use applog_core_types::Field;

use crate::errors::Result;
use crate::level::Severity;
use crate::record::Record;

pub use tracing_bridge::{install_tracing_subscriber, TracingSink};
pub use writer::{SharedBuffer, WriterSink};

pub trait Sink: Debug + Send + Sync {
    /// Whether records of `severity` would be written
    fn enabled(&self, severity: Severity) -> bool;

    /// Render and write one record.
    ///
    /// Fields in `record.fields` take precedence over attached fields.
    fn write(&self, record: &Record<'_>);

    /// A derived sink that carries `fields` on every record.
    ///
    /// The receiver is left unchanged.
    fn with_fields(&self, fields: &[Field]) -> Arc<dyn Sink>;

    /// Flush buffered output.
    fn sync(&self) -> Result<()>;
}

/// Sink that discards every record and never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NopSink;

impl Sink for NopSink {
    fn enabled(&self, _severity: Severity) -> bool {
        false
    }

    fn write(&self, _record: &Record<'_>) {}

    fn with_fields(&self, _fields: &[Field]) -> Arc<dyn Sink> {
        Arc::new(NopSink)
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
