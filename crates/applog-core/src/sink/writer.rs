//! Encoder-backed sink writing to an `io::Write`

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use applog_core_types::{merge_fields, Field};

use crate::encoder::Encoder;
use crate::errors::{LogError, Result};
use crate::level::Severity;
use crate::record::Record;
use crate::sink::Sink;

struct WriterCore {
    encoder: Box<dyn Encoder>,
    output: Mutex<Box<dyn Write + Send>>,
    level: Severity,
}

/// Sink that encodes each record and writes it to an output stream
///
/// Derived sinks created by [`Sink::with_fields`] share the encoder and
/// output; only the attached fields differ.
#[derive(Clone)]
pub struct WriterSink {
    core: Arc<WriterCore>,
    fields: Vec<Field>,
}

impl WriterSink {
    pub fn new<E, W>(encoder: E, output: W, level: Severity) -> Self
    where
        E: Encoder + 'static,
        W: Write + Send + 'static,
    {
        Self::from_parts(Box::new(encoder), Box::new(output), level)
    }

    pub fn from_parts(
        encoder: Box<dyn Encoder>,
        output: Box<dyn Write + Send>,
        level: Severity,
    ) -> Self {
        Self {
            core: Arc::new(WriterCore {
                encoder,
                output: Mutex::new(output),
                level,
            }),
            fields: Vec::new(),
        }
    }

    /// Minimum severity written
    pub fn level(&self) -> Severity {
        self.core.level
    }

    /// Fields attached to every record from this sink
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl fmt::Debug for WriterSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("encoder", &self.core.encoder)
            .field("level", &self.core.level)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Sink for WriterSink {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.core.level
    }

    fn write(&self, record: &Record<'_>) {
        let fields = merge_fields([&self.fields[..], record.fields]);
        let encoded = self.core.encoder.encode(record, &fields);

        let mut output = self
            .core
            .output
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = output.write_all(&encoded) {
            tracing::warn!(error = %err, severity = %record.severity, "dropped log record");
        }
    }

    fn with_fields(&self, fields: &[Field]) -> Arc<dyn Sink> {
        Arc::new(Self {
            core: self.core.clone(),
            fields: merge_fields([&self.fields[..], fields]),
        })
    }

    fn sync(&self) -> Result<()> {
        self.core
            .output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
            .map_err(LogError::Flush)
    }
}

/// Cloneable in-memory output, handy for inspecting encoded records
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        self.bytes
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{EncoderConfig, JsonEncoder};
    use chrono::Utc;
    use std::panic::Location;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn record<'a>(message: &'a str, fields: &'a [Field]) -> Record<'a> {
        Record {
            severity: Severity::Info,
            time: Utc::now(),
            logger_name: None,
            location: Some(Location::caller()),
            message,
            fields,
            stacktrace: None,
        }
    }

    #[test]
    fn test_level_gate() {
        let sink = WriterSink::new(
            JsonEncoder::new(EncoderConfig::production()),
            SharedBuffer::new(),
            Severity::Info,
        );
        assert!(!sink.enabled(Severity::Debug));
        assert!(sink.enabled(Severity::Info));
        assert!(sink.enabled(Severity::Fatal));
    }

    #[test]
    fn test_derived_sink_shares_output() {
        let buffer = SharedBuffer::new();
        let sink = WriterSink::new(
            JsonEncoder::new(EncoderConfig::production()),
            buffer.clone(),
            Severity::Debug,
        );
        let derived = sink.with_fields(&[Field::string("user_id", "u1")]);

        sink.write(&record("plain", &[]));
        derived.write(&record("enriched", &[]));

        let out = buffer.contents();
        let lines: Vec<&str> = out.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].contains("user_id"));
        assert!(lines[1].contains("\"user_id\":\"u1\""));
    }

    #[test]
    fn test_call_fields_override_attached_fields() {
        let buffer = SharedBuffer::new();
        let sink = WriterSink::new(
            JsonEncoder::new(EncoderConfig::production()),
            buffer.clone(),
            Severity::Debug,
        )
        .with_fields(&[Field::string("user_id", "from-context")]);

        let call_fields = [Field::string("user_id", "from-call")];
        sink.write(&record("override", &call_fields));

        let out = buffer.contents();
        assert!(out.contains("\"user_id\":\"from-call\""));
        assert!(!out.contains("from-context"));
    }

    #[test]
    fn test_sync_failure_is_surfaced() {
        let sink = WriterSink::new(
            JsonEncoder::new(EncoderConfig::production()),
            FailingWriter,
            Severity::Debug,
        );
        // A failed write is dropped, not raised
        sink.write(&record("lost", &[]));

        let err = sink.sync().unwrap_err();
        assert_eq!(err.code(), "ERR_FLUSH");
        assert_eq!(err.io_error().map(|e| e.kind()), Some(io::ErrorKind::BrokenPipe));
    }
}
