//! Leveled logger bound to a sink
//!
//! [`Logger`] is the concrete logger the facade installs. [`Log`] is the
//! logging API shared by loggers, log instances and the facade: one
//! required method, [`Log::log`], and three call shapes per severity built on
//! top of it.
//!
//! Every entry point is `#[track_caller]`, so the location recorded for a
//! record is the application's call site however many wrappers sit between.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use applog_core_types::Field;
use chrono::Utc;

use crate::errors::Result;
use crate::level::Severity;
use crate::record::{Message, Outcome, Record};
use crate::sink::{NopSink, Sink};

#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    /// Logger name written under the `logger` key
    pub name: Option<String>,
    /// DPanic escalates like Panic when set
    pub development: bool,
    /// Capture a stacktrace for records at or above this severity
    pub stacktrace_level: Option<Severity>,
    /// Return escalating outcomes for DPanic, Panic and Fatal
    pub escalate: bool,
}

#[derive(Debug, Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    options: Arc<LoggerOptions>,
    nop: bool,
}

impl Logger {
    pub fn new(sink: Arc<dyn Sink>, options: LoggerOptions) -> Self {
        Self {
            sink,
            options: Arc::new(options),
            nop: false,
        }
    }

    /// Logger that discards every record and never escalates
    pub fn nop() -> Self {
        Self {
            sink: Arc::new(NopSink),
            options: Arc::new(LoggerOptions::default()),
            nop: true,
        }
    }

    pub fn is_nop(&self) -> bool {
        self.nop
    }

    pub fn is_development(&self) -> bool {
        self.options.development
    }

    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// A derived logger carrying `fields` on every record.
    ///
    /// The receiver is left unchanged.
    pub fn with(&self, fields: &[Field]) -> Logger {
        if self.nop || fields.is_empty() {
            return self.clone();
        }
        Logger {
            sink: self.sink.with_fields(fields),
            options: self.options.clone(),
            nop: false,
        }
    }

    /// A derived logger writing under a different name
    pub fn named(&self, name: impl Into<String>) -> Logger {
        let mut options = LoggerOptions::clone(&self.options);
        options.name = Some(name.into());
        Logger {
            sink: self.sink.clone(),
            options: Arc::new(options),
            nop: self.nop,
        }
    }

    fn escalates(&self, severity: Severity) -> bool {
        self.options.escalate
            && match severity {
                Severity::DPanic => self.options.development,
                Severity::Panic | Severity::Fatal => true,
                _ => false,
            }
    }

    fn wants_stacktrace(&self, severity: Severity) -> bool {
        self.options
            .stacktrace_level
            .is_some_and(|level| severity >= level)
    }
}

/// Logging API shared by [`Logger`], [`LogInstance`](crate::LogInstance)
/// and [`Facade`](crate::Facade)
///
/// Three call shapes exist per severity:
///
/// - `info(&[&a, &b])` concatenates its operands verbatim
/// - `infof(format_args!(..))` renders a template
/// - `infow("msg", &fields)` attaches typed fields to a fixed message
///
/// Debug through Error return nothing. DPanic, Panic and Fatal return the
/// [`Outcome`] the caller must act on.
pub trait Log {
    /// Emit one record and report what the caller must do next
    #[track_caller]
    fn log(&self, severity: Severity, message: Message<'_>, fields: &[Field]) -> Outcome;

    /// [`Log::log`] from a call site whose enclosing function is known.
    ///
    /// The `log_*!` macros pass the function path captured at compile time.
    /// Loggers without caller attribution ignore it.
    #[track_caller]
    fn log_from(
        &self,
        _function: &'static str,
        severity: Severity,
        message: Message<'_>,
        fields: &[Field],
    ) -> Outcome {
        self.log(severity, message, fields)
    }

    /// Flush the underlying sink.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Flush`](crate::LogError::Flush) with the sink's
    /// I/O error.
    fn sync(&self) -> Result<()>;

    #[track_caller]
    fn debug(&self, args: &[&dyn fmt::Display]) {
        self.log(Severity::Debug, Message::Concat(args), &[]).escalate()
    }

    #[track_caller]
    fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, Message::Format(args), &[]).escalate()
    }

    #[track_caller]
    fn debugw(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Debug, Message::Text(msg), fields).escalate()
    }

    #[track_caller]
    fn info(&self, args: &[&dyn fmt::Display]) {
        self.log(Severity::Info, Message::Concat(args), &[]).escalate()
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, Message::Format(args), &[]).escalate()
    }

    #[track_caller]
    fn infow(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Info, Message::Text(msg), fields).escalate()
    }

    #[track_caller]
    fn warn(&self, args: &[&dyn fmt::Display]) {
        self.log(Severity::Warn, Message::Concat(args), &[]).escalate()
    }

    #[track_caller]
    fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warn, Message::Format(args), &[]).escalate()
    }

    #[track_caller]
    fn warnw(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Warn, Message::Text(msg), fields).escalate()
    }

    #[track_caller]
    fn error(&self, args: &[&dyn fmt::Display]) {
        self.log(Severity::Error, Message::Concat(args), &[]).escalate()
    }

    #[track_caller]
    fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, Message::Format(args), &[]).escalate()
    }

    #[track_caller]
    fn errorw(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Error, Message::Text(msg), fields).escalate()
    }

    #[track_caller]
    fn dpanic(&self, args: &[&dyn fmt::Display]) -> Outcome {
        self.log(Severity::DPanic, Message::Concat(args), &[])
    }

    #[track_caller]
    fn dpanicf(&self, args: fmt::Arguments<'_>) -> Outcome {
        self.log(Severity::DPanic, Message::Format(args), &[])
    }

    #[track_caller]
    fn dpanicw(&self, msg: &str, fields: &[Field]) -> Outcome {
        self.log(Severity::DPanic, Message::Text(msg), fields)
    }

    #[track_caller]
    fn panic(&self, args: &[&dyn fmt::Display]) -> Outcome {
        self.log(Severity::Panic, Message::Concat(args), &[])
    }

    #[track_caller]
    fn panicf(&self, args: fmt::Arguments<'_>) -> Outcome {
        self.log(Severity::Panic, Message::Format(args), &[])
    }

    #[track_caller]
    fn panicw(&self, msg: &str, fields: &[Field]) -> Outcome {
        self.log(Severity::Panic, Message::Text(msg), fields)
    }

    #[track_caller]
    fn fatal(&self, args: &[&dyn fmt::Display]) -> Outcome {
        self.log(Severity::Fatal, Message::Concat(args), &[])
    }

    #[track_caller]
    fn fatalf(&self, args: fmt::Arguments<'_>) -> Outcome {
        self.log(Severity::Fatal, Message::Format(args), &[])
    }

    #[track_caller]
    fn fatalw(&self, msg: &str, fields: &[Field]) -> Outcome {
        self.log(Severity::Fatal, Message::Text(msg), fields)
    }
}

impl Log for Logger {
    #[track_caller]
    fn log(&self, severity: Severity, message: Message<'_>, fields: &[Field]) -> Outcome {
        let location = Location::caller();
        let enabled = self.sink.enabled(severity);
        let escalates = self.escalates(severity);
        if !enabled && !escalates {
            return Outcome::Continue;
        }

        let text = message.to_string();
        if enabled {
            let stacktrace = self
                .wants_stacktrace(severity)
                .then(|| Backtrace::force_capture().to_string());
            self.sink.write(&Record {
                severity,
                time: Utc::now(),
                logger_name: self.name(),
                location: Some(location),
                message: &text,
                fields,
                stacktrace: stacktrace.as_deref(),
            });
        }

        if severity == Severity::Fatal {
            if let Err(err) = self.sink.sync() {
                tracing::warn!(error = %err, "flush before exit failed");
            }
        }

        match severity {
            _ if !escalates => Outcome::Continue,
            Severity::Fatal => Outcome::Exit { code: 1 },
            _ => Outcome::Panic { message: text },
        }
    }

    fn sync(&self) -> Result<()> {
        self.sink.sync()
    }
}
