//! Logger wrapper with optional caller attribution

use std::borrow::Cow;
use std::panic::Location;

use applog_core_types::schema::FIELD_CALLER;
use applog_core_types::Field;

use crate::caller::format_caller;
use crate::errors::Result;
use crate::level::Severity;
use crate::logger::{Log, Logger};
use crate::record::{Message, Outcome};

/// A logger plus the decision whether to attach a `caller` field
///
/// The caller is resolved per call. Its location comes from
/// `#[track_caller]`, and its function name from the `log_*!` macros,
/// which capture the enclosing function where the record is logged. A
/// plain method call has no function name and reports `<nocaller>`.
///
/// Instances are immutable; enhancement builds a fresh one per call.
#[derive(Debug, Clone)]
pub struct LogInstance {
    logger: Logger,
    with_caller_info: bool,
}

impl LogInstance {
    pub fn new(logger: Logger, with_caller_info: bool) -> Self {
        Self {
            logger,
            with_caller_info,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn with_caller_info(&self) -> bool {
        self.with_caller_info
    }

    /// The logger a call at the caller's location should use.
    ///
    /// Without caller info this is the wrapped logger itself; with it, a
    /// derived logger carrying a `caller` field. No function name is known
    /// here, so the field reads `<nocaller>`.
    #[track_caller]
    pub fn resolve_logger(&self) -> Cow<'_, Logger> {
        self.resolve_logger_in(None)
    }

    /// [`LogInstance::resolve_logger`] for a call made from `function`
    #[track_caller]
    pub fn resolve_logger_in(&self, function: Option<&str>) -> Cow<'_, Logger> {
        if !self.with_caller_info {
            return Cow::Borrowed(&self.logger);
        }
        let caller = format_caller(function, Some(Location::caller()));
        Cow::Owned(self.logger.with(&[Field::string(FIELD_CALLER, caller)]))
    }
}

impl Log for LogInstance {
    #[track_caller]
    fn log(&self, severity: Severity, message: Message<'_>, fields: &[Field]) -> Outcome {
        self.resolve_logger().log(severity, message, fields)
    }

    #[track_caller]
    fn log_from(
        &self,
        function: &'static str,
        severity: Severity,
        message: Message<'_>,
        fields: &[Field],
    ) -> Outcome {
        self.resolve_logger_in(Some(function)).log(severity, message, fields)
    }

    fn sync(&self) -> Result<()> {
        self.logger.sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LoggerOptions;
    use crate::test_capture::CaptureSink;
    use std::sync::Arc;

    fn logger(sink: &CaptureSink) -> Logger {
        Logger::new(Arc::new(sink.clone()), LoggerOptions::default())
    }

    #[test]
    fn test_without_caller_info_uses_wrapped_logger() {
        let sink = CaptureSink::new();
        let instance = LogInstance::new(logger(&sink), false);

        assert!(matches!(instance.resolve_logger(), Cow::Borrowed(_)));
        instance.info(&[&"plain"]);
        assert_eq!(sink.records()[0].field("caller"), None);
    }

    #[test]
    fn test_caller_field_names_call_site() {
        let sink = CaptureSink::new();
        let instance = LogInstance::new(logger(&sink), true);

        let line = line!() + 1;
        crate::log_info!(instance, "served {}", 1);

        let records = sink.records();
        assert_eq!(records[0].message, "served 1");
        assert_eq!(
            records[0].field_str("caller"),
            Some(format!("test_caller_field_names_call_site@instance.rs:{}", line).as_str())
        );
    }

    #[test]
    fn test_function_resolved_where_record_is_logged() {
        fn build(sink: &CaptureSink) -> LogInstance {
            LogInstance::new(logger(sink), true)
        }

        fn charge_card(log: &LogInstance) -> u32 {
            let line = line!() + 1;
            crate::log_warn!(log, "card declined");
            line
        }

        let sink = CaptureSink::new();
        let instance = build(&sink);
        let line = charge_card(&instance);

        assert_eq!(
            sink.records()[0].field_str("caller"),
            Some(format!("charge_card@instance.rs:{}", line).as_str())
        );
    }

    #[test]
    fn test_method_call_without_function_name() {
        let sink = CaptureSink::new();
        let instance = LogInstance::new(logger(&sink), true);

        instance.infof(format_args!("served {}", 2));

        assert_eq!(sink.records()[0].field_str("caller"), Some("<nocaller>"));
    }

    #[test]
    fn test_sync_propagates_sink_error() {
        let sink = CaptureSink::new();
        let instance = LogInstance::new(logger(&sink), true);
        assert!(instance.sync().is_ok());

        sink.set_fail_sync(true);
        let err = instance.sync().unwrap_err();
        assert_eq!(err.code(), "ERR_FLUSH");
    }
}
