//! Logging macros
//!
//! - `function_name!()` - Path of the enclosing function
//! - `log_at!(log, severity, "template", args...)` - Log naming the enclosing function
//! - `log_debug!` ... `log_fatal!` - `log_at!` at a fixed severity
//! - `fields!(key => value, ...)` - Build an array of fields

/// Fully qualified path of the enclosing function, resolved at compile time
///
/// Closures report the function they are defined in.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}

/// Log a formatted record, naming the enclosing function as the caller
///
/// Expands to [`Log::log_from`](crate::Log::log_from) with the function
/// path captured where the macro is written, so a
/// [`LogInstance`](crate::LogInstance) with caller info reports
/// `function@file:line` for this call. Evaluates to the
/// [`Outcome`](crate::Outcome).
///
/// ```no_run
/// use applog_core::{enhance_with_caller_info, fields, log_at, RequestContext, Severity};
///
/// fn charge(ctx: &RequestContext, cents: i64) {
///     let log = enhance_with_caller_info(Some(ctx));
///     // caller = "charge@<file>:<line>"
///     log_at!(log, Severity::Info, "charged {} cents", cents).escalate();
///     log_at!(log, Severity::Warn, fields: &fields!("cents" => cents), "slow").escalate();
/// }
/// ```
#[macro_export]
macro_rules! log_at {
    ($log:expr, $severity:expr, fields: $fields:expr, $($arg:tt)+) => {{
        use $crate::Log as _;
        ($log).log_from(
            $crate::function_name!(),
            $severity,
            $crate::Message::Format(::std::format_args!($($arg)+)),
            $fields,
        )
    }};
    ($log:expr, $severity:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $severity, fields: &[], $($arg)+)
    };
}

/// `log_at!` at Debug; escalation is applied in place
#[macro_export]
macro_rules! log_debug {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::Severity::Debug, $($arg)+).escalate()
    };
}

/// `log_at!` at Info; escalation is applied in place
#[macro_export]
macro_rules! log_info {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::Severity::Info, $($arg)+).escalate()
    };
}

/// `log_at!` at Warn; escalation is applied in place
#[macro_export]
macro_rules! log_warn {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::Severity::Warn, $($arg)+).escalate()
    };
}

/// `log_at!` at Error; escalation is applied in place
#[macro_export]
macro_rules! log_error {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::Severity::Error, $($arg)+).escalate()
    };
}

/// `log_at!` at DPanic, returning the [`Outcome`](crate::Outcome)
#[macro_export]
macro_rules! log_dpanic {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::Severity::DPanic, $($arg)+)
    };
}

/// `log_at!` at Panic, returning the [`Outcome`](crate::Outcome)
#[macro_export]
macro_rules! log_panic {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::Severity::Panic, $($arg)+)
    };
}

/// `log_at!` at Fatal, returning the [`Outcome`](crate::Outcome)
#[macro_export]
macro_rules! log_fatal {
    ($log:expr, $($arg:tt)+) => {
        $crate::log_at!($log, $crate::Severity::Fatal, $($arg)+)
    };
}

/// Build an array of fields
///
/// ```
/// use applog_core::fields;
///
/// let fields = fields!("user_id" => "u1", "attempt" => 2);
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    ($($key:expr => $value:expr),* $(,)?) => {
        [$($crate::Field::new($key, $value)),*]
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_function_name() {
        let name = crate::function_name!();
        assert!(name.ends_with("tests::test_function_name"), "{}", name);
    }

    #[test]
    fn test_function_name_in_closure() {
        let name = (|| crate::function_name!())();
        assert!(name.ends_with("test_function_name_in_closure"), "{}", name);
    }

    #[test]
    fn test_log_at_with_fields() {
        use crate::test_capture::CaptureSink;
        use crate::{Logger, LoggerOptions, Outcome, Severity};
        use std::sync::Arc;

        let sink = CaptureSink::new();
        let log = Logger::new(Arc::new(sink.clone()), LoggerOptions::default());

        let outcome = crate::log_at!(
            log,
            Severity::Error,
            fields: &crate::fields!("attempt" => 3i64),
            "retry {} failed",
            3
        );

        assert_eq!(outcome, Outcome::Continue);
        let records = sink.records();
        assert_eq!(records[0].message, "retry 3 failed");
        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(records[0].field("attempt"), Some(&applog_core_types::Value::Int(3)));
    }

    #[test]
    fn test_fields_macro() {
        let fields = crate::fields!("k" => "v", "n" => 1i64,);
        assert_eq!(fields[0].key(), "k");
        assert_eq!(fields[1].value(), &applog_core_types::Value::Int(1));
    }
}
