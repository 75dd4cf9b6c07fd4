//! Per-call record and the process-control outcome of a log call

use std::fmt;
use std::panic::Location;

use applog_core_types::Field;
use chrono::{DateTime, Utc};

use crate::level::Severity;

/// Message of a log call, rendered only when the record is emitted
#[derive(Clone, Copy)]
pub enum Message<'a> {
    /// Operands concatenated verbatim
    Concat(&'a [&'a dyn fmt::Display]),
    /// A `format_args!` template with its arguments
    Format(fmt::Arguments<'a>),
    /// A plain message, used by the structured call shape
    Text(&'a str),
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Concat(parts) => parts.iter().try_for_each(|part| write!(f, "{}", part)),
            Message::Format(args) => f.write_fmt(*args),
            Message::Text(text) => f.write_str(text),
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message({:?})", self.to_string())
    }
}

/// A finished log record handed to a sink
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub severity: Severity,
    pub time: DateTime<Utc>,
    pub logger_name: Option<&'a str>,
    pub location: Option<&'static Location<'static>>,
    pub message: &'a str,
    /// Fields passed to this call; they override fields attached to the sink
    pub fields: &'a [Field],
    pub stacktrace: Option<&'a str>,
}

/// What the caller must do after a log call returns
///
/// Panic and Fatal records are emitted before the outcome is returned; the
/// caller escalates with [`Outcome::escalate`].
#[must_use = "panic and fatal outcomes only take effect through `escalate`"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Panic { message: String },
    Exit { code: i32 },
}

impl Outcome {
    pub fn is_continue(&self) -> bool {
        matches!(self, Outcome::Continue)
    }

    /// Perform the requested control transfer
    ///
    /// # Panics
    ///
    /// Panics with the logged message for [`Outcome::Panic`].
    pub fn escalate(self) {
        match self {
            Outcome::Continue => {}
            Outcome::Panic { message } => panic!("{}", message),
            Outcome::Exit { code } => std::process::exit(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_is_verbatim() {
        let id = 7;
        let parts: [&dyn fmt::Display; 3] = [&"user ", &id, &" logged in"];
        assert_eq!(Message::Concat(&parts).to_string(), "user 7 logged in");
    }

    #[test]
    fn test_format_message() {
        let name = "alice";
        assert_eq!(
            Message::Format(format_args!("hello {}", name)).to_string(),
            "hello alice"
        );
    }

    #[test]
    fn test_continue_escalation_is_noop() {
        Outcome::Continue.escalate();
        assert!(Outcome::Continue.is_continue());
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_escalation() {
        Outcome::Panic {
            message: "boom".to_string(),
        }
        .escalate();
    }
}
