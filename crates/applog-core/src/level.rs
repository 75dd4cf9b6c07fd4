//! Severities and their bracketed text tokens

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::errors::LogError;

/// Ordered log severity
///
/// The numeric codes follow the conventional `-1..=5` layout so raw levels
/// from other systems format the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i8)]
pub enum Severity {
    Debug = -1,
    Info = 0,
    Warn = 1,
    Error = 2,
    /// Panics in development, logs as an error otherwise
    DPanic = 3,
    /// Logs, then panics
    Panic = 4,
    /// Logs, flushes, then exits the process
    Fatal = 5,
}

impl Severity {
    /// Every severity, lowest first
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
        Severity::Fatal,
    ];

    pub fn from_i8(raw: i8) -> Option<Severity> {
        Self::ALL.into_iter().find(|s| *s as i8 == raw)
    }

    /// Lowercase name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::DPanic => "dpanic",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        }
    }
}

impl From<Severity> for i8 {
    fn from(s: Severity) -> i8 {
        s as i8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "dpanic" => Ok(Severity::DPanic),
            "panic" => Ok(Severity::Panic),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

/// Lowercase bracketed token for a level, e.g. `[warn]`.
///
/// Unknown numeric levels render as `[Level(V)]`.
pub fn level_string(level: impl Into<i8>) -> Cow<'static, str> {
    let raw = level.into();
    match Severity::from_i8(raw) {
        Some(Severity::Debug) => Cow::Borrowed("[debug]"),
        Some(Severity::Info) => Cow::Borrowed("[info]"),
        Some(Severity::Warn) => Cow::Borrowed("[warn]"),
        Some(Severity::Error) => Cow::Borrowed("[error]"),
        Some(Severity::DPanic) => Cow::Borrowed("[dpanic]"),
        Some(Severity::Panic) => Cow::Borrowed("[panic]"),
        Some(Severity::Fatal) => Cow::Borrowed("[fatal]"),
        None => Cow::Owned(format!("[Level({})]", raw)),
    }
}

/// All-caps bracketed token for a level, e.g. `[WARN]`.
///
/// Unknown numeric levels render as `[LEVEL(V)]`.
pub fn level_capital_string(level: impl Into<i8>) -> Cow<'static, str> {
    let raw = level.into();
    match Severity::from_i8(raw) {
        Some(Severity::Debug) => Cow::Borrowed("[DEBUG]"),
        Some(Severity::Info) => Cow::Borrowed("[INFO]"),
        Some(Severity::Warn) => Cow::Borrowed("[WARN]"),
        Some(Severity::Error) => Cow::Borrowed("[ERROR]"),
        Some(Severity::DPanic) => Cow::Borrowed("[DPANIC]"),
        Some(Severity::Panic) => Cow::Borrowed("[PANIC]"),
        Some(Severity::Fatal) => Cow::Borrowed("[FATAL]"),
        None => Cow::Owned(format!("[LEVEL({})]", raw)),
    }
}
