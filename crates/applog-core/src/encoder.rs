//! Record encoders
//!
//! [`EncoderConfig`] names the entry keys and chooses how levels, times and
//! durations are rendered. Callers are written as the last directory, file
//! name and line. Two encoders share it:
//! [`JsonEncoder`] for ingestion pipelines and [`ConsoleEncoder`] for people.
//!
//! A field whose key equals one of the configured entry keys replaces that
//! entry's value instead of appearing twice.

pub mod console;
pub mod json;

use std::borrow::Cow;
use std::fmt::Debug;

use applog_core_types::schema::{
    KEY_CALLER, KEY_LEVEL, KEY_LOGGER, KEY_MESSAGE, KEY_STACKTRACE, KEY_TIME, LINE_ENDING_CRLF,
    LINE_ENDING_LF,
};
use applog_core_types::{Field, Value};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::caller::short_caller;
use crate::level::{level_capital_string, level_string, Severity};
use crate::record::Record;

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;

pub trait Encoder: Debug + Send + Sync {
    /// Encode one record, terminator included.
    ///
    /// `fields` are the record's fields already merged with attached fields.
    fn encode(&self, record: &Record<'_>, fields: &[Field]) -> Vec<u8>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    /// `[info]`
    Lowercase,
    /// `[INFO]`
    Capital,
}

impl LevelEncoding {
    pub fn encode(&self, severity: Severity) -> Cow<'static, str> {
        match self {
            LevelEncoding::Lowercase => level_string(severity),
            LevelEncoding::Capital => level_capital_string(severity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoding {
    /// Floating-point seconds since the Unix epoch
    EpochSeconds,
    /// RFC 3339 with millisecond precision
    Iso8601,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationEncoding {
    /// Floating-point seconds
    Seconds,
    /// Human-readable, e.g. `1.5s`
    String,
}

/// Key names and value encodings shared by the encoders
///
/// An empty key omits that entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub level_encoding: LevelEncoding,
    pub time_encoding: TimeEncoding,
    pub duration_encoding: DurationEncoding,
}

impl EncoderConfig {
    /// Keys and encodings expected by the production log ingestion pipeline
    pub fn production() -> Self {
        Self {
            time_key: KEY_TIME.to_string(),
            level_key: KEY_LEVEL.to_string(),
            name_key: KEY_LOGGER.to_string(),
            caller_key: KEY_CALLER.to_string(),
            message_key: KEY_MESSAGE.to_string(),
            stacktrace_key: KEY_STACKTRACE.to_string(),
            // Ingestion splits records on CRLF
            line_ending: LINE_ENDING_CRLF.to_string(),
            level_encoding: LevelEncoding::Lowercase,
            time_encoding: TimeEncoding::EpochSeconds,
            duration_encoding: DurationEncoding::Seconds,
        }
    }

    /// Interactive console output
    pub fn development() -> Self {
        Self {
            time_key: "T".to_string(),
            level_key: "L".to_string(),
            name_key: "N".to_string(),
            caller_key: "C".to_string(),
            message_key: "M".to_string(),
            stacktrace_key: "S".to_string(),
            line_ending: LINE_ENDING_LF.to_string(),
            level_encoding: LevelEncoding::Capital,
            time_encoding: TimeEncoding::Iso8601,
            duration_encoding: DurationEncoding::String,
        }
    }

    fn is_entry_key(&self, key: &str) -> bool {
        [
            &self.time_key,
            &self.level_key,
            &self.name_key,
            &self.caller_key,
            &self.message_key,
            &self.stacktrace_key,
        ]
        .into_iter()
        .any(|k| !k.is_empty() && k == key)
    }

    /// Fields that do not collide with an entry key
    pub(crate) fn extra_fields<'a>(
        &'a self,
        fields: &'a [Field],
    ) -> impl Iterator<Item = &'a Field> {
        fields.iter().filter(|f| !self.is_entry_key(f.key()))
    }

    /// Field value overriding the entry stored under `key`
    pub(crate) fn entry_override<'a>(&self, key: &str, fields: &'a [Field]) -> Option<&'a Value> {
        if key.is_empty() {
            return None;
        }
        fields.iter().rev().find(|f| f.key() == key).map(Field::value)
    }
}

/// Entry values of a record after applying field overrides
pub(crate) struct Entry<'a> {
    pub time: DateTime<Utc>,
    pub level: EntryValue<'a>,
    pub name: Option<EntryValue<'a>>,
    pub caller: Option<EntryValue<'a>>,
    pub message: EntryValue<'a>,
    pub stacktrace: Option<EntryValue<'a>>,
}

pub(crate) enum EntryValue<'a> {
    Text(Cow<'a, str>),
    Field(&'a Value),
}

impl<'a> Entry<'a> {
    pub(crate) fn resolve(
        config: &EncoderConfig,
        record: &Record<'a>,
        fields: &'a [Field],
    ) -> Self {
        let pick = |key: &str, default: Option<Cow<'a, str>>| {
            match config.entry_override(key, fields) {
                Some(value) => Some(EntryValue::Field(value)),
                None => default.map(EntryValue::Text),
            }
        };

        let caller = record
            .location
            .map(|location| Cow::Owned(short_caller(location)));

        Entry {
            time: record.time,
            level: pick(
                &config.level_key,
                Some(config.level_encoding.encode(record.severity)),
            )
            .unwrap_or(EntryValue::Text(Cow::Borrowed(""))),
            name: pick(&config.name_key, record.logger_name.map(Cow::Borrowed)),
            caller: pick(&config.caller_key, caller),
            message: pick(&config.message_key, Some(Cow::Borrowed(record.message)))
                .unwrap_or(EntryValue::Text(Cow::Borrowed(""))),
            stacktrace: pick(&config.stacktrace_key, record.stacktrace.map(Cow::Borrowed)),
        }
    }
}

pub(crate) fn encode_time(encoding: TimeEncoding, time: &DateTime<Utc>) -> TimeValue {
    match encoding {
        TimeEncoding::EpochSeconds => {
            TimeValue::Seconds(time.timestamp_micros() as f64 / 1_000_000.0)
        }
        TimeEncoding::Iso8601 => TimeValue::Text(time.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}

pub(crate) enum TimeValue {
    Seconds(f64),
    Text(String),
}
