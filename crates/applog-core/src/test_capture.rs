//! In-memory sink for deterministic logging assertions
//!
//! Clones of a [`CaptureSink`], including sinks derived through
//! [`Sink::with_fields`], share one record buffer.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use applog_core_types::{merge_fields, Field, Value};

use crate::caller::short_caller;
use crate::errors::{LogError, Result};
use crate::level::Severity;
use crate::record::Record;
use crate::sink::Sink;

/// A captured record with its merged fields
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRecord {
    pub severity: Severity,
    pub message: String,
    pub logger_name: Option<String>,
    /// Short caller, e.g. `src/handler.rs:42`
    pub location: Option<String>,
    /// Attached fields merged with the call's fields
    pub fields: Vec<Field>,
    pub has_stacktrace: bool,
}

impl CapturedRecord {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.key() == key).map(Field::value)
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Default)]
struct CaptureState {
    records: Mutex<Vec<CapturedRecord>>,
    fail_sync: AtomicBool,
    sync_count: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct CaptureSink {
    state: Arc<CaptureState>,
    level: Severity,
    fields: Vec<Field>,
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSink {
    /// Capture every severity
    pub fn new() -> Self {
        Self::with_level(Severity::Debug)
    }

    pub fn with_level(level: Severity) -> Self {
        Self {
            state: Arc::new(CaptureState::default()),
            level,
            fields: Vec::new(),
        }
    }

    /// Get all captured records
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.state
            .records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Clear all captured records
    pub fn clear(&self) {
        self.state.records.lock().map(|mut r| r.clear()).ok();
    }

    /// Count records matching a predicate
    pub fn count_records<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedRecord) -> bool,
    {
        self.records().iter().filter(|r| predicate(r)).count()
    }

    /// Assert that a record exists with the given severity and message
    ///
    /// # Panics
    ///
    /// Panics if the record is not found
    pub fn assert_record_exists(&self, severity: Severity, message: &str) {
        let records = self.records();
        let found = records
            .iter()
            .any(|r| r.severity == severity && r.message == message);
        assert!(
            found,
            "Expected record severity={} message={:?} not found in {} captured records",
            severity,
            message,
            records.len()
        );
    }

    /// Make every subsequent `sync` fail with a broken pipe
    pub fn set_fail_sync(&self, fail: bool) {
        self.state.fail_sync.store(fail, Ordering::SeqCst);
    }

    /// Number of `sync` calls so far, failed ones included
    pub fn sync_count(&self) -> usize {
        self.state.sync_count.load(Ordering::SeqCst)
    }
}

impl Sink for CaptureSink {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    fn write(&self, record: &Record<'_>) {
        let captured = CapturedRecord {
            severity: record.severity,
            message: record.message.to_string(),
            logger_name: record.logger_name.map(str::to_string),
            location: record.location.map(short_caller),
            fields: merge_fields([&self.fields[..], record.fields]),
            has_stacktrace: record.stacktrace.is_some(),
        };
        self.state
            .records
            .lock()
            .map(|mut records| records.push(captured))
            .ok();
    }

    fn with_fields(&self, fields: &[Field]) -> Arc<dyn Sink> {
        Arc::new(Self {
            state: self.state.clone(),
            level: self.level,
            fields: merge_fields([&self.fields[..], fields]),
        })
    }

    fn sync(&self) -> Result<()> {
        self.state.sync_count.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_sync.load(Ordering::SeqCst) {
            return Err(LogError::Flush(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "capture sink closed",
            )));
        }
        Ok(())
    }
}
