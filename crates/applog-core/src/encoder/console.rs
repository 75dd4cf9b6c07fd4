//! Tab-separated console encoder

use std::fmt::Write as _;

use applog_core_types::{Field, Value};

use crate::encoder::{
    encode_time, DurationEncoding, Encoder, EncoderConfig, Entry, EntryValue, TimeValue,
};
use crate::record::Record;

/// Tab-separated, human-oriented records
///
/// `time  LEVEL  logger  caller  message  {fields}` followed by the stacktrace
/// on its own line when one was captured.
#[derive(Debug, Clone)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, record: &Record<'_>, fields: &[Field]) -> Vec<u8> {
        let config = &self.config;
        let entry = Entry::resolve(config, record, fields);
        let mut columns: Vec<String> = Vec::with_capacity(6);

        if !config.time_key.is_empty() {
            columns.push(match encode_time(config.time_encoding, &entry.time) {
                TimeValue::Seconds(secs) => format!("{:.6}", secs),
                TimeValue::Text(text) => text,
            });
        }
        if !config.level_key.is_empty() {
            columns.push(self.text(&entry.level));
        }
        for value in [&entry.name, &entry.caller].into_iter().flatten() {
            columns.push(self.text(value));
        }
        columns.push(self.text(&entry.message));

        let extra: Vec<&Field> = config.extra_fields(fields).collect();
        if !extra.is_empty() {
            columns.push(self.fields_json(&extra));
        }

        let mut line = columns.join("\t");
        if let Some(stacktrace) = &entry.stacktrace {
            line.push('\n');
            line.push_str(&self.text(stacktrace));
        }
        line.push_str(&config.line_ending);
        line.into_bytes()
    }
}

impl ConsoleEncoder {
    fn text(&self, value: &EntryValue<'_>) -> String {
        match value {
            EntryValue::Text(text) => text.to_string(),
            EntryValue::Field(value) => self.display(value),
        }
    }

    fn display(&self, value: &Value) -> String {
        match (value, self.config.duration_encoding) {
            (Value::Duration(d), DurationEncoding::Seconds) => d.as_secs_f64().to_string(),
            _ => value.to_string(),
        }
    }

    fn fields_json(&self, fields: &[&Field]) -> String {
        let mut out = String::from("{");
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let key = serde_json::to_string(field.key()).unwrap_or_default();
            let value = match (field.value(), self.config.duration_encoding) {
                (Value::Duration(d), DurationEncoding::String) => {
                    serde_json::to_string(&format!("{:?}", d))
                }
                (value, _) => serde_json::to_string(value),
            }
            .unwrap_or_else(|_| "null".to_string());
            let _ = write!(out, "{}: {}", key, value);
        }
        out.push('}');
        out
    }
}
