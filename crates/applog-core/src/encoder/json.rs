//! JSON encoder for production ingestion

use applog_core_types::{Field, Value};
use serde::Serialize;

use crate::encoder::{
    encode_time, DurationEncoding, Encoder, EncoderConfig, Entry, EntryValue, TimeValue,
};
use crate::record::Record;

/// One JSON object per record
///
/// Keys are written in the order level, time, logger, caller, message,
/// fields, stacktrace.
#[derive(Debug, Clone)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, record: &Record<'_>, fields: &[Field]) -> Vec<u8> {
        let config = &self.config;
        let entry = Entry::resolve(config, record, fields);
        let mut object = JsonObject::new(config.duration_encoding);

        object.entry(&config.level_key, Some(&entry.level));
        if !config.time_key.is_empty() {
            match encode_time(config.time_encoding, &entry.time) {
                TimeValue::Seconds(secs) => object.serialized(&config.time_key, &secs),
                TimeValue::Text(text) => object.serialized(&config.time_key, &text),
            }
        }
        object.entry(&config.name_key, entry.name.as_ref());
        object.entry(&config.caller_key, entry.caller.as_ref());
        object.entry(&config.message_key, Some(&entry.message));
        for field in config.extra_fields(fields) {
            object.value(field.key(), field.value());
        }
        object.entry(&config.stacktrace_key, entry.stacktrace.as_ref());

        object.finish(&config.line_ending)
    }
}

struct JsonObject {
    buf: Vec<u8>,
    empty: bool,
    durations: DurationEncoding,
}

impl JsonObject {
    fn new(durations: DurationEncoding) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.push(b'{');
        Self {
            buf,
            empty: true,
            durations,
        }
    }

    fn key(&mut self, key: &str) {
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
        write_json(&mut self.buf, key);
        self.buf.push(b':');
    }

    fn serialized<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.key(key);
        write_json(&mut self.buf, value);
    }

    fn value(&mut self, key: &str, value: &Value) {
        match (value, self.durations) {
            (Value::Duration(d), DurationEncoding::String) => {
                self.serialized(key, &format!("{:?}", d))
            }
            _ => self.serialized(key, value),
        }
    }

    fn entry(&mut self, key: &str, value: Option<&EntryValue<'_>>) {
        if key.is_empty() {
            return;
        }
        match value {
            Some(EntryValue::Text(text)) => self.serialized(key, text.as_ref()),
            Some(EntryValue::Field(value)) => self.value(key, value),
            None => {}
        }
    }

    fn finish(mut self, line_ending: &str) -> Vec<u8> {
        self.buf.push(b'}');
        self.buf.extend_from_slice(line_ending.as_bytes());
        self.buf
    }
}

fn write_json<T: Serialize + ?Sized>(buf: &mut Vec<u8>, value: &T) {
    // Writing into a Vec only fails for unrepresentable values
    if serde_json::to_writer(&mut *buf, value).is_err() {
        buf.extend_from_slice(b"null");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;
    use chrono::{DateTime, Utc};
    use std::panic::Location;
    use std::time::Duration;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn decode(bytes: &[u8]) -> serde_json::Value {
        let text = std::str::from_utf8(bytes).unwrap();
        assert!(text.ends_with("\r\n"), "record must end with CRLF: {:?}", text);
        serde_json::from_str(text.trim_end()).unwrap()
    }

    #[test]
    fn test_production_record_shape() {
        let encoder = JsonEncoder::new(EncoderConfig::production());
        let fields = [Field::string("user_id", "u1"), Field::new("attempt", 2i64)];
        let location = Location::caller();
        let record = Record {
            severity: Severity::Warn,
            time: fixed_time(),
            logger_name: Some("billing"),
            location: Some(location),
            message: "retrying",
            fields: &fields,
            stacktrace: None,
        };

        let json = decode(&encoder.encode(&record, &fields));

        assert_eq!(json["level"], "[warn]");
        assert_eq!(json["ts"], 1_704_067_200.0);
        assert_eq!(json["logger"], "billing");
        assert_eq!(json["caller"], format!("encoder/json.rs:{}", location.line()).as_str());
        assert_eq!(json["msg"], "retrying");
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["attempt"], 2);
        assert!(json.get("stacktrace").is_none());
    }

    #[test]
    fn test_key_order() {
        let encoder = JsonEncoder::new(EncoderConfig::production());
        let fields = [Field::new("k", true)];
        let record = Record {
            severity: Severity::Error,
            time: fixed_time(),
            logger_name: Some("svc"),
            location: Some(Location::caller()),
            message: "m",
            fields: &fields,
            stacktrace: Some("trace"),
        };

        let text = String::from_utf8(encoder.encode(&record, &fields)).unwrap();
        let keys = [
            "\"level\"",
            "\"ts\"",
            "\"logger\"",
            "\"caller\"",
            "\"msg\"",
            "\"k\"",
            "\"stacktrace\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(*k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
    }

    #[test]
    fn test_caller_field_replaces_entry_caller() {
        let encoder = JsonEncoder::new(EncoderConfig::production());
        let fields = [Field::string("caller", "handle@server.rs:10")];
        let record = Record {
            severity: Severity::Info,
            time: fixed_time(),
            logger_name: None,
            location: Some(Location::caller()),
            message: "m",
            fields: &fields,
            stacktrace: None,
        };

        let text = String::from_utf8(encoder.encode(&record, &fields)).unwrap();
        assert_eq!(text.matches("\"caller\"").count(), 1);
        let json = decode(text.as_bytes());
        assert_eq!(json["caller"], "handle@server.rs:10");
        assert!(json.get("logger").is_none());
    }

    #[test]
    fn test_durations() {
        let fields = [Field::new("elapsed", Duration::from_millis(1500))];
        let record = Record {
            severity: Severity::Info,
            time: fixed_time(),
            logger_name: None,
            location: None,
            message: "done",
            fields: &fields,
            stacktrace: None,
        };

        let encoder = JsonEncoder::new(EncoderConfig::production());
        let seconds = decode(&encoder.encode(&record, &fields));
        assert_eq!(seconds["elapsed"], 1.5);

        let mut config = EncoderConfig::production();
        config.duration_encoding = DurationEncoding::String;
        let text = decode(&JsonEncoder::new(config).encode(&record, &fields));
        assert_eq!(text["elapsed"], "1.5s");
        assert!(text.get("caller").is_none());
    }
}
