//! Record encoders
//!
//! An encoder turns one [`LogEntry`] into the bytes every sink of a logger
//! receives. Encoding happens once per record, before fan-out.
//!
//! - [`ConsoleEncoder`]: tab-separated, human-readable (default)
//! - [`JsonEncoder`]: one JSON object per line

use super::field::fields_to_json;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;

pub trait Encoder: Send + Sync {
    /// Encode a record, including the trailing newline
    fn encode(&self, entry: &LogEntry) -> Vec<u8>;
    fn name(&self) -> &str;
}

/// Tab-separated console layout
///
/// Example:
/// `2025-01-08T10:30:45.123Z\tINFO\tsrc/main.rs:12\tserver started\t{"port":8080}`
#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    timestamp_format: TimestampFormat,
}

impl ConsoleEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &LogEntry) -> Vec<u8> {
        let mut line = String::with_capacity(96 + entry.message.len());
        line.push_str(&self.timestamp_format.format(&entry.timestamp));
        line.push('\t');
        line.push_str(entry.level.to_str());
        if let Some(ref caller) = entry.caller {
            line.push('\t');
            line.push_str(&caller.short());
        }
        line.push('\t');
        line.push_str(&entry.message);

        if !entry.fields.is_empty() {
            line.push('\t');
            let fields = serde_json::Value::Object(fields_to_json(&entry.fields));
            line.push_str(&fields.to_string());
        }

        line.push('\n');
        line.into_bytes()
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Line-delimited JSON layout
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    timestamp_format: TimestampFormat,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &LogEntry) -> Vec<u8> {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "time".to_string(),
            self.timestamp_format.to_json_value(&entry.timestamp),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        if let Some(ref caller) = entry.caller {
            json_obj.insert(
                "caller".to_string(),
                serde_json::Value::String(caller.short()),
            );
        }
        json_obj.insert(
            "msg".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        json_obj.insert(
            "thread_id".to_string(),
            serde_json::Value::String(entry.thread_id.clone()),
        );
        if let Some(ref name) = entry.thread_name {
            json_obj.insert(
                "thread_name".to_string(),
                serde_json::Value::String(name.clone()),
            );
        }

        // Fields come last and may shadow the built-in keys
        json_obj.extend(fields_to_json(&entry.fields));

        let mut bytes = serde_json::to_vec(&serde_json::Value::Object(json_obj)).unwrap_or_default();
        bytes.push(b'\n');
        bytes
    }

    fn name(&self) -> &str {
        "json"
    }
}
