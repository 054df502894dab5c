//! Bridge from the `log` facade
//!
//! Records emitted through `log::info!` and friends are converted into
//! [`LogEntry`] values and written by a [`Logger`]. Key-values attached with
//! the `kv` syntax (`log::info!(user = "bob"; "login")`) become fields.

use super::{
    field::Field,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    logger::Logger,
};
use std::sync::Arc;

struct StandardLogBridge {
    logger: Arc<Logger>,
}

struct FieldCollector {
    fields: Vec<Field>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for FieldCollector {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.fields.push(Field::new(key.to_string(), field_value(&value)));
        Ok(())
    }
}

fn field_value(value: &log::kv::Value<'_>) -> super::field::FieldValue {
    use super::field::FieldValue;

    if let Some(b) = value.to_bool() {
        FieldValue::Bool(b)
    } else if let Some(i) = value.to_i64() {
        FieldValue::Int(i)
    } else if let Some(u) = value.to_u64() {
        FieldValue::Uint(u)
    } else if let Some(f) = value.to_f64() {
        FieldValue::Float(f)
    } else {
        FieldValue::String(value.to_string())
    }
}

/// Convert a `log` record into an entry attributed to the record's own
/// file and line
fn entry_from_record(record: &log::Record<'_>) -> LogEntry {
    let mut collector = FieldCollector { fields: Vec::new() };
    if let Err(e) = record.key_values().visit(&mut collector) {
        eprintln!("[LOGGER WARNING] Dropped key-values of redirected record: {}", e);
    }

    let mut entry =
        LogEntry::new(LogLevel::from(record.level()), record.args().to_string()).with_fields(collector.fields);
    if let (Some(file), Some(line)) = (record.file(), record.line()) {
        entry = entry.with_caller(Caller::new(file, line));
    }
    entry
}

impl log::Log for StandardLogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            self.logger.metrics().record_filtered();
            return;
        }
        self.logger.write_entry(&entry_from_record(record));
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush redirected records: {}", e);
        }
    }
}

/// Install `logger` as the global `log` logger and open the global level
/// filter fully; per-group levels still apply.
///
/// Returns `false` if a global logger was already set.
pub(crate) fn install(logger: Arc<Logger>) -> bool {
    match log::set_boxed_logger(Box::new(StandardLogBridge { logger })) {
        Ok(()) => {
            log::set_max_level(log::LevelFilter::Trace);
            true
        }
        Err(_) => {
            if cfg!(debug_assertions) {
                eprintln!("[LOGGER WARNING] A global `log` logger is already installed; redirect ignored");
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::JsonEncoder;
    use log::Log;

    fn bridge() -> (StandardLogBridge, MemoryAppender) {
        let memory = MemoryAppender::new();
        let logger = Logger::builder()
            .appender(LogLevel::Info, memory.clone())
            .encoder(JsonEncoder::new())
            .build();
        (
            StandardLogBridge {
                logger: Arc::new(logger),
            },
            memory,
        )
    }

    #[test]
    fn test_record_forwarded_with_location() {
        let (bridge, memory) = bridge();
        let kvs = [("user", log::kv::Value::from("bob")), ("attempt", log::kv::Value::from(3i64))];

        bridge.log(
            &log::Record::builder()
                .args(format_args!("login from {}", "10.0.0.1"))
                .level(log::Level::Warn)
                .file(Some("src/auth/session.rs"))
                .line(Some(88))
                .key_values(&kvs)
                .build(),
        );

        let record: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
        assert_eq!(record["level"], "WARN");
        assert_eq!(record["msg"], "login from 10.0.0.1");
        assert_eq!(record["caller"], "auth/session.rs:88");
        assert_eq!(record["user"], "bob");
        assert_eq!(record["attempt"], 3);
    }

    #[test]
    fn test_levels_respected() {
        let (bridge, memory) = bridge();
        bridge.log(
            &log::Record::builder()
                .args(format_args!("verbose"))
                .level(log::Level::Trace)
                .build(),
        );

        assert!(memory.contents().is_empty());
        assert!(!bridge.enabled(&log::Metadata::builder().level(log::Level::Debug).build()));
        assert!(bridge.enabled(&log::Metadata::builder().level(log::Level::Error).build()));
    }
}
