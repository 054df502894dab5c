//! Sink groups and the leveled fan-out writer
//!
//! A [`SinkGroup`] broadcasts one encoded record to every appender it owns.
//! A [`LevelGroup`] pairs a sink group with its own [`LevelHandle`]. The
//! [`FanoutWriter`] encodes each record once and hands the bytes to every
//! level group whose threshold admits the record.

use super::{
    appender::Appender,
    encoder::Encoder,
    error::{LoggerError, Result},
    level_handle::LevelHandle,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Best-effort broadcast over several appenders
///
/// A failing or panicking appender is reported and skipped; the others
/// still receive the record.
pub struct SinkGroup {
    appenders: Mutex<Vec<Box<dyn Appender>>>,
}

impl SinkGroup {
    pub fn new(appenders: Vec<Box<dyn Appender>>) -> Self {
        Self {
            appenders: Mutex::new(appenders),
        }
    }

    pub fn len(&self) -> usize {
        self.appenders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.appenders.lock().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.appenders
            .lock()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Write to every appender, returning how many of them failed
    pub fn write(&self, encoded: &[u8]) -> usize {
        let mut appenders = self.appenders.lock();
        let mut failures = 0;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = catch_unwind(AssertUnwindSafe(|| appender.append(encoded)));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    failures += 1;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                    failures += 1;
                }
            }
        }

        failures
    }

    /// Flush every appender; the first failure is returned after all ran
    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        let mut first_error = None;

        for appender in appenders.iter_mut() {
            let flush_result = catch_unwind(AssertUnwindSafe(|| appender.flush()));
            let outcome = match flush_result {
                Ok(result) => result,
                Err(panic_info) => Err(LoggerError::writer(format!(
                    "appender '{}' panicked during flush: {}",
                    appender.name(),
                    panic_message(panic_info.as_ref())
                ))),
            };
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// One independently leveled output slot
pub struct LevelGroup {
    sinks: SinkGroup,
    level: LevelHandle,
}

impl LevelGroup {
    pub fn new(sinks: SinkGroup, level: LevelHandle) -> Self {
        Self { sinks, level }
    }

    pub fn sinks(&self) -> &SinkGroup {
        &self.sinks
    }

    pub fn level_handle(&self) -> &LevelHandle {
        &self.level
    }
}

impl std::fmt::Debug for LevelGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelGroup")
            .field("sinks", &self.sinks.names())
            .field("level", &self.level)
            .finish()
    }
}

/// Encode-once, filter-per-group writer shared by a logger
pub struct FanoutWriter {
    encoder: Arc<dyn Encoder>,
    groups: Vec<LevelGroup>,
}

impl FanoutWriter {
    pub fn new(encoder: Arc<dyn Encoder>, groups: Vec<LevelGroup>) -> Self {
        Self { encoder, groups }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> &[LevelGroup] {
        &self.groups
    }

    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    /// Whether any group would accept a record of `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.groups.iter().any(|g| g.level.enabled(level))
    }

    /// Set the threshold of one slot. Returns `false` for an index outside
    /// `[0, group_count)`, leaving every slot untouched.
    pub fn set_level(&self, index: usize, level: LogLevel) -> bool {
        match self.groups.get(index) {
            Some(group) => {
                group.level.set_level(level);
                true
            }
            None => false,
        }
    }

    /// Set every slot, one at a time
    pub fn set_all_levels(&self, level: LogLevel) {
        for group in &self.groups {
            group.level.set_level(level);
        }
    }

    pub fn levels(&self) -> Vec<LogLevel> {
        self.groups.iter().map(|g| g.level.level()).collect()
    }

    /// Encode `entry` at most once and forward it to each admitting group.
    /// Returns `true` if at least one group accepted the record.
    pub fn write(&self, entry: &LogEntry, metrics: &LoggerMetrics) -> bool {
        let mut encoded: Option<Vec<u8>> = None;
        let mut delivered = false;

        for group in &self.groups {
            if !group.level.enabled(entry.level) {
                continue;
            }
            let bytes = encoded.get_or_insert_with(|| self.encoder.encode(entry));
            for _ in 0..group.sinks.write(bytes) {
                metrics.record_write_failure();
            }
            delivered = true;
        }

        if delivered {
            metrics.record_logged();
        } else {
            metrics.record_filtered();
        }
        delivered
    }

    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for group in &self.groups {
            if let Err(e) = group.sinks.flush() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
