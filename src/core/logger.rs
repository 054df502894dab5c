//! Base logger implementation
//!
//! A [`Logger`] owns one encoder and an ordered list of level groups. Every
//! write is attributed to the caller's source location, encoded once and
//! fanned out to each group whose level admits it.

use super::{
    appender::Appender,
    config::LoggerConfig,
    encoder::{ConsoleEncoder, Encoder},
    error::Result,
    fanout::{FanoutWriter, LevelGroup, SinkGroup},
    field::Field,
    level_handle::LevelHandle,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    propagation::PropagationContext,
    trace_logger::TraceLogger,
};
use crate::appenders::{level_group_from_config, ConsoleAppender};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Write operations shared by [`Logger`] and [`TraceLogger`]
///
/// Code that only needs to emit records can take `&dyn StructuredLog` and
/// accept either flavour.
pub trait StructuredLog {
    #[track_caller]
    fn debug(&self, message: &str, fields: Vec<Field>);
    #[track_caller]
    fn info(&self, message: &str, fields: Vec<Field>);
    #[track_caller]
    fn warn(&self, message: &str, fields: Vec<Field>);
    #[track_caller]
    fn error(&self, message: &str, fields: Vec<Field>);
    /// Write, flush every sink, then exit the process with status 1
    #[track_caller]
    fn fatal(&self, message: &str, fields: Vec<Field>) -> !;
    /// Write, flush every sink, then panic with the message
    #[track_caller]
    fn panic(&self, message: &str, fields: Vec<Field>) -> !;
}

pub struct Logger {
    writer: FanoutWriter,
    /// Metrics for observability (records written, filtered, failed writes)
    metrics: LoggerMetrics,
    caller_skip: usize,
    closed: AtomicBool,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use trace_logger_system::prelude::*;
    ///
    /// let memory = MemoryAppender::new();
    /// let logger = Logger::builder()
    ///     .appender(LogLevel::Debug, memory.clone())
    ///     .appender(LogLevel::Error, ConsoleAppender::stderr())
    ///     .build();
    ///
    /// logger.info("service started", fields!["port" => 8080]);
    /// assert_eq!(memory.lines().len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Build a logger from a validated configuration, one level group per
    /// entry in entry order
    ///
    /// `caller_skip` is recorded and reported by [`Logger::caller_skip`] but
    /// does not change attribution: records always name the source line
    /// that called the logging method.
    pub fn from_config(config: &LoggerConfig, caller_skip: usize) -> Result<Self> {
        Ok(LoggerBuilder::from_config(config)?
            .caller_skip(caller_skip)
            .build())
    }

    /// Single stdout group at `Info`
    pub fn default_stdout() -> Self {
        Self::builder()
            .appender(LogLevel::Info, ConsoleAppender::stdout())
            .build()
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: Vec<Field>) -> bool {
        self.log_at(level, message.as_ref(), fields, Location::caller())
    }

    pub(crate) fn log_at(
        &self,
        level: LogLevel,
        message: &str,
        fields: Vec<Field>,
        location: &Location<'_>,
    ) -> bool {
        // Skip building the record when no group would take it
        if !self.writer.enabled(level) {
            self.metrics.record_filtered();
            return false;
        }

        let entry = LogEntry::new(level, message)
            .with_caller(Caller::from_location(location))
            .with_fields(fields);
        self.write_entry(&entry)
    }

    /// Hand a fully built record to the fan-out writer
    pub(crate) fn write_entry(&self, entry: &LogEntry) -> bool {
        self.writer.write(entry, &self.metrics)
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>, fields: Vec<Field>) {
        self.log_at(LogLevel::Debug, message.as_ref(), fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>, fields: Vec<Field>) {
        self.log_at(LogLevel::Info, message.as_ref(), fields, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>, fields: Vec<Field>) {
        self.log_at(LogLevel::Warn, message.as_ref(), fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>, fields: Vec<Field>) {
        self.log_at(LogLevel::Error, message.as_ref(), fields, Location::caller());
    }

    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>, fields: Vec<Field>) -> ! {
        self.fatal_at(message.as_ref(), fields, Location::caller())
    }

    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>, fields: Vec<Field>) -> ! {
        self.panic_at(message.as_ref(), fields, Location::caller())
    }

    pub(crate) fn fatal_at(&self, message: &str, fields: Vec<Field>, location: &Location<'_>) -> ! {
        self.log_at(LogLevel::Fatal, message, fields, location);
        self.close();
        std::process::exit(1)
    }

    pub(crate) fn panic_at(&self, message: &str, fields: Vec<Field>, location: &Location<'_>) -> ! {
        self.log_at(LogLevel::Panic, message, fields, location);
        self.close();
        panic!("{}", message)
    }

    /// Trace-scoped view of this logger carrying `trace_id` verbatim
    pub fn with_trace(self: &Arc<Self>, trace_id: impl Into<String>) -> TraceLogger {
        let ctx = PropagationContext::new().with_trace_id(trace_id);
        TraceLogger::new(Arc::clone(self), ctx)
    }

    /// Trace-scoped view bound to the identifier found in `ctx`. When `ctx`
    /// has none, a fresh one is generated and carried by a derived context,
    /// available through [`TraceLogger::context`]; `ctx` itself is unchanged.
    pub fn with_context_trace(self: &Arc<Self>, ctx: &PropagationContext) -> TraceLogger {
        let (ctx, _) = ctx.ensure_trace_id();
        TraceLogger::new(Arc::clone(self), ctx)
    }

    /// Route records from the `log` facade into this logger.
    ///
    /// Returns `false` if a global `log` logger is already installed, in
    /// which case nothing changes.
    pub fn redirect_standard_log(self: &Arc<Self>) -> bool {
        super::bridge::install(Arc::clone(self))
    }

    /// Set the level of the group at `index`. Out-of-range indices are
    /// ignored and reported as `false`.
    pub fn set_level(&self, index: usize, level: LogLevel) -> bool {
        let applied = self.writer.set_level(index, level);
        if !applied && cfg!(debug_assertions) {
            eprintln!(
                "[LOGGER WARNING] set_level index {} out of range (logger has {} groups); ignored",
                index,
                self.writer.group_count()
            );
        }
        applied
    }

    /// Set the level of every group
    pub fn set_all_levels(&self, level: LogLevel) {
        self.writer.set_all_levels(level);
    }

    pub fn level(&self, index: usize) -> Option<LogLevel> {
        self.writer
            .groups()
            .get(index)
            .map(|g| g.level_handle().level())
    }

    pub fn levels(&self) -> Vec<LogLevel> {
        self.writer.levels()
    }

    /// Clone of the handle controlling the group at `index`
    pub fn level_handle(&self, index: usize) -> Option<LevelHandle> {
        self.writer
            .groups()
            .get(index)
            .map(|g| g.level_handle().clone())
    }

    pub fn group_count(&self) -> usize {
        self.writer.group_count()
    }

    /// Whether any group would accept a record of `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.writer.enabled(level)
    }

    /// Frame skip given at construction; informational only
    pub fn caller_skip(&self) -> usize {
        self.caller_skip
    }

    pub fn encoder_name(&self) -> &str {
        self.writer.encoder().name()
    }

    /// Get logger metrics for observability
    #[must_use]
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every sink, returning the first failure after all were tried
    pub fn flush(&self) -> Result<()> {
        self.writer.flush()
    }

    /// Flush every sink. Failures are reported on stderr, never returned.
    /// Safe to call repeatedly; the logger keeps accepting records.
    pub fn close(&self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush on close: {}", e);
        }
        self.closed.store(true, Ordering::Release);
    }

    /// Whether [`Logger::close`] has been called at least once
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl StructuredLog for Logger {
    #[track_caller]
    fn debug(&self, message: &str, fields: Vec<Field>) {
        Logger::debug(self, message, fields)
    }

    #[track_caller]
    fn info(&self, message: &str, fields: Vec<Field>) {
        Logger::info(self, message, fields)
    }

    #[track_caller]
    fn warn(&self, message: &str, fields: Vec<Field>) {
        Logger::warn(self, message, fields)
    }

    #[track_caller]
    fn error(&self, message: &str, fields: Vec<Field>) {
        Logger::error(self, message, fields)
    }

    #[track_caller]
    fn fatal(&self, message: &str, fields: Vec<Field>) -> ! {
        Logger::fatal(self, message, fields)
    }

    #[track_caller]
    fn panic(&self, message: &str, fields: Vec<Field>) -> ! {
        Logger::panic(self, message, fields)
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Each call to [`group`](LoggerBuilder::group) or
/// [`appender`](LoggerBuilder::appender) adds one level slot; slots are
/// numbered in the order they were added.
pub struct LoggerBuilder {
    groups: Vec<LevelGroup>,
    encoder: Option<Arc<dyn Encoder>>,
    caller_skip: usize,
}

impl LoggerBuilder {
    /// Create a new builder with no groups and the console encoder
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            encoder: None,
            caller_skip: 0,
        }
    }

    /// Builder pre-populated with one group per configuration entry
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::new();
        for sink in &config.sinks {
            builder = builder.level_group(level_group_from_config(sink)?);
        }
        Ok(builder)
    }

    /// Add a group of appenders sharing one level
    #[must_use = "builder methods return a new value"]
    pub fn group(mut self, level: LogLevel, appenders: Vec<Box<dyn Appender>>) -> Self {
        self.groups.push(LevelGroup::new(
            SinkGroup::new(appenders),
            LevelHandle::new(level),
        ));
        self
    }

    /// Add a group holding a single appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(self, level: LogLevel, appender: A) -> Self {
        self.group(level, vec![Box::new(appender)])
    }

    /// Add a prebuilt group, for example one sharing a caller-held
    /// [`LevelHandle`]
    #[must_use = "builder methods return a new value"]
    pub fn level_group(mut self, group: LevelGroup) -> Self {
        self.groups.push(group);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoder<E: Encoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    /// See [`Logger::from_config`]; attribution ignores this value
    #[must_use = "builder methods return a new value"]
    pub fn caller_skip(mut self, skip: usize) -> Self {
        self.caller_skip = skip;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let encoder = self
            .encoder
            .unwrap_or_else(|| Arc::new(ConsoleEncoder::new()));

        Logger {
            writer: FanoutWriter::new(encoder, self.groups),
            metrics: LoggerMetrics::new(),
            caller_skip: self.caller_skip,
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
