//! Trace-scoped logger
//!
//! A [`TraceLogger`] wraps a shared [`Logger`] and appends the trace
//! identifier of its context as the last field of every record.

use super::{
    field::Field,
    log_level::LogLevel,
    logger::{Logger, StructuredLog},
    propagation::PropagationContext,
};
use std::panic::Location;
use std::sync::Arc;

/// Field key carrying the trace identifier
pub const TRACE_ID_KEY: &str = "traceId";

#[derive(Clone)]
pub struct TraceLogger {
    base: Arc<Logger>,
    ctx: PropagationContext,
}

impl TraceLogger {
    pub(crate) fn new(base: Arc<Logger>, ctx: PropagationContext) -> Self {
        Self { base, ctx }
    }

    /// Context this logger was derived with, including any generated
    /// trace identifier
    pub fn context(&self) -> &PropagationContext {
        &self.ctx
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.ctx.trace_id()
    }

    pub fn base(&self) -> &Arc<Logger> {
        &self.base
    }

    /// Re-derive from `ctx` against the same base logger
    pub fn with_context(&self, ctx: &PropagationContext) -> TraceLogger {
        self.base.with_context_trace(ctx)
    }

    fn decorate(&self, mut fields: Vec<Field>) -> Vec<Field> {
        if let Some(id) = self.ctx.trace_id().filter(|id| !id.is_empty()) {
            // The context's identifier wins and stays last
            fields.retain(|f| f.key != TRACE_ID_KEY);
            fields.push(Field::new(TRACE_ID_KEY, id));
        }
        fields
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: Vec<Field>) -> bool {
        self.base
            .log_at(level, message.as_ref(), self.decorate(fields), Location::caller())
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
        self.base
            .fatal_at(message.as_ref(), self.decorate(fields), Location::caller())
    }

    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>, fields: Vec<Field>) -> ! {
        self.base
            .panic_at(message.as_ref(), self.decorate(fields), Location::caller())
    }

    fn log_at(&self, level: LogLevel, message: &str, fields: Vec<Field>, location: &Location<'_>) {
        // Skip the field copy when nothing would be written
        if !self.base.enabled(level) {
            self.base.log_at(level, message, Vec::new(), location);
            return;
        }
        self.base.log_at(level, message, self.decorate(fields), location);
    }
}

impl StructuredLog for TraceLogger {
    #[track_caller]
    fn debug(&self, message: &str, fields: Vec<Field>) {
        TraceLogger::debug(self, message, fields)
    }

    #[track_caller]
    fn info(&self, message: &str, fields: Vec<Field>) {
        TraceLogger::info(self, message, fields)
    }

    #[track_caller]
    fn warn(&self, message: &str, fields: Vec<Field>) {
        TraceLogger::warn(self, message, fields)
    }

    #[track_caller]
    fn error(&self, message: &str, fields: Vec<Field>) {
        TraceLogger::error(self, message, fields)
    }

    #[track_caller]
    fn fatal(&self, message: &str, fields: Vec<Field>) -> ! {
        TraceLogger::fatal(self, message, fields)
    }

    #[track_caller]
    fn panic(&self, message: &str, fields: Vec<Field>) -> ! {
        TraceLogger::panic(self, message, fields)
    }
}

impl std::fmt::Debug for TraceLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLogger")
            .field("trace_id", &self.trace_id())
            .field("groups", &self.base.group_count())
            .finish()
    }
}
