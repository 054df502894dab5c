//! # Trace Logger System
//!
//! Structured, leveled logging with named loggers and request tracing.
//!
//! ## Features
//!
//! - **Leveled fan-out**: each output group has its own level, adjustable at runtime
//! - **Named loggers**: a registry hands out one shared logger per tag
//! - **Trace scoping**: derived loggers stamp every record with a `traceId`
//! - **Config files**: JSON or YAML, with size/count/age rotation and gzip
//!
//! ```no_run
//! use trace_logger_system::prelude::*;
//!
//! let config = LoggerConfig::from_yaml(b"
//! - output: [stdout, logs/app.log]
//!   level: debug
//!   maxsize: 50
//! ").unwrap();
//!
//! let logger = init_logger("api", &config, 0).unwrap();
//! let request = logger.with_context_trace(&PropagationContext::background());
//! request.info("handling request", fields!["path" => "/orders"]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, MemoryAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        get_logger, init_logger, init_logger_from_file, Appender, ContextKey, Field, FieldValue,
        LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        PropagationContext, Registry, Result, SinkConfig, StructuredLog, TraceLogger,
    };
    pub use crate::fields;
}

pub use appenders::{ConsoleAppender, MemoryAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    generate_trace_id, get_logger, init_logger, init_logger_from_file, Appender, Caller,
    ConsoleEncoder, ContextKey, Encoder, Field, FieldValue, JsonEncoder, LevelHandle, LogEntry,
    LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    PropagationContext, Registry, Result, SinkConfig, StructuredLog, TimestampFormat, TraceLogger,
    TRACE_ID_KEY,
};
