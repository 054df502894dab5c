//! Core logger types and traits

pub mod appender;
mod bridge;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fanout;
pub mod field;
pub mod level_handle;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod propagation;
pub mod registry;
pub mod timestamp;
pub mod trace_logger;

pub use appender::Appender;
pub use config::{LoggerConfig, SinkConfig};
pub use encoder::{ConsoleEncoder, Encoder, JsonEncoder};
pub use error::{LoggerError, Result};
pub use fanout::{FanoutWriter, LevelGroup, SinkGroup};
pub use field::{Field, FieldValue};
pub use level_handle::LevelHandle;
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, StructuredLog};
pub use metrics::LoggerMetrics;
pub use propagation::{generate_trace_id, ContextKey, PropagationContext};
pub use registry::{get_logger, init_logger, init_logger_from_file, Registry};
pub use timestamp::TimestampFormat;
pub use trace_logger::{TraceLogger, TRACE_ID_KEY};
