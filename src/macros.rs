//! Logging macros for ergonomic log message formatting.
//!
//! The leveled macros take a logger (a [`Logger`](crate::Logger) or a
//! [`TraceLogger`](crate::TraceLogger)), a format string with its
//! arguments and, after a `;`, optional structured fields.
//!
//! # Examples
//!
//! ```
//! use trace_logger_system::prelude::*;
//! use trace_logger_system::{info, warn};
//!
//! let logger = Logger::default_stdout();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! warn!(logger, "Slow request"; "path" => "/search", "elapsed_ms" => 1250);
//! ```

/// Build a `Vec<Field>` from `key => value` pairs.
///
/// ```
/// use trace_logger_system::{fields, Field};
///
/// let fields: Vec<Field> = fields!["user" => "alice", "attempts" => 3];
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[0].key, "user");
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::vec::Vec::<$crate::Field>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Field::new($key, $value)),+]
    };
}

/// Log a message at an explicit level.
///
/// ```
/// # use trace_logger_system::prelude::*;
/// # let logger = Logger::default_stdout();
/// use trace_logger_system::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500; "retryable" => false);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log($level, ::std::format!($fmt $(, $arg)*), $crate::fields![$($key => $value),+])
    };
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $logger.log($level, ::std::format!($fmt $(, $arg)*), $crate::fields![])
    };
}

/// Log a debug-level message.
///
/// ```
/// # use trace_logger_system::prelude::*;
/// # let logger = Logger::default_stdout();
/// use trace_logger_system::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use trace_logger_system::prelude::*;
/// # let logger = Logger::default_stdout();
/// use trace_logger_system::error;
/// error!(logger, "Failed to connect to {}", "db-1"; "attempt" => 3);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, flush, and exit the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.fatal(::std::format!($fmt $(, $arg)*), $crate::fields![$($key => $value),+])
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $logger.fatal(::std::format!($fmt $(, $arg)*), $crate::fields![])
    };
}
