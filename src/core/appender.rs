//! Appender trait for log output destinations

use super::error::Result;

/// A single byte-output destination.
///
/// Appenders receive records that were already encoded once by the logger;
/// every appender in a group sees identical bytes.
pub trait Appender: Send + Sync {
    fn append(&mut self, encoded: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
