//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::Write;

/// Which standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

impl ConsoleTarget {
    /// Match the reserved destination tokens `stdout` / `stderr`
    /// (case-insensitive, surrounding whitespace ignored)
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("stdout") {
            Some(ConsoleTarget::Stdout)
        } else if token.eq_ignore_ascii_case("stderr") {
            Some(ConsoleTarget::Stderr)
        } else {
            None
        }
    }
}

pub struct ConsoleAppender {
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, encoded: &[u8]) -> Result<()> {
        // Locking keeps one record contiguous when threads interleave
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(encoded)?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(encoded)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}
