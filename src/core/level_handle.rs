//! Runtime-adjustable severity threshold

use super::log_level::LogLevel;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Shared, atomically updated level threshold for one output group.
///
/// Clones share the same slot, so a handle kept by the caller can retune a
/// group that is already wired into a logger. Readers racing with a writer
/// see either the old or the new level.
#[derive(Debug, Clone)]
pub struct LevelHandle {
    level: Arc<AtomicU8>,
}

impl LevelHandle {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a record of `level` passes this threshold
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level().permits(level)
    }
}

impl Default for LevelHandle {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}
