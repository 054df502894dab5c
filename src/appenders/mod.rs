//! Appender implementations

pub mod console;
pub mod memory;
pub mod rotating_file;

pub use console::{ConsoleAppender, ConsoleTarget};
pub use memory::MemoryAppender;
pub use rotating_file::{RotatingFileAppender, RotationPolicy};

pub use crate::core::Appender;

use crate::core::{LevelGroup, LevelHandle, LoggerError, Result, SinkConfig, SinkGroup};

/// Open the appender for one destination token.
///
/// `stdout` and `stderr` select the console streams; anything else is a
/// file path rotated according to `policy`.
pub fn open_output(output: &str, policy: &RotationPolicy) -> Result<Box<dyn Appender>> {
    match ConsoleTarget::from_token(output) {
        Some(target) => Ok(Box::new(ConsoleAppender::new(target))),
        None => Ok(Box::new(RotatingFileAppender::with_policy(
            output.trim(),
            policy.clone(),
        )?)),
    }
}

/// Build the sink group and level handle described by one configuration
/// entry. Blank destinations are skipped.
pub fn level_group_from_config(config: &SinkConfig) -> Result<LevelGroup> {
    let policy = RotationPolicy::from_sink_config(config);
    let appenders = config
        .outputs
        .iter()
        .filter(|output| !output.trim().is_empty())
        .map(|output| open_output(output, &policy))
        .collect::<Result<Vec<_>>>()?;

    if appenders.is_empty() {
        return Err(LoggerError::config("SinkConfig", "no output destination"));
    }

    Ok(LevelGroup::new(
        SinkGroup::new(appenders),
        LevelHandle::new(config.level),
    ))
}
