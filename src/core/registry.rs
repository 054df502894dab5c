//! Named logger registry
//!
//! Loggers are registered under a tag and live for as long as the registry.
//! The first successful construction for a tag wins; later constructions
//! return the registered instance and never open a second set of sinks.

use super::{config::LoggerConfig, error::Result, logger::Logger};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

#[derive(Default)]
pub struct Registry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`init_logger`], [`init_logger_from_file`]
    /// and [`get_logger`]
    pub fn global() -> &'static Registry {
        GLOBAL_REGISTRY.get_or_init(Registry::new)
    }

    /// Return the logger registered under `tag`, building and registering
    /// one from `config` if there is none.
    ///
    /// An invalid `config` is rejected even when `tag` is already bound.
    /// When `tag` is bound, `config` and `caller_skip` are ignored.
    pub fn get_or_create(
        &self,
        tag: &str,
        config: &LoggerConfig,
        caller_skip: usize,
    ) -> Result<Arc<Logger>> {
        config.validate()?;

        if let Some(existing) = self.loggers.read().get(tag) {
            warn_discarded(tag);
            return Ok(Arc::clone(existing));
        }

        // Build under the write lock so a racing caller cannot open the same
        // files a second time
        let mut loggers = self.loggers.write();
        if let Some(existing) = loggers.get(tag) {
            warn_discarded(tag);
            return Ok(Arc::clone(existing));
        }

        let logger = Arc::new(Logger::from_config(config, caller_skip)?);
        loggers.insert(tag.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// [`Registry::get_or_create`] with the configuration read from a
    /// `.json`, `.yaml` or `.yml` file
    pub fn get_or_create_from_file(
        &self,
        tag: &str,
        path: impl AsRef<Path>,
        caller_skip: usize,
    ) -> Result<Arc<Logger>> {
        let config = LoggerConfig::from_file(path)?;
        self.get_or_create(tag, &config, caller_skip)
    }

    /// Logger registered under `tag`. An unbound tag is bound to a new
    /// stdout logger at `Info`, which later lookups then share.
    pub fn get(&self, tag: &str) -> Arc<Logger> {
        if let Some(existing) = self.loggers.read().get(tag) {
            return Arc::clone(existing);
        }

        let mut loggers = self.loggers.write();
        Arc::clone(
            loggers
                .entry(tag.to_string())
                .or_insert_with(|| Arc::new(Logger::default_stdout())),
        )
    }

    /// Registered logger for `tag`, without creating one
    pub fn lookup(&self, tag: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.loggers.read().contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.loggers.read().keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Flush every registered logger
    pub fn close_all(&self) {
        for logger in self.loggers.read().values() {
            logger.close();
        }
    }
}

fn warn_discarded(tag: &str) {
    if cfg!(debug_assertions) {
        eprintln!(
            "[LOGGER WARNING] Logger '{}' already exists; new configuration discarded",
            tag
        );
    }
}

/// Build (or fetch) the logger for `tag` in the global registry
///
/// `caller_skip` is stored on the logger only. Source locations come from
/// the call site of each logging method regardless of its value.
pub fn init_logger(tag: &str, config: &LoggerConfig, caller_skip: usize) -> Result<Arc<Logger>> {
    Registry::global().get_or_create(tag, config, caller_skip)
}

/// Build (or fetch) the logger for `tag` in the global registry from a
/// configuration file
pub fn init_logger_from_file(
    tag: &str,
    path: impl AsRef<Path>,
    caller_skip: usize,
) -> Result<Arc<Logger>> {
    Registry::global().get_or_create_from_file(tag, path, caller_skip)
}

/// Logger for `tag` in the global registry; never fails
pub fn get_logger(tag: &str) -> Arc<Logger> {
    Registry::global().get(tag)
}
