//! Rotating file appender with automatic log rotation
//!
//! The active file is rotated into numbered backups (`app.log.1` is the most
//! recent, then `app.log.2`, ...) once the next write would push it past the
//! size limit. Backups are pruned by count and by age and can be gzipped.

use crate::core::appender::Appender;
use crate::core::config::SinkConfig;
use crate::core::error::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const MEGABYTE: u64 = 1024 * 1024;

/// Size used when a configuration leaves `maxsize` at zero
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Retention and rotation settings for a [`RotatingFileAppender`]
///
/// # Examples
///
/// ```
/// use trace_logger_system::appenders::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(30 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_backup_files, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the file would exceed this many bytes
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep; 0 keeps every backup
    pub max_backup_files: usize,
    /// Remove rotated files older than this
    pub max_age: Option<Duration>,
    /// Whether to compress rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backup_files: 0,
            max_age: None,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy described by the numeric fields of a configuration entry
    /// (megabytes, count, days)
    #[must_use]
    pub fn from_sink_config(config: &SinkConfig) -> Self {
        let max_size_mb = if config.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            config.max_size_mb
        };
        let max_age = (config.max_age_days > 0)
            .then(|| Duration::from_secs(config.max_age_days.saturating_mul(SECONDS_PER_DAY)));

        Self {
            max_bytes: max_size_mb.saturating_mul(MEGABYTE),
            max_backup_files: config.max_backups,
            max_age,
            compress: config.compress,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_bytes = size;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Size-rotated file appender
///
/// # Examples
///
/// ```no_run
/// use trace_logger_system::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size(10 * 1024 * 1024).with_max_backups(3);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    name: String,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    /// Counter for consecutive deletion failures (reset on successful deletion)
    deletion_failure_count: usize,
}

impl RotatingFileAppender {
    /// Create a rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a rotating file appender with a custom policy
    ///
    /// # Errors
    ///
    /// Returns error if the parent directory or the file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_file(&base_path)?;

        Ok(Self {
            name: base_path.display().to_string(),
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            deletion_failure_count: 0,
        })
    }

    fn open_file(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.current_size > 0 && self.current_size + incoming > self.policy.max_bytes
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        // Explicitly drop writer to release file handle before renaming
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let highest = if self.policy.max_backup_files > 0 {
            self.remove_oldest_backup()?;
            self.policy.max_backup_files - 1
        } else {
            self.existing_backups()
                .iter()
                .map(|(index, _)| *index)
                .max()
                .unwrap_or(0)
        };

        // Shift existing backups up by one, newest last
        for i in (1..=highest).rev() {
            let old_path = self.backup_path(i);
            let old_compressed = Self::compressed_path(&old_path);

            if old_compressed.exists() {
                let new_compressed = Self::compressed_path(&self.backup_path(i + 1));
                Self::rename_replacing(&old_compressed, &new_compressed)?;
            } else if old_path.exists() {
                Self::rename_replacing(&old_path, &self.backup_path(i + 1))?;
            }
        }

        // Move current file to .1
        let backup_path = self.backup_path(1);
        if self.base_path.exists() {
            fs::rename(&self.base_path, &backup_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                self.compress_file(&backup_path)?;
            }
        }

        let (file, _) = Self::open_file(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;

        self.remove_expired_backups();
        Ok(())
    }

    /// Delete the backup that would fall outside `max_backup_files`
    fn remove_oldest_backup(&mut self) -> Result<()> {
        const MAX_DELETION_FAILURES: usize = 5;

        let oldest_backup = self.backup_path(self.policy.max_backup_files);
        let oldest_compressed = Self::compressed_path(&oldest_backup);
        let mut deletion_failed = false;

        for candidate in [&oldest_compressed, &oldest_backup] {
            if candidate.exists() {
                if let Err(e) = fs::remove_file(candidate) {
                    deletion_failed = true;
                    eprintln!(
                        "[WARN] Failed to remove oldest backup {}: {} (failure #{}/{})",
                        candidate.display(),
                        e,
                        self.deletion_failure_count + 1,
                        MAX_DELETION_FAILURES
                    );
                }
            }
        }

        if !deletion_failed {
            self.deletion_failure_count = 0;
            return Ok(());
        }

        self.deletion_failure_count += 1;
        if self.deletion_failure_count >= MAX_DELETION_FAILURES {
            return Err(LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!(
                    "Rotation aborted: failed to delete old backup files {} consecutive times",
                    self.deletion_failure_count
                ),
            ));
        }
        Ok(())
    }

    /// Drop backups whose modification time is older than `max_age`
    fn remove_expired_backups(&self) {
        let Some(max_age) = self.policy.max_age else {
            return;
        };
        let now = SystemTime::now();

        for (_, path) in self.existing_backups() {
            let expired = fs::metadata(&path)
                .and_then(|m| m.modified())
                .map(|modified| now.duration_since(modified).unwrap_or(Duration::ZERO) > max_age)
                .unwrap_or(false);

            if expired {
                if let Err(e) = fs::remove_file(&path) {
                    eprintln!("[WARN] Failed to remove expired backup {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Rotated files next to the active file, as `(index, path)`
    fn existing_backups(&self) -> Vec<(usize, PathBuf)> {
        let Some(file_name) = self.base_path.file_name().and_then(|n| n.to_str()) else {
            return Vec::new();
        };
        let dir = match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = format!("{}.", file_name);

        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let suffix = name.strip_prefix(&prefix)?;
                let index = suffix.strip_suffix(".gz").unwrap_or(suffix);
                let index: usize = index.parse().ok()?;
                Some((index, entry.path()))
            })
            .collect()
    }

    fn rename_replacing(from: &Path, to: &Path) -> Result<()> {
        if fs::rename(from, to).is_ok() {
            return Ok(());
        }
        // On some platforms, rename fails if destination exists
        if to.exists() {
            let _ = fs::remove_file(to);
        }
        fs::rename(from, to).map_err(|e| {
            LoggerError::file_rotation(
                from.display().to_string(),
                format!("Failed to rotate backup files: {}", e),
            )
        })
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn compressed_path(path: &Path) -> PathBuf {
        let mut compressed = path.as_os_str().to_owned();
        compressed.push(".gz");
        PathBuf::from(compressed)
    }

    /// Gzip a rotated file; the original is removed only after the
    /// compressed copy is complete
    fn compress_file(&self, path: &Path) -> Result<()> {
        use std::io::{BufReader, Read};

        let gz_path = Self::compressed_path(path);
        let mut temp_name = gz_path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_gz_path = PathBuf::from(temp_name);

        let input = File::open(path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to open file for compression: {}", path.display()),
                e,
            )
        })?;
        let mut reader = BufReader::with_capacity(64 * 1024, input);

        let output = File::create(&temp_gz_path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
                e,
            )
        })?;
        let mut encoder = flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, output),
            flate2::Compression::default(),
        );

        let cleanup = |e: std::io::Error, message: &str| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", message.to_string(), e)
        };

        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| cleanup(e, "Failed to read from rotated file"))?;
            if bytes_read == 0 {
                break;
            }
            encoder
                .write_all(&buffer[..bytes_read])
                .map_err(|e| cleanup(e, "Failed to compress data chunk"))?;
        }

        let mut inner = encoder
            .finish()
            .map_err(|e| cleanup(e, "Failed to finish compression"))?;
        inner
            .flush()
            .map_err(|e| cleanup(e, "Failed to flush compressed file"))?;
        drop(inner);

        fs::rename(&temp_gz_path, &gz_path)
            .map_err(|e| cleanup(e, "Failed to move compressed file into place"))?;

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[WARN] Compression succeeded but failed to remove original file {}: {}",
                path.display(),
                e
            );
        }

        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&mut self, encoded: &[u8]) -> Result<()> {
        let incoming = encoded.len() as u64;

        if self.should_rotate(incoming) {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[WARN] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    let (file, size) = Self::open_file(&self.base_path)?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }

                // Allow the file to grow past the limit rather than retry on every write
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(encoded).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::io::Read;
    use tempfile::tempdir;

    fn record(i: usize) -> Vec<u8> {
        format!("2025-01-08T10:30:45.123Z\tINFO\tTest message number {}\n", i).into_bytes()
    }

    #[test]
    fn test_policy_from_sink_config() {
        let config = SinkConfig::new(LogLevel::Info)
            .with_output("app.log")
            .with_max_size_mb(10)
            .with_max_backups(3)
            .with_max_age_days(7)
            .with_compression(true);
        let policy = RotationPolicy::from_sink_config(&config);

        assert_eq!(policy.max_bytes, 10 * 1024 * 1024);
        assert_eq!(policy.max_backup_files, 3);
        assert_eq!(policy.max_age, Some(Duration::from_secs(7 * 24 * 3600)));
        assert!(policy.compress);
    }

    #[test]
    fn test_policy_zero_values_use_defaults() {
        let policy = RotationPolicy::from_sink_config(&SinkConfig::new(LogLevel::Info));
        assert_eq!(policy.max_bytes, DEFAULT_MAX_SIZE_MB * 1024 * 1024);
        assert_eq!(policy.max_backup_files, 0);
        assert_eq!(policy.max_age, None);
        assert!(!policy.compress);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested/deeper/app.log");

        let appender = RotatingFileAppender::new(&log_path).unwrap();
        assert_eq!(appender.path(), log_path);
        assert_eq!(appender.current_size(), 0);
        assert!(log_path.exists());
    }

    #[test]
    fn test_size_rotation_creates_backup() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let policy = RotationPolicy::new().with_max_size(200).with_max_backups(3);

        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();
        for i in 0..20 {
            appender.append(&record(i)).unwrap();
        }
        appender.flush().unwrap();

        assert!(dir.path().join("rotation.log.1").exists());
        assert!(fs::metadata(&log_path).unwrap().len() <= 200);
    }

    #[test]
    fn test_backup_count_is_bounded() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let policy = RotationPolicy::new().with_max_size(60).with_max_backups(2);

        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();
        for i in 0..100 {
            appender.append(&record(i)).unwrap();
        }
        appender.flush().unwrap();

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_str().unwrap().starts_with("multi.log"))
            .count();
        assert_eq!(log_files, 3); // current + 2 backups
    }

    #[test]
    fn test_zero_backups_keeps_everything() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("all.log");
        let policy = RotationPolicy::new().with_max_size(60);

        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();
        for i in 0..6 {
            appender.append(&record(i)).unwrap();
        }
        appender.flush().unwrap();

        // Any two records exceed the limit, so every write after the first rotates
        for index in 1..=5 {
            assert!(dir.path().join(format!("all.log.{}", index)).exists());
        }
        let newest = fs::read_to_string(dir.path().join("all.log.1")).unwrap();
        assert!(newest.contains("number 4"));
        let oldest = fs::read_to_string(dir.path().join("all.log.5")).unwrap();
        assert!(oldest.contains("number 0"));
    }

    #[test]
    fn test_compressed_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("zipped.log");
        let policy = RotationPolicy::new()
            .with_max_size(60)
            .with_max_backups(2)
            .with_compression(true);

        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();
        appender.append(&record(1)).unwrap();
        appender.append(&record(2)).unwrap();
        appender.flush().unwrap();

        let gz_path = dir.path().join("zipped.log.1.gz");
        assert!(gz_path.exists());
        assert!(!dir.path().join("zipped.log.1").exists());

        let mut decoder = flate2::read::GzDecoder::new(File::open(gz_path).unwrap());
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        assert!(text.contains("Test message number 1"));
    }

    #[test]
    fn test_expired_backups_removed() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("aged.log");
        let policy = RotationPolicy::new()
            .with_max_size(60)
            .with_max_age(Duration::from_millis(50));

        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();
        appender.append(&record(1)).unwrap();
        appender.append(&record(2)).unwrap();
        assert!(dir.path().join("aged.log.1").exists());

        std::thread::sleep(Duration::from_millis(120));
        appender.append(&record(3)).unwrap();

        // The backup written before the pause aged out during this rotation
        assert!(dir.path().join("aged.log.1").exists());
        assert!(!dir.path().join("aged.log.2").exists());
    }

    #[test]
    fn test_reopen_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("reopen.log");

        {
            let mut appender = RotatingFileAppender::new(&log_path).unwrap();
            appender.append(b"first\n").unwrap();
        }

        let mut appender = RotatingFileAppender::new(&log_path).unwrap();
        assert_eq!(appender.current_size(), 6);
        appender.append(b"second\n").unwrap();
        appender.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "first\nsecond\n");
    }
}
