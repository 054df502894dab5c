//! Basic logger usage example
//!
//! Demonstrates a two-group console logger, runtime level changes and the
//! logging macros.
//!
//! Run with: cargo run --example basic_usage

use trace_logger_system::prelude::*;
use trace_logger_system::{info, warn};

fn main() -> Result<()> {
    println!("=== Trace Logger System - Basic Usage Example ===\n");

    // Everything from Debug up goes to stdout; errors are repeated on stderr
    let logger = Logger::builder()
        .appender(LogLevel::Debug, ConsoleAppender::stdout())
        .appender(LogLevel::Error, ConsoleAppender::stderr())
        .build();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", vec![]);
    logger.info("This is an info message", fields!["version" => "1.0.0"]);
    logger.warn("This is a warning message", vec![]);
    logger.error("This is an error message", fields!["code" => 500]);

    println!("\n2. Raising the stdout group to WARN:");
    logger.set_level(0, LogLevel::Warn);
    logger.debug("Debug message (hidden)", vec![]);
    logger.info("Info message (hidden)", vec![]);
    logger.warn("Warning message (visible)", vec![]);

    println!("\n3. Macros with format arguments and fields:");
    logger.set_all_levels(LogLevel::Debug);
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, "Slow request"; "path" => "/search", "elapsed_ms" => 1250);

    logger.close();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
