//! File logging example
//!
//! Loads a YAML configuration that writes to a rotating, compressed log file
//! and to stdout, then registers the logger under a tag.
//!
//! Run with: cargo run --example file_logging

use std::fs;
use trace_logger_system::prelude::*;

fn main() -> Result<()> {
    println!("=== Trace Logger System - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("trace_logger_demo");
    fs::create_dir_all(&dir)?;
    let log_path = dir.join("app.log");
    let config_path = dir.join("logger.yaml");

    fs::write(
        &config_path,
        format!(
            "- output: [stdout]\n  level: info\n\
             - output: [\"{}\"]\n  level: debug\n  maxsize: 1\n  maxbackups: 3\n  maxage: 7\n  compress: true\n",
            log_path.display()
        ),
    )?;
    println!("Configuration written to {}", config_path.display());

    let logger = init_logger_from_file("file-demo", &config_path, 0)?;

    for i in 0..5 {
        logger.debug("file only", fields!["iteration" => i]);
        logger.info("stdout and file", fields!["iteration" => i]);
    }

    // Another lookup of the same tag shares the same sinks
    let same = get_logger("file-demo");
    same.warn("written through the registry lookup", vec![]);
    same.close();

    println!("\nLog file contents ({}):", log_path.display());
    print!("{}", fs::read_to_string(&log_path)?);

    let metrics = logger.metrics();
    println!(
        "\nRecords written: {}, filtered: {}, sink failures: {}",
        metrics.total_logged(),
        metrics.filtered_count(),
        metrics.write_failures()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
