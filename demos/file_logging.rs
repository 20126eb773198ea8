//! File logging example
//!
//! Demonstrates JSON lines written to a file, sync, and close.
//!
//! Run with: cargo run --example file_logging

use leveled_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Leveled Logger - File Logging Example ===\n");

    let log_path = std::env::temp_dir().join("leveled_logger_demo.log");

    let logger = Logger::builder()
        .level("info")
        .output_path(log_path.display().to_string())
        .context("file-demo")
        .time_layout("%Y-%m-%d %H:%M:%S%.3f")
        .build()?;

    for i in 0..5 {
        logger.info_with("processed batch", &[Field::new("batch", i)]);
    }
    logger.error(&[&"one batch failed"]);

    logger.sync()?;
    println!("Records written to {}:\n", log_path.display());
    println!("{}", std::fs::read_to_string(&log_path)?);

    logger.close()?;
    println!("=== Example completed successfully! ===");

    Ok(())
}
