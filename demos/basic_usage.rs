//! Basic logger usage example
//!
//! Demonstrates console logging, the three call forms, and level filtering.
//!
//! Run with: cargo run --example basic_usage

use leveled_logger::prelude::*;
use leveled_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Leveled Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .level("debug")
        .output_path("stdout")
        .context("demo")
        .build()?;

    println!("1. The three call forms:");
    logger.info(&[&"concatenated ", &3, &" values"]);
    logger.info_fmt(format_args!("templated: {} + {} = {}", 1, 2, 1 + 2));
    logger.info_with(
        "keyed",
        &[Field::new("user", "alex"), Field::new("attempts", 3)],
    );

    println!("\n2. Macros:");
    info!(logger, "Server listening on port {}", 8080);
    warn!(logger, "slow request"; "path" => "/users", "elapsed_ms" => 1250);

    println!("\n3. Every level below panic:");
    logger.debug(&[&"This is a debug message"]);
    logger.info(&[&"This is an info message"]);
    logger.warn(&[&"This is a warning message"]);
    logger.error(&[&"This is an error message"]);

    println!("\n4. A stricter logger drops lower levels:");
    let strict = Logger::builder().level("error").output_path("stdout").build()?;
    strict.warn(&[&"Warning message (hidden)"]);
    strict.error(&[&"Error message (visible)"]);

    println!("\n5. Derived loggers:");
    let db = logger.named("db").with_fields(&[Field::new("shard", 2)]);
    db.info(&[&"connection pool ready"]);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
