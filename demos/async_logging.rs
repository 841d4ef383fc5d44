//! Async logging example
//!
//! Demonstrates multi-threaded producers, overflow alerts and shutdown
//! draining with an explicitly built logger.
//!
//! Run with: cargo run --example async_logging

use rust_console_logger::prelude::*;
use rust_console_logger::info;
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== Rust Console Logger - Async Logging Example ===\n");

    let logger = Arc::new(
        Logger::builder()
            .queue_capacity(64)
            .clock(Clock::Utc)
            .on_overflow(Arc::new(|count| {
                eprintln!("ALERT: {} logs dropped", count);
            }))
            .build()?,
    );

    println!("1. Multi-threaded logging into a small queue:");

    let mut handles = vec![];
    for thread_id in 0..5 {
        let logger = Arc::clone(&logger);
        let handle = thread::spawn(move || {
            for i in 0..200 {
                info!(logger, "Thread {} - Message {}", thread_id, i);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Everything admitted to the queue is written before this returns.
    logger.shutdown();

    let metrics = logger.metrics();
    println!("\n2. Metrics after shutdown:");
    println!("   Queued:  {}", metrics.total_logged());
    println!("   Written: {}", metrics.written_count());
    println!("   Dropped: {} ({:.2}%)", metrics.dropped_count(), metrics.drop_rate());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
