//! Trace propagation example
//!
//! Derives trace-scoped loggers from a propagation context and passes the
//! context across threads so every record of one request carries the same
//! `traceId`.
//!
//! Run with: cargo run --example trace_propagation

use std::thread;
use trace_logger_system::prelude::*;
use trace_logger_system::JsonEncoder;

fn handle_request(logger: &TraceLogger, order_id: u64) {
    logger.info("loading order", fields!["order_id" => order_id]);

    // Work handed to another thread keeps the request's identifier
    let ctx = logger.context().with_value(ContextKey::custom("stage"), "billing");
    let worker = logger.with_context(&ctx);
    thread::spawn(move || {
        worker.info("charging card", fields!["amount_cents" => 4599]);
    })
    .join()
    .ok();

    logger.info("order complete", vec![]);
}

fn main() -> Result<()> {
    println!("=== Trace Logger System - Trace Propagation Example ===\n");

    let logger = std::sync::Arc::new(
        Logger::builder()
            .appender(LogLevel::Debug, ConsoleAppender::stdout())
            .encoder(JsonEncoder::new())
            .build(),
    );

    println!("1. Identifier generated for a fresh request context:");
    let request = logger.with_context_trace(&PropagationContext::background());
    handle_request(&request, 1001);

    println!("\n2. Identifier supplied by an upstream caller:");
    let upstream = logger.with_trace("4bf92f3577b34da6a3ce929d0e0e4736");
    handle_request(&upstream, 1002);

    println!("\n3. Standard `log` records routed into the same pipeline:");
    if logger.redirect_standard_log() {
        log::info!(component = "legacy"; "emitted through the log facade");
    }

    logger.close();
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
