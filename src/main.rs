//! Wakeup - self-test runner.
//!
//! Checks the sleep state, runs each wake method once, then `auto`, and
//! prints a JSON report. `RUST_LOG` overrides the log filter.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Instant;
use wakeup::{setup_logger, LoggerConfig, SleepState, WakeComputer, WakeMethod};

#[derive(Debug, Serialize)]
struct SelfTestReport {
    state: SleepState,
    results: Vec<MethodResult>,
    finished_at: DateTime<Local>,
}

#[derive(Debug, Serialize)]
struct MethodResult {
    method: WakeMethod,
    woken: bool,
    elapsed_secs: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoggerConfig {
        filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()),
        ..LoggerConfig::default()
    };
    let logger = setup_logger("wakeup", &config)?;
    logger.install_global()?;

    println!("Testing wake computer functions...");
    let computer = WakeComputer::new(Some(logger.clone()));

    let state = computer.check_sleep_state();
    println!("Current state: {}", state);

    let methods = [
        ("Key press", WakeMethod::KeyPress),
        ("Mouse movement", WakeMethod::Mouse),
        ("System timer reset", WakeMethod::Api),
        ("Auto wake", WakeMethod::Auto),
    ];

    let mut results = Vec::with_capacity(methods.len());
    for (i, (label, method)) in methods.into_iter().enumerate() {
        println!();
        println!("{}. Testing {}...", i + 1, label.to_lowercase());

        let started = Instant::now();
        let woken = computer.wake_up(method.as_str());
        let elapsed = started.elapsed().as_secs_f64();

        if woken {
            println!("   ✓ {} successful ({:.2}s)", label, elapsed);
        } else {
            println!("   ✗ {} failed ({:.2}s)", label, elapsed);
        }
        results.push(MethodResult {
            method,
            woken,
            elapsed_secs: elapsed,
        });
    }

    let report = SelfTestReport {
        state,
        results,
        finished_at: Local::now(),
    };

    println!();
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("Test completed!");
    Ok(())
}
