//! Execution-time logging for arbitrary closures.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Runs `f` and logs how long it took.
///
/// On `Ok` an INFO entry with the elapsed seconds is emitted. On `Err`
/// exactly one ERROR entry is emitted and the error is handed back
/// unchanged. A panic inside `f` is logged the same way and then resumed.
///
/// # Example
/// ```no_run
/// use wakeup::log_execution_time;
///
/// let contents = log_execution_time("read_config", || std::fs::read_to_string("config.toml"));
/// ```
pub fn log_execution_time<T, E, F>(name: &str, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    let elapsed = started.elapsed().as_secs_f64();

    match outcome {
        Ok(Ok(value)) => {
            tracing::info!("Function '{}' executed in {:.2} seconds", name, elapsed);
            Ok(value)
        }
        Ok(Err(e)) => {
            tracing::error!("Function '{}' failed after {:.2} seconds: {}", name, elapsed, e);
            Err(e)
        }
        Err(payload) => {
            tracing::error!(
                "Function '{}' failed after {:.2} seconds: {}",
                name,
                elapsed,
                panic_message(payload.as_ref())
            );
            panic::resume_unwind(payload)
        }
    }
}

/// Extracts the message carried by a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
