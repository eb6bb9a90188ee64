//! Wakeup - nudges an idle Windows desktop out of sleep.
//!
//! Two independent pieces live here:
//! - [`wake`]: ordered wake strategies, sleep prevention and a sleep state check
//! - [`logging`]: a named file + console logger and an execution timer
//!
//! The wake side reaches the OS only through [`platform::InputBackend`].

pub mod logging;
pub mod platform;
pub mod wake;

pub use logging::{log_execution_time, setup_logger, Logger, LoggerConfig, LoggerError};
pub use wake::{Pacing, SleepState, WakeComputer, WakeMethod};
