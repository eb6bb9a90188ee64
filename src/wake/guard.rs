//! RAII hold on the continuous execution-state override.

use super::WakeError;
use crate::logging::Logger;
use crate::platform::{ExecutionState, InputBackend};
use std::sync::Arc;

/// Keeps the system and display awake until dropped.
///
/// Acquiring sets `CONTINUOUS | SYSTEM_REQUIRED | DISPLAY_REQUIRED`; dropping
/// resets the thread to plain `CONTINUOUS`. A failed reset is logged, never
/// raised.
///
/// # Example
/// ```no_run
/// use wakeup::WakeComputer;
///
/// let computer = WakeComputer::new(None);
/// {
///     let _awake = computer.hold_awake()?;
///     // ... long-running work ...
/// } // override cleared here
/// # Ok::<(), wakeup::wake::WakeError>(())
/// ```
pub struct AwakeGuard {
    backend: Arc<dyn InputBackend>,
    logger: Option<Logger>,
}

impl AwakeGuard {
    pub(crate) fn acquire(
        backend: Arc<dyn InputBackend>,
        logger: Option<Logger>,
    ) -> Result<Self, WakeError> {
        let hold = ExecutionState::CONTINUOUS
            | ExecutionState::SYSTEM_REQUIRED
            | ExecutionState::DISPLAY_REQUIRED;

        if !backend.set_execution_state(hold)? {
            return Err(WakeError::Rejected {
                operation: "SetThreadExecutionState",
            });
        }

        tracing::debug!("Continuous execution state set ({:#010X})", hold.bits());
        Ok(Self { backend, logger })
    }

    fn release(&self) {
        match self.backend.set_execution_state(ExecutionState::CONTINUOUS) {
            Ok(true) => tracing::debug!("Continuous execution state cleared"),
            Ok(false) => tracing::error!("Failed to clear sleep prevention: request rejected"),
            Err(e) => tracing::error!("Failed to clear sleep prevention: {}", e),
        }
    }
}

impl Drop for AwakeGuard {
    fn drop(&mut self) {
        match &self.logger {
            Some(logger) => logger.in_scope(|| self.release()),
            None => self.release(),
        }
    }
}
