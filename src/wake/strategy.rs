//! The individual wake strategies.
//!
//! Each strategy is self-contained: [`WakeStrategy::attempt`] reports raw
//! errors, while [`WakeStrategy::wake`] swallows them into a warning and
//! `false`.

use super::WakeError;
use crate::platform::{ExecutionState, InputBackend, KeyDirection, Point, VirtualKey};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Keys tapped by [`KeyPress`], in order.
pub const WAKE_KEYS: [VirtualKey; 3] = [
    VirtualKey::SPACE,
    VirtualKey::MEDIA_PLAY_PAUSE,
    VirtualKey::VOLUME_UP,
];

/// Cursor displacement used by [`MouseNudge`].
pub const NUDGE_OFFSET: (i32, i32) = (2, 2);

/// One self-contained way of waking the machine.
pub trait WakeStrategy {
    fn name(&self) -> &'static str;

    /// Runs the strategy once. `Ok(false)` means the OS declined.
    fn attempt(&self) -> Result<bool, WakeError>;

    /// Fail-soft form of [`attempt`](Self::attempt).
    fn wake(&self) -> bool {
        match self.attempt() {
            Ok(woken) => woken,
            Err(e) => {
                tracing::warn!("{} failed: {}", self.name(), e);
                false
            }
        }
    }
}

/// Presses and releases [`WAKE_KEYS`].
pub struct KeyPress {
    backend: Arc<dyn InputBackend>,
    hold: Duration,
}

impl KeyPress {
    pub fn new(backend: Arc<dyn InputBackend>, hold: Duration) -> Self {
        Self { backend, hold }
    }

    fn tap(&self, key: VirtualKey) -> Result<(), WakeError> {
        self.backend.send_key(key, KeyDirection::Press)?;
        thread::sleep(self.hold);
        self.backend.send_key(key, KeyDirection::Release)?;
        thread::sleep(self.hold);
        Ok(())
    }
}

impl WakeStrategy for KeyPress {
    fn name(&self) -> &'static str {
        "key_press"
    }

    fn attempt(&self) -> Result<bool, WakeError> {
        for key in WAKE_KEYS {
            match self.tap(key) {
                Ok(()) => {}
                Err(WakeError::Backend(e)) if e.is_unsupported() => return Err(e.into()),
                Err(e) => tracing::debug!("Key event for {} rejected, trying next key: {}", key, e),
            }
        }

        tracing::info!("Simulated key press");
        Ok(true)
    }
}

/// One-shot `SYSTEM_REQUIRED | DISPLAY_REQUIRED` request.
pub struct IdleTimerReset {
    backend: Arc<dyn InputBackend>,
}

impl IdleTimerReset {
    pub fn new(backend: Arc<dyn InputBackend>) -> Self {
        Self { backend }
    }
}

impl WakeStrategy for IdleTimerReset {
    fn name(&self) -> &'static str {
        "idle_timer_reset"
    }

    fn attempt(&self) -> Result<bool, WakeError> {
        let nudge = ExecutionState::SYSTEM_REQUIRED | ExecutionState::DISPLAY_REQUIRED;

        if self.backend.set_execution_state(nudge)? {
            tracing::info!("Reset system idle timer");
            Ok(true)
        } else {
            tracing::warn!("Failed to reset idle timer");
            Ok(false)
        }
    }
}

/// Moves the cursor by [`NUDGE_OFFSET`] and puts it back.
pub struct MouseNudge {
    backend: Arc<dyn InputBackend>,
    hold: Duration,
}

impl MouseNudge {
    pub fn new(backend: Arc<dyn InputBackend>, hold: Duration) -> Self {
        Self { backend, hold }
    }
}

impl WakeStrategy for MouseNudge {
    fn name(&self) -> &'static str {
        "mouse_move"
    }

    fn attempt(&self) -> Result<bool, WakeError> {
        let Some(origin) = self.backend.cursor_position()? else {
            tracing::warn!("Cursor position unavailable, mouse not moved");
            return Ok(false);
        };

        let (dx, dy) = NUDGE_OFFSET;
        self.backend.set_cursor_position(origin.offset(dx, dy))?;
        thread::sleep(self.hold);
        restore_cursor(self.backend.as_ref(), origin)?;

        tracing::info!("Simulated mouse movement");
        Ok(true)
    }
}

fn restore_cursor(backend: &dyn InputBackend, origin: Point) -> Result<(), WakeError> {
    backend.set_cursor_position(origin).map_err(|e| {
        tracing::error!("Cursor left displaced from ({}, {})", origin.x, origin.y);
        e.into()
    })
}
