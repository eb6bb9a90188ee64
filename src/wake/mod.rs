//! Waking an idle desktop.
//!
//! [`WakeComputer`] owns three strategies with a fixed priority:
//! key-press, idle-timer reset, mouse-move. `auto` mode walks them in that
//! order and stops at the first success. When every one fails it falls back
//! to a direct wake that runs all three unconditionally.
//!
//! Nothing here returns an error to the caller: failures are logged and
//! reported as `false` (or `unknown` for the sleep state check).

pub mod guard;
pub mod strategy;

pub use guard::AwakeGuard;
pub use strategy::{IdleTimerReset, KeyPress, MouseNudge, WakeStrategy};

use crate::logging::timing::panic_message;
use crate::logging::Logger;
use crate::platform::{self, BackendError, InputBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How [`WakeComputer::wake_up`] should try to wake the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WakeMethod {
    /// Every strategy in priority order, then the direct wake.
    Auto,
    KeyPress,
    Mouse,
    /// Idle-timer reset through `SetThreadExecutionState`.
    Api,
}

impl WakeMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            WakeMethod::Auto => "auto",
            WakeMethod::KeyPress => "keypress",
            WakeMethod::Mouse => "mouse",
            WakeMethod::Api => "api",
        }
    }
}

impl fmt::Display for WakeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WakeMethod {
    type Err = UnknownWakeMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(WakeMethod::Auto),
            "keypress" => Ok(WakeMethod::KeyPress),
            "mouse" => Ok(WakeMethod::Mouse),
            "api" => Ok(WakeMethod::Api),
            other => Err(UnknownWakeMethod(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWakeMethod(pub String);

impl fmt::Display for UnknownWakeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown wake method: {}", self.0)
    }
}

impl std::error::Error for UnknownWakeMethod {}

/// Result of the sleep-state heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepState {
    Awake,
    Sleeping,
    Unknown,
}

impl fmt::Display for SleepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepState::Awake => write!(f, "awake"),
            SleepState::Sleeping => write!(f, "sleeping"),
            SleepState::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeError {
    Backend(BackendError),
    /// The OS answered but refused the request.
    Rejected { operation: &'static str },
}

impl fmt::Display for WakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WakeError::Backend(e) => write!(f, "{}", e),
            WakeError::Rejected { operation } => write!(f, "{} was rejected by the OS", operation),
        }
    }
}

impl std::error::Error for WakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WakeError::Backend(e) => Some(e),
            WakeError::Rejected { .. } => None,
        }
    }
}

impl From<BackendError> for WakeError {
    fn from(e: BackendError) -> Self {
        WakeError::Backend(e)
    }
}

/// Pauses between OS calls.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// After a failed strategy in `auto` mode (default: 500ms).
    pub between_attempts: Duration,

    /// Between the steps of the direct wake (default: 100ms).
    pub fallback_step: Duration,

    /// After each key press and each key release (default: 50ms).
    pub key_hold: Duration,

    /// How long the cursor stays displaced (default: 100ms).
    pub cursor_hold: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            between_attempts: Duration::from_millis(500),
            fallback_step: Duration::from_millis(100),
            key_hold: Duration::from_millis(50),
            cursor_hold: Duration::from_millis(100),
        }
    }
}

impl Pacing {
    /// No pauses at all.
    pub fn none() -> Self {
        Self {
            between_attempts: Duration::ZERO,
            fallback_step: Duration::ZERO,
            key_hold: Duration::ZERO,
            cursor_hold: Duration::ZERO,
        }
    }
}

/// Wakes the machine and keeps it awake.
pub struct WakeComputer {
    backend: Arc<dyn InputBackend>,
    key_press: Box<dyn WakeStrategy>,
    idle_timer: Box<dyn WakeStrategy>,
    mouse_move: Box<dyn WakeStrategy>,
    pacing: Pacing,
    logger: Option<Logger>,
}

impl WakeComputer {
    /// Uses the platform backend and default pacing.
    ///
    /// Without a logger, events go to the process-wide `tracing` dispatcher.
    pub fn new(logger: Option<Logger>) -> Self {
        Self::with_backend(platform::default_backend(), Pacing::default(), logger)
    }

    pub fn with_backend(
        backend: Arc<dyn InputBackend>,
        pacing: Pacing,
        logger: Option<Logger>,
    ) -> Self {
        let key_press = Box::new(KeyPress::new(Arc::clone(&backend), pacing.key_hold));
        let idle_timer = Box::new(IdleTimerReset::new(Arc::clone(&backend)));
        let mouse_move = Box::new(MouseNudge::new(Arc::clone(&backend), pacing.cursor_hold));
        Self::with_strategies(backend, key_press, idle_timer, mouse_move, pacing, logger)
    }

    /// Replaces the three strategy slots. Their priority stays fixed.
    pub fn with_strategies(
        backend: Arc<dyn InputBackend>,
        key_press: Box<dyn WakeStrategy>,
        idle_timer: Box<dyn WakeStrategy>,
        mouse_move: Box<dyn WakeStrategy>,
        pacing: Pacing,
        logger: Option<Logger>,
    ) -> Self {
        Self {
            backend,
            key_press,
            idle_timer,
            mouse_move,
            pacing,
            logger,
        }
    }

    /// Strategies in `auto` priority order.
    fn strategies(&self) -> [&dyn WakeStrategy; 3] {
        [
            self.key_press.as_ref(),
            self.idle_timer.as_ref(),
            self.mouse_move.as_ref(),
        ]
    }

    fn logged<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.logger {
            Some(logger) => logger.in_scope(f),
            None => f(),
        }
    }

    /// Tries to wake the machine with `method` (`auto`, `keypress`, `mouse`
    /// or `api`). Returns whether it reported success.
    pub fn wake_up(&self, method: &str) -> bool {
        self.logged(|| {
            tracing::info!("Attempting to wake up computer using method: {}", method);

            match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(method))) {
                Ok(woken) => woken,
                Err(payload) => {
                    tracing::error!(
                        "Error waking the computer: {}",
                        panic_message(payload.as_ref())
                    );
                    false
                }
            }
        })
    }

    /// [`wake_up`](Self::wake_up) in `auto` mode.
    pub fn wake_up_default(&self) -> bool {
        self.wake_up(WakeMethod::Auto.as_str())
    }

    fn dispatch(&self, method: &str) -> bool {
        let method = match method.parse::<WakeMethod>() {
            Ok(method) => method,
            Err(e) => {
                tracing::error!("{}", e);
                return false;
            }
        };

        match method {
            WakeMethod::Auto => self.wake_auto(),
            WakeMethod::KeyPress => self.key_press.wake(),
            WakeMethod::Mouse => self.mouse_move.wake(),
            WakeMethod::Api => self.idle_timer.wake(),
        }
    }

    fn wake_auto(&self) -> bool {
        for strategy in self.strategies() {
            match strategy.attempt() {
                Ok(true) => {
                    tracing::info!("Computer successfully woken up using {}", strategy.name());
                    return true;
                }
                Ok(false) => thread::sleep(self.pacing.between_attempts),
                Err(e) => {
                    tracing::warn!("Method {} failed with error: {}", strategy.name(), e)
                }
            }
        }

        self.direct_wake()
    }

    /// Last resort: every strategy, unconditionally, timer reset first.
    ///
    /// Reports success if any of the three did.
    fn direct_wake(&self) -> bool {
        tracing::warn!("All wake methods failed, trying direct wake");

        let mut woken = self.idle_timer.wake();
        thread::sleep(self.pacing.fallback_step);
        woken |= self.key_press.wake();
        thread::sleep(self.pacing.fallback_step);
        woken |= self.mouse_move.wake();

        if !woken {
            tracing::error!("Direct wake failed");
        }
        woken
    }

    /// Sets the continuous override for as long as the guard lives.
    pub fn hold_awake(&self) -> Result<AwakeGuard, WakeError> {
        AwakeGuard::acquire(Arc::clone(&self.backend), self.logger.clone())
    }

    /// Keeps the system and display awake for `duration_minutes`, blocking
    /// the calling thread the whole time.
    ///
    /// Errors are logged and swallowed. If the override cannot be set the
    /// call returns immediately.
    pub fn prevent_sleep(&self, duration_minutes: u64) {
        self.logged(|| {
            let guard = match self.hold_awake() {
                Ok(guard) => guard,
                Err(e) => {
                    tracing::error!("Failed to prevent sleep: {}", e);
                    return;
                }
            };

            tracing::info!(
                "Sleep prevention activated for {} minutes",
                duration_minutes
            );
            thread::sleep(Duration::from_secs(duration_minutes.saturating_mul(60)));
            drop(guard);
        })
    }

    /// [`prevent_sleep`](Self::prevent_sleep) for 60 minutes.
    pub fn prevent_sleep_default(&self) {
        self.prevent_sleep(60)
    }

    /// Guesses whether the machine is awake from a cursor read.
    ///
    /// Cursor reads usually succeed on a locked desktop too, so `awake` is
    /// weak evidence.
    pub fn check_sleep_state(&self) -> SleepState {
        self.logged(|| match self.backend.cursor_position() {
            Ok(Some(_)) => {
                tracing::info!("Computer appears to be awake");
                SleepState::Awake
            }
            Ok(None) => {
                tracing::info!("Computer may be sleeping");
                SleepState::Sleeping
            }
            Err(e) => {
                tracing::debug!("Sleep state check failed: {}", e);
                SleepState::Unknown
            }
        })
    }
}
