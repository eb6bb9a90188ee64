//! OS input and power capabilities.
//!
//! Wake strategies never call the OS directly. They go through
//! [`InputBackend`], which has one implementation per target platform
//! plus a recording fake used by the tests.

#[cfg(test)]
pub(crate) mod fake;
#[cfg(not(windows))]
pub mod unsupported;
#[cfg(windows)]
pub mod win32;

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

#[cfg(not(windows))]
pub use unsupported::UnsupportedBackend as PlatformBackend;
#[cfg(windows)]
pub use win32::Win32Backend as PlatformBackend;

/// Screen coordinates of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// A Windows virtual key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u8);

impl VirtualKey {
    pub const SPACE: Self = Self(0x20);
    pub const VOLUME_UP: Self = Self(0xAF);
    pub const MEDIA_PLAY_PAUSE: Self = Self(0xB3);

    pub fn code(self) -> u8 {
        self.0
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SPACE => write!(f, "VK_SPACE"),
            Self::VOLUME_UP => write!(f, "VK_VOLUME_UP"),
            Self::MEDIA_PLAY_PAUSE => write!(f, "VK_MEDIA_PLAY_PAUSE"),
            Self(code) => write!(f, "VK_{:#04X}", code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Press,
    Release,
}

/// Thread execution-state flags passed to `SetThreadExecutionState`.
///
/// Without [`ExecutionState::CONTINUOUS`] a request is a one-shot reset of
/// the idle timer. With it, the request stays active until replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionState(u32);

impl ExecutionState {
    pub const SYSTEM_REQUIRED: Self = Self(0x0000_0001);
    pub const DISPLAY_REQUIRED: Self = Self(0x0000_0002);
    pub const CONTINUOUS: Self = Self(0x8000_0000);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ExecutionState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Error raised by an [`InputBackend`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The platform has no implementation of this operation.
    Unsupported { operation: &'static str },
    /// The OS call itself failed.
    Os {
        operation: &'static str,
        message: String,
    },
}

impl BackendError {
    pub fn os(operation: &'static str, error: impl fmt::Display) -> Self {
        Self::Os {
            operation,
            message: error.to_string(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unsupported { operation } => {
                write!(f, "{} is not supported on this platform", operation)
            }
            BackendError::Os { operation, message } => write!(f, "{} failed: {}", operation, message),
        }
    }
}

impl std::error::Error for BackendError {}

/// The OS capabilities the wake component depends on.
pub trait InputBackend {
    /// Injects a single synthetic key event.
    fn send_key(&self, key: VirtualKey, direction: KeyDirection) -> Result<(), BackendError>;

    /// Reads the cursor position.
    ///
    /// `Ok(None)` means the OS answered but refused the read.
    fn cursor_position(&self) -> Result<Option<Point>, BackendError>;

    fn set_cursor_position(&self, point: Point) -> Result<(), BackendError>;

    /// Requests a thread execution state.
    ///
    /// Returns `false` when the OS rejected the request.
    fn set_execution_state(&self, state: ExecutionState) -> Result<bool, BackendError>;
}

/// Returns the backend for the platform this binary was built for.
pub fn default_backend() -> Arc<dyn InputBackend> {
    Arc::new(PlatformBackend::default())
}
