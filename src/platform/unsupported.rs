//! Fallback backend for platforms without an input implementation.
//!
//! Every call fails with [`BackendError::Unsupported`], so strategies fail
//! soft and the sleep check reports `unknown`.

use super::{BackendError, ExecutionState, InputBackend, KeyDirection, Point, VirtualKey};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBackend;

impl InputBackend for UnsupportedBackend {
    fn send_key(&self, _key: VirtualKey, _direction: KeyDirection) -> Result<(), BackendError> {
        Err(BackendError::Unsupported {
            operation: "keybd_event",
        })
    }

    fn cursor_position(&self) -> Result<Option<Point>, BackendError> {
        Err(BackendError::Unsupported {
            operation: "GetCursorPos",
        })
    }

    fn set_cursor_position(&self, _point: Point) -> Result<(), BackendError> {
        Err(BackendError::Unsupported {
            operation: "SetCursorPos",
        })
    }

    fn set_execution_state(&self, _state: ExecutionState) -> Result<bool, BackendError> {
        Err(BackendError::Unsupported {
            operation: "SetThreadExecutionState",
        })
    }
}
