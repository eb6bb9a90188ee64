//! Win32 implementation of [`InputBackend`].
//!
//! Thin safe wrappers over `keybd_event`, the cursor position calls and
//! `SetThreadExecutionState`.

use super::{BackendError, ExecutionState, InputBackend, KeyDirection, Point, VirtualKey};
use windows::Win32::Foundation::POINT;
use windows::Win32::System::Power::{SetThreadExecutionState, EXECUTION_STATE};
use windows::Win32::UI::Input::KeyboardAndMouse::{keybd_event, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

/// Talks to the desktop of the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Backend;

impl InputBackend for Win32Backend {
    fn send_key(&self, key: VirtualKey, direction: KeyDirection) -> Result<(), BackendError> {
        let flags = match direction {
            KeyDirection::Press => KEYBD_EVENT_FLAGS(0),
            KeyDirection::Release => KEYEVENTF_KEYUP,
        };

        // keybd_event has no failure signal; delivery is not observable here
        unsafe { keybd_event(key.code(), 0, flags, 0) };
        Ok(())
    }

    fn cursor_position(&self) -> Result<Option<Point>, BackendError> {
        let mut point = POINT::default();

        match unsafe { GetCursorPos(&mut point) } {
            Ok(()) => Ok(Some(Point::new(point.x, point.y))),
            Err(e) => {
                tracing::debug!("GetCursorPos returned FALSE: {:?}", e);
                Ok(None)
            }
        }
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), BackendError> {
        unsafe { SetCursorPos(point.x, point.y) }.map_err(|e| BackendError::os("SetCursorPos", e))
    }

    fn set_execution_state(&self, state: ExecutionState) -> Result<bool, BackendError> {
        // Returns the previous state, or NULL on failure
        let previous = unsafe { SetThreadExecutionState(EXECUTION_STATE(state.bits())) };
        Ok(previous.0 != 0)
    }
}
