//! Recording backend for tests.

use super::{BackendError, ExecutionState, InputBackend, KeyDirection, Point, VirtualKey};
use std::cell::{Cell, RefCell};

/// One call made against the fake, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Key(VirtualKey, KeyDirection),
    GetCursor,
    SetCursor(Point),
    ExecutionState(ExecutionState),
}

/// How `cursor_position` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    At(Point),
    Refused,
    Broken,
}

/// How key and execution-state calls answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Accept,
    Reject,
    Unsupported,
}

pub struct FakeBackend {
    calls: RefCell<Vec<Call>>,
    cursor: Cell<CursorMode>,
    keys: Cell<Answer>,
    execution_state: Cell<Answer>,
    fail_set_cursor: Cell<bool>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            cursor: Cell::new(CursorMode::At(Point::new(100, 200))),
            keys: Cell::new(Answer::Accept),
            execution_state: Cell::new(Answer::Accept),
            fail_set_cursor: Cell::new(false),
        }
    }

    pub fn with_cursor(self, mode: CursorMode) -> Self {
        self.cursor.set(mode);
        self
    }

    pub fn with_keys(self, answer: Answer) -> Self {
        self.keys.set(answer);
        self
    }

    pub fn with_execution_state(self, answer: Answer) -> Self {
        self.execution_state.set(answer);
        self
    }

    pub fn with_failing_set_cursor(self) -> Self {
        self.fail_set_cursor.set(true);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl InputBackend for FakeBackend {
    fn send_key(&self, key: VirtualKey, direction: KeyDirection) -> Result<(), BackendError> {
        self.record(Call::Key(key, direction));
        match self.keys.get() {
            Answer::Accept => Ok(()),
            Answer::Reject => Err(BackendError::os("keybd_event", "input desktop is locked")),
            Answer::Unsupported => Err(BackendError::Unsupported {
                operation: "keybd_event",
            }),
        }
    }

    fn cursor_position(&self) -> Result<Option<Point>, BackendError> {
        self.record(Call::GetCursor);
        match self.cursor.get() {
            CursorMode::At(point) => Ok(Some(point)),
            CursorMode::Refused => Ok(None),
            CursorMode::Broken => Err(BackendError::os("GetCursorPos", "no window station")),
        }
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), BackendError> {
        self.record(Call::SetCursor(point));
        if self.fail_set_cursor.get() {
            return Err(BackendError::os("SetCursorPos", "access denied"));
        }
        Ok(())
    }

    fn set_execution_state(&self, state: ExecutionState) -> Result<bool, BackendError> {
        self.record(Call::ExecutionState(state));
        match self.execution_state.get() {
            Answer::Accept => Ok(true),
            Answer::Reject => Ok(false),
            Answer::Unsupported => Err(BackendError::Unsupported {
                operation: "SetThreadExecutionState",
            }),
        }
    }
}
