#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// The run finished, but one or more workers stopped on an operation error.
    OperationErrors = 20,

    /// Invalid CLI/config (bad flags, min > max, unknown operation, unbounded benchmark).
    InvalidInput = 30,

    /// Internal/runtime error (cannot reach the database, populate failed, panics at top-level).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn from_failed_workers(failed: usize) -> Self {
        if failed == 0 {
            Self::Success
        } else {
            Self::OperationErrors
        }
    }
}
