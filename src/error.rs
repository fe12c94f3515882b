//! Process-level error type.
//!
//! Errors carry the exit code the binary should terminate with:
//!
//! - 2: usage / configuration problems (bad flags, missing columns)
//! - 3: the dataset loaded but contains nothing usable
//! - 4: runtime failures (network, CSV decode, terminal I/O)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Usage or configuration problem (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Dataset is empty or unusable after cleaning (exit code 3).
    pub fn empty_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Runtime failure: network, parse, terminal (exit code 4).
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
