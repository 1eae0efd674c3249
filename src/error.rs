//! Process-level error type.
//!
//! Every fallible operation in the crate returns `AppError`, which carries the
//! exit code the `batchctl` binary should terminate with.

/// Bad input, bad arguments, missing configuration or local file I/O.
pub const EXIT_INPUT: u8 = 2;
/// An internal invariant did not hold (e.g. row/timestamp count mismatch).
pub const EXIT_INVARIANT: u8 = 3;
/// A remote service (object store, control plane) failed or misbehaved.
pub const EXIT_SERVICE: u8 = 4;
/// A cluster could not be driven into its target state. Dependent work must halt.
pub const EXIT_CLUSTER: u8 = 5;

#[derive(Clone, PartialEq, Eq)]
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

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(EXIT_INVARIANT, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(EXIT_SERVICE, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_exit_codes() {
        assert_eq!(AppError::input("x").exit_code(), EXIT_INPUT);
        assert_eq!(AppError::invariant("x").exit_code(), EXIT_INVARIANT);
        assert_eq!(AppError::service("x").exit_code(), EXIT_SERVICE);
        assert_eq!(AppError::new(EXIT_CLUSTER, "boom").to_string(), "boom");
    }
}
