//! Error types for each layer of the calculator.

use thiserror::Error;

/// Conditions signalled by [`Complex`](crate::Complex) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexError {
    /// Root degree must be strictly positive
    #[error("root degree must be a positive integer, got {degree}")]
    InvalidRootDegree { degree: i32 },

    /// Dividing by zero, or raising zero to a negative power
    #[error("division by zero")]
    DivisionByZero,

    /// The exact result is finite but does not fit in an `f64`
    #[error("result is out of the representable range")]
    Overflow,
}

/// Conditions signalled by the [`Session`](crate::Session) history.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("no number is selected, enter or select one first")]
    NoSelection,

    /// Index is 0-based; messages shown to the user are 1-based
    #[error("number {} is out of range (1..={len})", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },

    #[error("not enough numbers in the list (need {needed})")]
    NotEnoughNumbers { needed: usize },
}

/// Errors raised while running the interactive shell.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("invalid input '{input}': expected {expected}")]
    InvalidInput { input: String, expected: &'static str },

    #[error(transparent)]
    Complex(#[from] ComplexError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// The input was closed while a command was waiting for a value
    #[error("end of input")]
    EndOfInput,
}

impl ShellError {
    /// Whether the shell can report this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ShellError::Io(_) | ShellError::Readline(_) | ShellError::EndOfInput
        )
    }
}
