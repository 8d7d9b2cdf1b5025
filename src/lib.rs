//! Complex number calculator.
//!
//! [`Complex`] carries the arithmetic and the polar-form power and root
//! algorithms. [`Session`] keeps the history of created numbers and
//! [`Shell`] drives both from a line-based menu.

mod complex;
mod error;
mod session;
mod shell;

pub use complex::{Complex, Tolerance};
pub use error::{ComplexError, SessionError, ShellError};
pub use session::Session;
pub use shell::{Command, Config, LineReader, PlainInput, Shell, MAX_ROOT_DEGREE};
