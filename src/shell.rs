//! Menu-driven front end over a [`Session`].
//!
//! The shell owns the session, reads lines through a [`LineReader`] and
//! writes everything the user sees to a [`Write`] sink. Errors that come from
//! bad input or from the calculator are printed and the loop continues; only
//! terminal and I/O failures end it.

use std::io::{BufRead, Write};

use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::complex::{Complex, Tolerance};
use crate::error::ShellError;
use crate::session::Session;

/// Largest root degree the shell will compute; every root is printed and
/// stored.
pub const MAX_ROOT_DEGREE: i32 = 1000;

/// Source of input lines.
pub trait LineReader {
    /// Reads one line without its trailing newline. `Ok(None)` means the
    /// user closed the input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

impl LineReader for rustyline::DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads lines from any buffered reader, without line editing. Prompts are
/// not echoed.
#[derive(Debug)]
pub struct PlainInput<R> {
    reader: R,
}

impl<R: BufRead> PlainInput<R> {
    pub fn new(reader: R) -> Self {
        PlainInput { reader }
    }
}

impl<R: BufRead> LineReader for PlainInput<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, ShellError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Config {
    /// Used by [`Command::Compare`].
    pub tolerance: Tolerance,
}

/// One entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Enter,
    Select,
    Magnitude,
    Phase,
    Power,
    Roots,
    Conjugate,
    Add,
    Subtract,
    Multiply,
    Divide,
    List,
    Compare,
    Quit,
}

impl Command {
    /// Menu order. The number shown for each entry is its position plus one.
    pub const ALL: [Command; 14] = [
        Command::Enter,
        Command::Select,
        Command::Magnitude,
        Command::Phase,
        Command::Power,
        Command::Roots,
        Command::Conjugate,
        Command::Add,
        Command::Subtract,
        Command::Multiply,
        Command::Divide,
        Command::List,
        Command::Compare,
        Command::Quit,
    ];

    pub fn from_choice(choice: &str) -> Option<Command> {
        let n: usize = choice.trim().parse().ok()?;
        Command::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::Enter => "Enter a new complex number",
            Command::Select => "Select another number from the list",
            Command::Magnitude => "Show the magnitude |z|",
            Command::Phase => "Show the argument Arg(z)",
            Command::Power => "Raise to a power z^n",
            Command::Roots => "Find the n-th roots of z",
            Command::Conjugate => "Find the conjugate of z",
            Command::Add => "Add two numbers (z1 + z2)",
            Command::Subtract => "Subtract two numbers (z1 - z2)",
            Command::Multiply => "Multiply two numbers (z1 * z2)",
            Command::Divide => "Divide two numbers (z1 / z2)",
            Command::List => "Show all numbers",
            Command::Compare => "Compare two numbers (z1 ≈ z2)",
            Command::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    fn apply(self, lhs: Complex<f64>, rhs: Complex<f64>) -> Result<Complex<f64>, ShellError> {
        Ok(match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Subtract => lhs - rhs,
            BinaryOp::Multiply => lhs * rhs,
            BinaryOp::Divide => lhs.try_div(rhs)?,
        })
    }

    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
        }
    }
}

pub struct Shell<R, W> {
    input: R,
    out: W,
    session: Session,
    config: Config,
}

impl<R: LineReader, W: Write> Shell<R, W> {
    pub fn new(input: R, out: W, config: Config) -> Self {
        Shell {
            input,
            out,
            session: Session::new(),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the menu loop until the user quits or the input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.input.read_line("Choose an action (1-14): ")? else {
                break;
            };

            let Some(command) = Command::from_choice(&choice) else {
                writeln!(self.out, "Invalid choice, try again.")?;
                continue;
            };

            debug!(?command, "dispatching");
            match self.dispatch(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(ShellError::EndOfInput) => break,
                Err(err) if err.is_recoverable() => {
                    warn!(?command, error = %err, "command failed");
                    writeln!(self.out, "Error: {err}")?;
                }
                Err(err) => return Err(err),
            }
        }
        writeln!(self.out, "Goodbye!")?;
        self.out.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<(), ShellError> {
        writeln!(self.out)?;
        writeln!(self.out, "=== Complex number calculator ===")?;
        match self.session.current() {
            Some((index, z)) => writeln!(self.out, "Current number: {}. {z}", index + 1)?,
            None => writeln!(self.out, "Current number: none")?,
        }
        for (i, command) in Command::ALL.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, command.label())?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow, ShellError> {
        match command {
            Command::Enter => self.enter()?,
            Command::Select => self.select()?,
            Command::Magnitude => {
                let z = self.session.require_current()?;
                writeln!(self.out, "|{z}| = {}", z.norm())?;
            }
            Command::Phase => {
                let z = self.session.require_current()?;
                writeln!(self.out, "Arg({z}) = {} rad", z.arg())?;
            }
            Command::Power => self.power()?,
            Command::Roots => self.roots()?,
            Command::Conjugate => {
                let z = self.session.require_current()?;
                let conj = z.conj();
                self.session.push(conj);
                writeln!(self.out, "Conjugate: {conj}")?;
            }
            Command::Add => self.binary(BinaryOp::Add)?,
            Command::Subtract => self.binary(BinaryOp::Subtract)?,
            Command::Multiply => self.binary(BinaryOp::Multiply)?,
            Command::Divide => self.binary(BinaryOp::Divide)?,
            Command::List => self.list()?,
            Command::Compare => self.compare()?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, prompt: &str) -> Result<String, ShellError> {
        self.input.read_line(prompt)?.ok_or(ShellError::EndOfInput)
    }

    fn prompt_f64(&mut self, prompt: &str) -> Result<f64, ShellError> {
        let text = self.prompt(prompt)?;
        parse_f64(&text)
    }

    fn prompt_i32(&mut self, prompt: &str) -> Result<i32, ShellError> {
        let text = self.prompt(prompt)?;
        text.trim().parse().map_err(|_| ShellError::InvalidInput {
            input: text,
            expected: "an integer",
        })
    }

    /// Reads a 1-based list position and checks it against the session.
    fn prompt_index(&mut self, prompt: &str) -> Result<usize, ShellError> {
        let text = self.prompt(prompt)?;
        let index = text
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| ShellError::InvalidInput {
                input: text,
                expected: "a list number",
            })?;
        self.session.get(index)?;
        Ok(index)
    }

    fn enter(&mut self) -> Result<(), ShellError> {
        let re = self.prompt_f64("Real part: ")?;
        let im = self.prompt_f64("Imaginary part: ")?;
        let z = Complex::new(re, im);
        self.session.push(z);
        writeln!(self.out, "Entered: {z}")?;
        Ok(())
    }

    fn select(&mut self) -> Result<(), ShellError> {
        self.session.require_len(1)?;
        self.list()?;
        let index = self.prompt_index("Number to select: ")?;
        let z = self.session.select(index)?;
        writeln!(self.out, "Selected: {z}")?;
        Ok(())
    }

    fn power(&mut self) -> Result<(), ShellError> {
        let z = self.session.require_current()?;
        let n = self.prompt_i32("Exponent: ")?;
        let result = z.powi(n)?;
        self.session.push(result);
        writeln!(self.out, "({z})^{n} = {result}")?;
        Ok(())
    }

    fn roots(&mut self) -> Result<(), ShellError> {
        let z = self.session.require_current()?;
        let n = self.prompt_i32("Root degree: ")?;
        if n > MAX_ROOT_DEGREE {
            return Err(ShellError::InvalidInput {
                input: n.to_string(),
                expected: "a root degree of at most 1000",
            });
        }
        let roots = z.roots(n)?;
        writeln!(self.out, "Roots of degree {n} of {z}:")?;
        for (k, root) in roots.iter().enumerate() {
            writeln!(self.out, "Root {}: {root}", k + 1)?;
        }
        self.session.push_roots(&roots);
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp) -> Result<(), ShellError> {
        let lhs = self.session.require_current()?;
        self.session.require_len(2)?;
        let index = self.prompt_index("Number of the second operand: ")?;
        let rhs = self.session.get(index)?;
        let result = op.apply(lhs, rhs)?;
        self.session.push(result);
        writeln!(self.out, "({lhs}) {} ({rhs}) = {result}", op.symbol())?;
        Ok(())
    }

    fn compare(&mut self) -> Result<(), ShellError> {
        let lhs = self.session.require_current()?;
        self.session.require_len(2)?;
        let index = self.prompt_index("Number to compare with: ")?;
        let rhs = self.session.get(index)?;
        let verdict = if lhs.approx_eq(rhs, self.config.tolerance) {
            "equal"
        } else {
            "not equal"
        };
        writeln!(self.out, "{lhs} and {rhs} are {verdict}")?;
        Ok(())
    }

    fn list(&mut self) -> Result<(), ShellError> {
        if self.session.is_empty() {
            writeln!(self.out, "The list is empty, enter a number first.")?;
            return Ok(());
        }
        let current = self.session.current().map(|(index, _)| index);
        for (i, z) in self.session.iter().enumerate() {
            let marker = if Some(i) == current { " *" } else { "" };
            writeln!(self.out, "{}. {z}{marker}", i + 1)?;
        }
        Ok(())
    }
}

/// Parses a finite float.
fn parse_f64(text: &str) -> Result<f64, ShellError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ShellError::InvalidInput {
            input: text.to_owned(),
            expected: "a finite number",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_choices() {
        assert_eq!(Command::from_choice("1"), Some(Command::Enter));
        assert_eq!(Command::from_choice(" 11 "), Some(Command::Divide));
        assert_eq!(Command::from_choice("14"), Some(Command::Quit));
        assert_eq!(Command::from_choice("0"), None);
        assert_eq!(Command::from_choice("15"), None);
        assert_eq!(Command::from_choice("add"), None);
        assert_eq!(Command::from_choice(""), None);
    }

    #[test]
    fn parse_floats() {
        assert_eq!(parse_f64(" 2.5 ").unwrap(), 2.5);
        assert_eq!(parse_f64("-1e3").unwrap(), -1000.0);
        assert!(matches!(parse_f64("abc"), Err(ShellError::InvalidInput { .. })));
        assert!(matches!(parse_f64("inf"), Err(ShellError::InvalidInput { .. })));
        assert!(matches!(parse_f64("NaN"), Err(ShellError::InvalidInput { .. })));
    }

    #[test]
    fn plain_input_strips_newlines() {
        let mut input = PlainInput::new("1\r\n  2 \nlast".as_bytes());
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("1"));
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("  2 "));
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("last"));
        assert_eq!(input.read_line("").unwrap(), None);
    }
}
