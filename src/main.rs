use std::io;
use std::process::ExitCode;

use clap::Parser;
use complex_calc::{Config, PlainInput, Shell, ShellError, Tolerance};
use tracing_subscriber::EnvFilter;

/// Interactive calculator for complex numbers.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Relative tolerance used when comparing numbers
    #[arg(long, default_value_t = 1e-9)]
    rel_tol: f64,

    /// Absolute tolerance used when comparing numbers
    #[arg(long, default_value_t = 1e-12)]
    abs_tol: f64,

    /// Read plain lines from stdin instead of using the line editor
    #[arg(long)]
    plain: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            tolerance: Tolerance::new(self.rel_tol, self.abs_tol),
        }
    }
}

fn run(args: &Args) -> Result<(), ShellError> {
    let stdout = io::stdout();
    if args.plain {
        let input = PlainInput::new(io::stdin().lock());
        Shell::new(input, stdout, args.config()).run()
    } else {
        let editor = rustyline::DefaultEditor::new()?;
        Shell::new(editor, stdout, args.config()).run()
    }
}

fn main() -> ExitCode {
    // logs go to stderr so they never interleave with the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "starting");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "shell stopped");
            eprintln!("complex-calc: {err}");
            ExitCode::FAILURE
        }
    }
}
