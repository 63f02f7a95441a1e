//! `belts`: reads a belts problem as JSON from stdin, writes the solved
//! result as compact JSON to stdout.
//!
//! Exit code 0 covers both `ok` and `infeasible` results — infeasibility is
//! an ordinary solve outcome, not a failure. A nonzero exit is reserved for
//! I/O errors, malformed JSON, and problem-construction errors (see
//! [`factoria_optimization::Error`]).

use std::io::{self, Read, Write};
use std::process::ExitCode;

use tracing::error;

use factoria_optimization::belts::{self, BeltsProblem};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("failed to read stdin: {e}"))?;

    let problem: BeltsProblem =
        serde_json::from_str(&input).map_err(|e| format!("failed to decode problem: {e}"))?;

    let result = belts::solve(&problem).map_err(|e| format!("{e}"))?;

    let output = serde_json::to_string(&result).map_err(|e| format!("failed to encode result: {e}"))?;

    io::stdout()
        .write_all(output.as_bytes())
        .map_err(|e| format!("failed to write stdout: {e}"))?;

    Ok(())
}
