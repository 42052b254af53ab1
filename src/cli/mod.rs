//! CLI module for hovermark
//!
//! This module provides the command-line interface over the analysis library.
//!
//! ## Commands
//!
//! - `hover <file>` - Print the hover list as JSON (also the default for a bare `<file>`)
//! - `check <file>` - Report syntax diagnostics
//! - `tokens <file>` - Dump the token stream (debug)
//! - `cst <file>` - Dump the concrete syntax tree (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Static hover analysis for Dart snippets
#[derive(Parser, Debug)]
#[command(name = "hovermark")]
#[command(version = VERSION)]
#[command(about = "Static hover analysis for Dart documentation snippets", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Snippet to analyze (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub hover: HoverArgs,
}

/// Options shared by `hover` and the bare-file default.
#[derive(Args, Debug, Clone, Default)]
pub struct HoverArgs {
    /// JSON file with custom type and function declarations
    #[arg(long = "custom-types", value_name = "JSON")]
    pub custom_types: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Skip hovers on literals
    #[arg(long = "no-literals")]
    pub no_literals: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print hovers as JSON
    Hover {
        /// Snippet to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        options: HoverArgs,
    },

    /// Report lexical and syntax errors
    Check {
        /// Snippet to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Dump the token stream (debug)
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Dump the concrete syntax tree (debug)
    Cst {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Hover { file, options }) => commands::hover_file(&file, &options),
        Some(Command::Check { file }) => commands::check_file(&file),
        Some(Command::Tokens { file }) => commands::tokens_file(&file),
        Some(Command::Cst { file }) => commands::cst_file(&file),
        None => match cli.file {
            // Default: hover the file if provided
            Some(file) => commands::hover_file(&file, &cli.hover),
            None => Err(CliError::failure("Error: no input file (try `hovermark --help`)")),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_hover() {
        let cli = Cli::try_parse_from(["hovermark", "hover", "a.dart", "--pretty", "--no-literals"]).unwrap();
        if let Some(Command::Hover { file, options }) = cli.command {
            assert_eq!(file, PathBuf::from("a.dart"));
            assert!(options.pretty);
            assert!(options.no_literals);
            assert!(options.custom_types.is_none());
        } else {
            panic!("Expected Hover command");
        }
    }

    #[test]
    fn test_cli_parse_custom_types() {
        let cli = Cli::try_parse_from(["hovermark", "hover", "a.dart", "--custom-types", "types.json"]).unwrap();
        if let Some(Command::Hover { options, .. }) = cli.command {
            assert_eq!(options.custom_types, Some(PathBuf::from("types.json")));
        } else {
            panic!("Expected Hover command");
        }
    }

    #[test]
    fn test_cli_parse_bare_file() {
        let cli = Cli::try_parse_from(["hovermark", "snippet.dart", "--pretty"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("snippet.dart")));
        assert!(cli.hover.pretty);
    }

    #[test]
    fn test_cli_parse_debug_commands() {
        let cli = Cli::try_parse_from(["hovermark", "check", "a.dart"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check { .. })));

        let cli = Cli::try_parse_from(["hovermark", "tokens", "a.dart"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Tokens { .. })));

        let cli = Cli::try_parse_from(["hovermark", "cst", "a.dart"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Cst { .. })));
    }
}
