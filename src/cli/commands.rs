//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use crate::config::HoverConfig;
use crate::custom_types::{self, CustomTypeDecl};
use crate::frontend::{diagnostics, lexer, parser};

use super::{CliError, CliResult, ExitCode, HoverArgs};

/// Maximum snippet size (16 MB)
///
/// Snippets are documentation examples; anything larger is almost certainly
/// the wrong file.
const MAX_SOURCE_SIZE: u64 = 16 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE`
pub fn read_source(path: &Path) -> CliResult<String> {
    let display = path.display();
    let metadata = fs::metadata(path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            display,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

fn load_custom_types(path: Option<&Path>) -> CliResult<Vec<CustomTypeDecl>> {
    match path {
        Some(path) => custom_types::load(path).map_err(|e| CliError::failure(format!("Error: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Analyze a snippet and print its hovers as JSON.
pub fn hover_file(path: &Path, options: &HoverArgs) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let custom = load_custom_types(options.custom_types.as_deref())?;
    let config = HoverConfig::default().with_literals(!options.no_literals);
    let hovers = crate::analyze_with_config(&source, &custom, &config);

    let json = if options.pretty {
        serde_json::to_string_pretty(&hovers)
    } else {
        serde_json::to_string(&hovers)
    }
    .map_err(|e| CliError::failure(format!("Error serializing hovers: {e}")))?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

/// Report syntax diagnostics; exit 1 when there are any.
pub fn check_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let outcome = parser::parse_source(&source);
    if outcome.is_clean() {
        println!("✓ No syntax errors");
        return Ok(ExitCode::SUCCESS);
    }

    let name = path.display().to_string();
    for diagnostic in diagnostics::with_source(&name, &source, &outcome.errors) {
        eprintln!("{:?}", miette::Report::new(diagnostic));
    }
    Err(CliError::failure(format!(
        "{} error{} in '{}'",
        outcome.errors.len(),
        if outcome.errors.len() == 1 { "" } else { "s" },
        name
    )))
}

/// Tokenize and display tokens.
pub fn tokens_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    for token in &lexer::tokenize(&source) {
        println!("{:?}", token);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display the concrete syntax tree.
pub fn cst_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let outcome = parser::parse_source(&source);
    println!("{:#?}", outcome.unit);
    for error in &outcome.errors {
        eprintln!("{error}");
    }
    Ok(ExitCode::SUCCESS)
}
