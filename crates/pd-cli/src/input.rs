//! Reading the work log from a file or piped stdin.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures acquiring the input text.
#[derive(Debug, Error)]
pub enum InputError {
    /// The named input file does not exist.
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The input file exists but could not be read as UTF-8 text.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// No file was given and stdin is a terminal.
    #[error("no input provided: pass a file path or pipe text via stdin")]
    NoInput,
    /// Reading piped stdin failed.
    #[error("failed to read stdin")]
    Stdin(#[source] io::Error),
}

/// Reads the work log from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String, InputError> {
    match path {
        Some(path) => read_file(path),
        None => read_stdin(),
    }
}

fn read_file(path: &Path) -> Result<String, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_stdin() -> Result<String, InputError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(InputError::NoInput);
    }
    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .map_err(InputError::Stdin)?;
    tracing::debug!(bytes = text.len(), "read work log from stdin");
    Ok(text)
}
