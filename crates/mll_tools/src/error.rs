//! Error types of the command-line front end.

use mll::GenerateError;
use std::path::PathBuf;
use thiserror::Error;

/// A malformed line in an `.mll` file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct InputError {
    /// 1-based line number
    pub line: usize,
    #[source]
    pub kind: InputErrorKind,
}

impl InputError {
    #[must_use]
    pub const fn new(line: usize, kind: InputErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputErrorKind {
    #[error("{0} label not found!")]
    MissingLabel(&'static str),

    #[error("Ill-formed regex pattern!")]
    IllFormedDeclaration,

    #[error("Ill-formed action code!")]
    IllFormedAction,

    #[error("Pattern name '{0}' is not a valid C++ identifier")]
    InvalidName(String),
}

/// Errors raised by the code emitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("Symbol {symbol:?} in state S{state} does not fit in a byte")]
    UnsupportedSymbol { symbol: char, state: u32 },

    #[error("Output name '{0}' is not a valid file base name")]
    InvalidBaseName(String),
}

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Input file name should have .mll extension! ({})", .0.display())]
    BadExtension(PathBuf),

    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("Cannot serialize tables: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Line of the input file the error is attributed to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Input(err) => Some(err.line),
            Self::Generate(err) if err.line > 0 => Some(err.line),
            _ => None,
        }
    }

    /// Message printed by the CLI: `Line N:` on its own line when the error
    /// belongs to a line, followed by the description.
    #[must_use]
    pub fn report(&self) -> String {
        let message = match self {
            Self::Generate(err) if err.name.is_empty() => err.kind.to_string(),
            Self::Generate(err) => format!("{}: {}", err.name, err.kind),
            other => other.to_string(),
        };
        match self.line() {
            Some(line) => format!("Line {line}: \n{message}"),
            None => message,
        }
    }
}
