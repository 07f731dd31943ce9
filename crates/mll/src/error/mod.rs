//! # Error Types
//!
//! Error types for every stage of lexer generation.
//!
//! ## Overview
//!
//! - [`LexError`]: the regex source itself is lexically invalid
//!   (no token matches, empty pattern, malformed interval)
//! - [`ParseError`]: the token stream does not fit the regex grammar, or a
//!   macro reference cannot be resolved
//! - [`BuildError`]: automaton construction refused its input
//! - [`GenerateError`]: any of the above, tagged with the line and name of the
//!   declaration that caused it
//!
//! A single failing declaration aborts the whole generation run; there is no
//! partial result.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! and carry stable diagnostic codes.

use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Lexical error in a regex source, with the character offset where scanning
/// stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("{kind} (at offset {position})")]
pub struct LexError {
    pub position: usize,
    #[source]
    pub kind: LexErrorKind,
}

/// Types of regex lexical errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexErrorKind {
    #[error("Ill-formed regex")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(regex::ill_formed)))]
    IllFormed,

    #[error("Empty regex")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(regex::empty)))]
    EmptyPattern,

    #[error("Ill-formed interval [{lower}-{upper}]")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(regex::malformed_interval),
            help("interval bounds must be ascending and must not mix upper and lower case")
        )
    )]
    MalformedInterval { lower: char, upper: char },
}

impl LexError {
    #[must_use]
    pub const fn new(position: usize, kind: LexErrorKind) -> Self {
        Self { position, kind }
    }

    #[must_use]
    pub const fn ill_formed(position: usize) -> Self {
        Self::new(position, LexErrorKind::IllFormed)
    }

    #[must_use]
    pub const fn malformed_interval(position: usize, lower: char, upper: char) -> Self {
        Self::new(position, LexErrorKind::MalformedInterval { lower, upper })
    }
}

/// Errors raised while parsing a regex token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error("Unexpected {found} at offset {position}, expected {expected}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unexpected_token)))]
    UnexpectedToken {
        position: usize,
        found: CompactString,
        expected: &'static str,
    },

    #[error("Unexpected end of regex, expected {expected}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unexpected_end)))]
    UnexpectedEnd { expected: &'static str },

    #[error("Undefined macro '{name}' at offset {position}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(parser::undefined_macro),
            help("macros must be defined in the defines section before they are used")
        )
    )]
    UndefinedMacro { name: CompactString, position: usize },

    #[error("Unexpected trailing {found} at offset {position}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::trailing_input)))]
    TrailingInput { position: usize, found: CompactString },
}

impl ParseError {
    /// Offset of the offending token, when there is one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UndefinedMacro { position, .. }
            | Self::TrailingInput { position, .. } => Some(*position),
            Self::UnexpectedEnd { .. } => None,
        }
    }
}

/// Errors raised by NFA or DFA construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum BuildError {
    #[error("Cannot build an automaton from an erroneous regex")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(automata::error_node)))]
    ErrorNode,

    #[error("DFA exceeds the limit of {limit} states")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(automata::too_many_states),
            help("raise GeneratorConfig::max_dfa_states or simplify the patterns")
        )
    )]
    TooManyStates { limit: usize },
}

/// A failure of the whole generation run, attributed to one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("{}{kind}", location(*.line, .name))]
pub struct GenerateError {
    /// 1-based source line of the offending declaration (0 when not tied to one).
    pub line: usize,
    /// Name of the offending macro or pattern.
    pub name: CompactString,
    #[source]
    pub kind: GenerateErrorKind,
}

/// What went wrong during generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GenerateErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Macro is defined more than once")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(generate::duplicate_macro)))]
    DuplicateMacro,

    #[error("Pattern is declared more than once")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(generate::duplicate_pattern)))]
    DuplicatePattern,

    #[error("No patterns declared")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(generate::no_patterns)))]
    NoPatterns,

    #[error("Pattern matches the empty string")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(generate::nullable_pattern),
            help("a generated scanner would loop on empty lexemes")
        )
    )]
    NullablePattern,
}

impl GenerateError {
    /// An error not tied to a single declaration.
    #[must_use]
    pub fn global(kind: impl Into<GenerateErrorKind>) -> Self {
        Self::new(0, "", kind)
    }

    #[must_use]
    pub fn new(line: usize, name: impl Into<CompactString>, kind: impl Into<GenerateErrorKind>) -> Self {
        Self {
            line,
            name: name.into(),
            kind: kind.into(),
        }
    }
}

fn location(line: usize, name: &str) -> String {
    match (line, name.is_empty()) {
        (0, true) => String::new(),
        (0, false) => format!("{name}: "),
        (_, true) => format!("line {line}: "),
        (_, false) => format!("line {line}: {name}: "),
    }
}
