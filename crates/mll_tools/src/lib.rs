//! mll tools - front end and code emitter for the mll lexer generator
//!
//! This crate reads `.mll` lexer description files, drives the generator in
//! the `mll` crate, and writes the result as a C++ scanner, a DOT graph, or
//! JSON tables.

pub mod cli;
pub mod commands;
pub mod emit;
pub mod error;
pub mod input;
pub mod visualize;

pub use emit::Emitter;
pub use error::{EmitError, InputError, InputErrorKind, ToolError};
pub use input::{LexerSource, parse_source, read_file};
pub use visualize::generate_dot;
