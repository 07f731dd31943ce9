//! # Testing Utilities
//!
//! Helpers for checking generated tables without emitting and compiling a
//! scanner:
//!
//! - [`Scanner`] runs [`LexerTables`](crate::LexerTables) over an input string
//!   with the same maximal-munch, backtracking contract as the generated
//!   scanner.
//! - [`sample_words`] enumerates a bounded subset of a regex's language, for
//!   property tests that compare the NFA, the DFA and the tree.

pub mod generators;
pub mod scanner;

pub use generators::*;
pub use scanner::*;
