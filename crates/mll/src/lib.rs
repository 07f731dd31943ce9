//! # mll
//!
//! A lexical-analyzer generator. Named regular-expression patterns, optionally
//! built from named sub-patterns (macros), are compiled into a single DFA that
//! recognizes all of them and tells, for every accepting state, which pattern
//! matched.
//!
//! ## Overview
//!
//! Generation runs in four stages:
//!
//! 1. **Tokenizing** ([`regex::tokenize`]): regex source to tokens, with
//!    intervals expanded and concatenation made explicit
//! 2. **Parsing** ([`regex::parse`]): tokens to an [`Ast`](regex::Ast), with
//!    macro references resolved against a [`MacroTable`](regex::MacroTable)
//! 3. **Thompson construction** ([`automata::nfa`]): one NFA per pattern,
//!    combined into a single NFA
//! 4. **Subset construction** ([`automata::subset`]): the combined NFA to a
//!    [`Dfa`](automata::Dfa), each accepting state resolved to the earliest
//!    declared pattern it accepts for
//!
//! [`Generator`] runs all four and returns [`LexerTables`].
//!
//! ## Quick Start
//!
//! ```rust
//! use mll::Generator;
//! use mll::testing::Scanner;
//!
//! let tables = Generator::new()
//!     .define("digit", "[0-9]")
//!     .pattern("id", "_[a-z][a-z]*", "{ token->set_token_type(TOKEN_TYPE_ID); }")
//!     .pattern("num", "{digit}{digit}*", "{ token->set_token_type(TOKEN_TYPE_NUM); }")
//!     .pattern("ws", "( |\n)( |\n)*", "{ token->set_ignore(true); }")
//!     .build()
//!     .unwrap();
//!
//! let named = Scanner::new(&tables, "_ab 12").named();
//! assert_eq!(named, [("id", "_ab"), ("ws", " "), ("num", "12")]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serialize`: `serde` support for tables, automata and trees
//! - `diagnostics`: `miette` diagnostics for all error types

pub mod automata;
pub mod config;
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod regex;
pub mod testing;

pub use automata::{Dfa, Nfa, PatternId, StateId};
pub use config::GeneratorConfig;
pub use error::{BuildError, GenerateError, GenerateErrorKind, LexError, LexErrorKind, ParseError};
pub use pattern::PatternDescriptor;
pub use pipeline::{Generator, LexerTables, MacroDecl, PatternDecl};
