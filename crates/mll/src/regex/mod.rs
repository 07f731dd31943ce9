//! # Regex Front End
//!
//! The regex mini-language accepted in pattern and macro declarations:
//!
//! | Syntax     | Meaning                                   |
//! |------------|-------------------------------------------|
//! | `a`        | the literal character `a`                 |
//! | `\*`       | an escaped special character              |
//! | `ab`       | concatenation                             |
//! | `a\|b`     | union                                     |
//! | `a*`       | Kleene closure                            |
//! | `(...)`    | grouping                                  |
//! | `[a-z]`    | inclusive interval of letters or digits   |
//! | `{name}`   | reference to a previously defined macro   |
//!
//! [`tokenize`] turns source into [`Token`]s, [`parse`] turns tokens into an
//! [`Ast`]. [`compile`] runs both.
//!
//! ```rust
//! use mll::regex::{compile, Ast, MacroTable};
//!
//! let mut macros = MacroTable::new();
//! macros.define("digit", compile("[0-9]", &macros).unwrap());
//! let num = compile("{digit}{digit}*", &macros).unwrap();
//! assert!(!num.is_nullable());
//! ```

mod ast;
mod macros;
mod parser;
mod scanner;
mod token;

pub use ast::{Ast, Node};
pub use macros::MacroTable;
pub use parser::{Parser, parse, parse_or_error};
pub use scanner::{normalize_escapes, tokenize};
pub use token::{Token, TokenKind};

use crate::error::GenerateErrorKind;

/// Tokenize and parse `source` in one step.
///
/// # Errors
///
/// Returns the lexical or grammatical failure, whichever stage hit it first.
pub fn compile(source: &str, macros: &MacroTable) -> Result<Ast, GenerateErrorKind> {
    let tokens = tokenize(source)?;
    log::trace!("regex {source:?}: {} tokens", tokens.len());
    Ok(parse(&tokens, macros)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LexErrorKind, ParseError};

    #[test]
    fn test_compile_reports_first_failing_stage() {
        let macros = MacroTable::new();
        assert!(matches!(
            compile("", &macros),
            Err(GenerateErrorKind::Lex(err)) if err.kind == LexErrorKind::EmptyPattern
        ));
        assert!(matches!(
            compile("{x}", &macros),
            Err(GenerateErrorKind::Parse(ParseError::UndefinedMacro { .. }))
        ));
    }

    #[test]
    fn test_display_round_trips_through_compile() {
        let macros = MacroTable::new();
        for source in ["(a|b)*c", "a\\*b", "x(y|z)*|w", "\\(\\)"] {
            let ast = compile(source, &macros).unwrap();
            let again = compile(&ast.to_string(), &macros).unwrap();
            assert_eq!(ast, again, "{source}");
        }
    }
}
