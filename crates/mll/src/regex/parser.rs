//! Recursive-descent parser for regex token streams.
//!
//! Grammar, from highest to lowest precedence:
//!
//! ```text
//! factor → '(' union ')' | CHAR | ID
//! kleene → factor ('*')?
//! concat → kleene (CONCAT kleene)*
//! union  → concat (UNION concat)*
//! ```
//!
//! Operand productions push a leaf onto the parser's operand stack; operator
//! productions pop their operands and push the combined node, so union and
//! concatenation come out left-associative.

use super::ast::Ast;
use super::macros::MacroTable;
use super::token::{Token, TokenKind};
use crate::error::ParseError;

/// Parser state for one token stream. Owns its lookahead position and operand
/// stack; the macro table is borrowed for the duration of the parse.
pub struct Parser<'t, 'm> {
    tokens: &'t [Token],
    pos: usize,
    operands: Vec<Ast>,
    macros: &'m MacroTable,
}

impl<'t, 'm> Parser<'t, 'm> {
    #[must_use]
    pub fn new(tokens: &'t [Token], macros: &'m MacroTable) -> Self {
        Self {
            tokens,
            pos: 0,
            operands: Vec::with_capacity(8),
            macros,
        }
    }

    /// Parse the whole token stream into a single tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on a grammar mismatch, an undefined macro,
    /// or tokens left over after a complete regex.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        self.union()?;

        if let Some(token) = self.lookahead() {
            return Err(ParseError::TrailingInput {
                position: token.position,
                found: token.kind.describe().into(),
            });
        }

        debug_assert_eq!(self.operands.len(), 1, "operand stack must hold exactly the root");
        Ok(self.operands.pop().unwrap_or(Ast::Error))
    }

    fn lookahead(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next_is(&self, kind: TokenKind) -> bool {
        self.lookahead().is_some_and(|t| t.kind == kind)
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&'t Token, ParseError> {
        match self.lookahead() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                position: token.position,
                found: token.kind.describe().into(),
                expected,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn factor(&mut self) -> Result<(), ParseError> {
        const EXPECTED: &str = "'(', a character or a macro reference";

        let Some(token) = self.lookahead() else {
            return Err(ParseError::UnexpectedEnd { expected: EXPECTED });
        };

        match token.kind {
            TokenKind::OpenParen => {
                self.pos += 1;
                self.union()?;
                self.expect(TokenKind::CloseParen, "')'")?;
            }
            TokenKind::Char => {
                self.pos += 1;
                let Some(c) = token.as_char() else {
                    return Err(ParseError::UnexpectedToken {
                        position: token.position,
                        found: token.lexeme.clone(),
                        expected: "a single character",
                    });
                };
                self.operands.push(Ast::Char(c));
            }
            TokenKind::Id => {
                self.pos += 1;
                let Some(ast) = self.macros.get(&token.lexeme) else {
                    return Err(ParseError::UndefinedMacro {
                        name: token.lexeme.clone(),
                        position: token.position,
                    });
                };
                self.operands.push(ast.clone());
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    position: token.position,
                    found: token.kind.describe().into(),
                    expected: EXPECTED,
                });
            }
        }
        Ok(())
    }

    fn kleene(&mut self) -> Result<(), ParseError> {
        self.factor()?;
        if self.next_is(TokenKind::Kleene) {
            self.pos += 1;
            let operand = self.pop_operand();
            self.operands.push(Ast::kleene(operand));
        }
        Ok(())
    }

    fn concat(&mut self) -> Result<(), ParseError> {
        self.kleene()?;
        while self.next_is(TokenKind::Concat) {
            self.pos += 1;
            self.kleene()?;
            self.reduce(Ast::concat);
        }
        Ok(())
    }

    fn union(&mut self) -> Result<(), ParseError> {
        self.concat()?;
        while self.next_is(TokenKind::Union) {
            self.pos += 1;
            self.concat()?;
            self.reduce(Ast::union);
        }
        Ok(())
    }

    fn pop_operand(&mut self) -> Ast {
        match self.operands.pop() {
            Some(ast) => ast,
            None => unreachable!("operand stack underflow"),
        }
    }

    /// Replace the two topmost operands with `combine(left, right)`.
    fn reduce(&mut self, combine: fn(Ast, Ast) -> Ast) {
        let right = self.pop_operand();
        let left = self.pop_operand();
        self.operands.push(combine(left, right));
    }
}

/// Parse a token stream, resolving `{name}` references against `macros`.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse(tokens: &[Token], macros: &MacroTable) -> Result<Ast, ParseError> {
    Parser::new(tokens, macros).parse()
}

/// Parse a token stream, substituting [`Ast::Error`] for a failed parse.
///
/// The cause is logged. Callers must treat an error tree as fatal and keep
/// it away from NFA construction.
#[must_use]
pub fn parse_or_error(tokens: &[Token], macros: &MacroTable) -> Ast {
    parse(tokens, macros).unwrap_or_else(|err| {
        log::warn!("regex parse failed: {err}");
        Ast::Error
    })
}
