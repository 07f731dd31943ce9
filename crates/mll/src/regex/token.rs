use compact_str::CompactString;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Kind of a regex token.
///
/// `Concat` never appears in regex source; the scanner synthesizes it between
/// adjacent operands so the parser sees concatenation explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum TokenKind {
    /// Macro reference, `{name}`
    Id,
    /// Character interval, `[a-z]`. Expanded away before the scanner returns.
    Interval,
    /// `|`
    Union,
    /// Synthesized concatenation
    Concat,
    /// `*`
    Kleene,
    /// Literal character, possibly escaped
    Char,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
}

impl TokenKind {
    /// Whether a token of this kind can end an operand, so that a following
    /// operand needs an explicit concatenation.
    #[must_use]
    pub const fn ends_operand(self) -> bool {
        matches!(
            self,
            Self::Char | Self::Interval | Self::Id | Self::CloseParen | Self::Kleene
        )
    }

    /// Whether a token of this kind can start an operand.
    #[must_use]
    pub const fn starts_operand(self) -> bool {
        matches!(self, Self::Char | Self::Interval | Self::Id | Self::OpenParen)
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Id => "macro reference",
            Self::Interval => "interval",
            Self::Union => "'|'",
            Self::Concat => "concatenation",
            Self::Kleene => "'*'",
            Self::Char => "character",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
        }
    }
}

/// A token of the regex mini-language.
///
/// # Example
///
/// ```rust
/// use mll::regex::{Token, TokenKind};
///
/// let token = Token::new(TokenKind::Char, "a", 0);
/// assert!(!token.is_end);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    /// Token text with delimiters and escapes removed
    pub lexeme: CompactString,
    /// Set on the last token of the source
    pub is_end: bool,
    /// Character offset of the token start in the regex source
    pub position: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<CompactString>, position: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            is_end: false,
            position,
        }
    }

    #[must_use]
    pub const fn with_end(mut self, is_end: bool) -> Self {
        self.is_end = is_end;
        self
    }

    pub(crate) fn concat(position: usize) -> Self {
        Self::new(TokenKind::Concat, "^", position)
    }

    /// The single character carried by a `Char` token.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        if self.kind != TokenKind::Char {
            return None;
        }
        let mut chars = self.lexeme.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.lexeme.as_str())
    }
}
