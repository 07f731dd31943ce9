//! Tokenizer for the regex mini-language.
//!
//! The scanner is itself a small hand-built DFA run with maximal munch and a
//! one-character rollback. Raw tokens are post-processed: special characters
//! are split into operator kinds, delimiters and escapes are stripped,
//! intervals are expanded into a parenthesized union of characters, and
//! implicit concatenation is made explicit.

use super::token::{Token, TokenKind};
use crate::error::{LexError, LexErrorKind};
use smallvec::SmallVec;

/// Input character classes of the scanner DFA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// Letters and every character without a special role
    Other,
    Digit,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Dash,
    OpenParen,
    CloseParen,
    Bar,
    Star,
    Backslash,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_alphabetic() {
            return Self::Other;
        }
        if c.is_ascii_digit() {
            return Self::Digit;
        }
        match c {
            '{' => Self::OpenBrace,
            '}' => Self::CloseBrace,
            '[' => Self::OpenBracket,
            ']' => Self::CloseBracket,
            '-' => Self::Dash,
            '(' => Self::OpenParen,
            ')' => Self::CloseParen,
            '|' => Self::Bar,
            '*' => Self::Star,
            '\\' => Self::Backslash,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Dead,
    Start,
    IdBody,
    IdClosed,
    IntervalOpen,
    LetterLow,
    LetterDash,
    LetterHigh,
    LetterClosed,
    DigitLow,
    DigitDash,
    DigitHigh,
    DigitClosed,
    Literal,
    Special,
    Escape,
    Escaped,
}

/// Token kinds as recognized by the scanner DFA, before post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    Id,
    Interval,
    Char,
    /// One of `( ) | *`
    Special,
}

impl ScanState {
    fn step(self, class: CharClass) -> Self {
        use CharClass as C;
        match (self, class) {
            (Self::Start, C::Other | C::Digit) => Self::Literal,
            (Self::Start, C::OpenBrace) => Self::IdBody,
            (Self::Start, C::OpenBracket) => Self::IntervalOpen,
            (Self::Start, C::OpenParen | C::CloseParen | C::Bar | C::Star) => Self::Special,
            (Self::Start, C::Backslash) => Self::Escape,

            (Self::IdBody, C::Other) => Self::IdBody,
            (Self::IdBody, C::CloseBrace) => Self::IdClosed,

            (Self::IntervalOpen, C::Other) => Self::LetterLow,
            (Self::IntervalOpen, C::Digit) => Self::DigitLow,
            (Self::LetterLow, C::Dash) => Self::LetterDash,
            (Self::LetterDash, C::Other) => Self::LetterHigh,
            (Self::LetterHigh, C::CloseBracket) => Self::LetterClosed,
            (Self::DigitLow, C::Dash) => Self::DigitDash,
            (Self::DigitDash, C::Digit) => Self::DigitHigh,
            (Self::DigitHigh, C::CloseBracket) => Self::DigitClosed,

            (Self::Escape, C::Other | C::Digit) => Self::Dead,
            (Self::Escape, _) => Self::Escaped,

            _ => Self::Dead,
        }
    }

    const fn accepts(self) -> Option<RawKind> {
        match self {
            Self::IdClosed => Some(RawKind::Id),
            Self::LetterClosed | Self::DigitClosed => Some(RawKind::Interval),
            Self::Literal | Self::Escaped => Some(RawKind::Char),
            Self::Special => Some(RawKind::Special),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct RawToken {
    kind: RawKind,
    lexeme: SmallVec<[char; 8]>,
    position: usize,
    is_end: bool,
}

struct Scanner {
    chars: Vec<char>,
    cursor: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            cursor: 0,
        }
    }

    /// Recognize the longest token at the cursor.
    fn next_raw(&mut self) -> Result<RawToken, LexError> {
        let start = self.cursor;
        let mut state = ScanState::Start;

        // The last live state, once the next character leads nowhere
        let previous = loop {
            let Some(&c) = self.chars.get(self.cursor) else {
                // Input exhausted: the token ends here and is the last one.
                return match state.accepts() {
                    Some(kind) => Ok(self.raw(kind, start, true)),
                    None if self.chars.is_empty() => {
                        Err(LexError::new(0, LexErrorKind::EmptyPattern))
                    }
                    None => Err(LexError::ill_formed(self.cursor)),
                };
            };

            self.cursor += 1;
            let next = state.step(CharClass::of(c));
            if next == ScanState::Dead {
                break state;
            }
            state = next;
        };

        // Overshot by one character.
        self.cursor -= 1;
        match previous.accepts() {
            Some(kind) => Ok(self.raw(kind, start, false)),
            None => Err(LexError::ill_formed(self.cursor)),
        }
    }

    fn raw(&self, kind: RawKind, start: usize, is_end: bool) -> RawToken {
        RawToken {
            kind,
            lexeme: self.chars[start..self.cursor].iter().copied().collect(),
            position: start,
            is_end,
        }
    }
}

/// Turn a raw token into its final token(s).
fn postprocess(raw: RawToken) -> Result<SmallVec<[Token; 4]>, LexError> {
    let RawToken {
        kind,
        lexeme,
        position,
        is_end,
    } = raw;
    let mut out: SmallVec<[Token; 4]> = SmallVec::new();

    match kind {
        RawKind::Special => {
            let kind = match lexeme[0] {
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                '|' => TokenKind::Union,
                _ => TokenKind::Kleene,
            };
            out.push(Token::new(kind, lexeme[0].to_string(), position).with_end(is_end));
        }
        RawKind::Char => {
            let text: String = if lexeme.len() > 1 && lexeme[0] == '\\' {
                lexeme[1..].iter().collect()
            } else {
                lexeme.iter().collect()
            };
            out.push(Token::new(TokenKind::Char, text, position).with_end(is_end));
        }
        RawKind::Id => {
            let name: String = lexeme[1..lexeme.len() - 1].iter().collect();
            out.push(Token::new(TokenKind::Id, name, position).with_end(is_end));
        }
        RawKind::Interval => {
            // lexeme is exactly `[`, lower, `-`, upper, `]`
            let (lower, upper) = (lexeme[1], lexeme[3]);
            if lower > upper || (lower.is_uppercase() && upper.is_lowercase()) {
                return Err(LexError::malformed_interval(position, lower, upper));
            }
            out.push(Token::new(TokenKind::OpenParen, "(", position));
            for c in lower..=upper {
                if c != lower {
                    out.push(Token::new(TokenKind::Union, "|", position));
                }
                out.push(Token::new(TokenKind::Char, c.to_string(), position));
            }
            out.push(Token::new(TokenKind::CloseParen, ")", position).with_end(is_end));
        }
    }

    Ok(out)
}

/// Tokenize a regex source.
///
/// Intervals come back already expanded and concatenation is explicit, so the
/// result contains no `Interval` tokens and a `Concat` token between every
/// pair of adjacent operands. The last token has `is_end` set.
///
/// # Errors
///
/// Returns a [`LexError`] if the source is empty, if no token matches at some
/// offset, or if an interval is malformed. No partial token list is returned.
///
/// # Example
///
/// ```rust
/// use mll::regex::{tokenize, TokenKind};
///
/// let tokens = tokenize("ab*").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, [TokenKind::Char, TokenKind::Concat, TokenKind::Char, TokenKind::Kleene]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new(source);
    let mut tokens: Vec<Token> = Vec::new();

    loop {
        let raw = scanner.next_raw()?;
        let is_end = raw.is_end;
        let expanded = postprocess(raw)?;

        if let (Some(prev), Some(first)) = (tokens.last(), expanded.first())
            && prev.kind.ends_operand()
            && first.kind.starts_operand()
        {
            tokens.push(Token::concat(first.position));
        }
        tokens.extend(expanded);

        if is_end {
            break;
        }
    }

    log::trace!("tokenized {source:?} into {} tokens", tokens.len());
    Ok(tokens)
}

/// Replace the two-character sequences `\n` and `\t` with newline and tab.
///
/// The scanner treats a backslash followed by a letter as an error, so
/// declarations are normalized with this before tokenizing.
#[must_use]
pub fn normalize_escapes(source: &str) -> String {
    source.replace("\\n", "\n").replace("\\t", "\t")
}
