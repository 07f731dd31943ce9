use crate::automata::{PatternId, StateId};
use crate::pipeline::LexerTables;
use smallvec::SmallVec;

/// One lexeme produced by [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'i> {
    /// Pattern that matched, `None` for an error lexeme
    pub pattern: Option<PatternId>,
    pub text: &'i str,
    /// Byte offset of `text` in the input
    pub offset: usize,
    /// 1-based line on which the lexeme ends
    pub line: usize,
    /// Set when scanning this lexeme ran into the end of the input
    pub last: bool,
}

impl Lexeme<'_> {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.pattern.is_none()
    }
}

/// Entry of the backtracking stack: a state entered during the current scan,
/// with the input consumed and the line reached when it was entered.
#[derive(Debug, Clone, Copy)]
struct Entered {
    state: StateId,
    end: usize,
    line: usize,
}

/// Reference driver for generated tables.
///
/// Implements the scanner contract of the emitted code: every state entered
/// is pushed on a stack, which is cleared on entering an accepting state; on a
/// dead transition or at end of input, states are popped, un-consuming input,
/// until an accepting state is found or the stack is empty.
///
/// When no prefix is accepted, or only the empty prefix, the scanner yields
/// an error lexeme holding one character and moves past it, so scanning
/// always makes progress.
#[derive(Debug, Clone)]
pub struct Scanner<'t, 'i> {
    tables: &'t LexerTables,
    input: &'i str,
    pos: usize,
    line: usize,
}

impl<'t, 'i> Scanner<'t, 'i> {
    #[must_use]
    pub const fn new(tables: &'t LexerTables, input: &'i str) -> Self {
        Self {
            tables,
            input,
            pos: 0,
            line: 1,
        }
    }

    /// Remaining input.
    #[must_use]
    pub fn rest(&self) -> &'i str {
        &self.input[self.pos..]
    }

    fn next_lexeme(&mut self) -> Option<Lexeme<'i>> {
        let rest = self.rest();
        let first = rest.chars().next()?;

        let dfa = self.tables.dfa();
        let mut stack: SmallVec<[Entered; 16]> = SmallVec::new();
        let mut state = dfa.start();
        let mut end = 0;
        let mut line = self.line;
        let mut last = false;

        loop {
            if self.tables.is_accepting(state) {
                stack.clear();
            }
            stack.push(Entered { state, end, line });

            let Some(c) = rest[end..].chars().next() else {
                last = true;
                break;
            };
            let Some(next) = dfa.next(state, c) else {
                break;
            };
            end += c.len_utf8();
            if c == '\n' {
                line += 1;
            }
            state = next;
        }

        while let Some(entered) = stack.pop() {
            if entered.end > 0
                && let Some(pattern) = dfa.accept(entered.state)
            {
                return Some(self.emit(Some(pattern), entered.end, entered.line, last));
            }
        }

        let line = self.line + usize::from(first == '\n');
        Some(self.emit(None, first.len_utf8(), line, last))
    }

    fn emit(&mut self, pattern: Option<PatternId>, len: usize, line: usize, last: bool) -> Lexeme<'i> {
        let lexeme = Lexeme {
            pattern,
            text: &self.input[self.pos..self.pos + len],
            offset: self.pos,
            line,
            last: last && self.pos + len == self.input.len(),
        };
        self.pos += len;
        self.line = line;
        lexeme
    }

    /// Scan the whole input into `(pattern name, text)` pairs; error lexemes
    /// are named `"<error>"`.
    #[must_use]
    pub fn named(self) -> Vec<(&'t str, &'i str)> {
        let tables = self.tables;
        self.map(|lexeme| {
            let name = lexeme
                .pattern
                .and_then(|id| tables.pattern(id))
                .map_or("<error>", |p| p.name.as_str());
            (name, lexeme.text)
        })
        .collect()
    }
}

impl<'i> Iterator for Scanner<'_, 'i> {
    type Item = Lexeme<'i>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_lexeme()
    }
}
