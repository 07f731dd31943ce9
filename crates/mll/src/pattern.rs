use crate::automata::{Nfa, PatternId, StateId};
use compact_str::CompactString;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Everything known about one declared pattern.
///
/// Created before NFA combination; [`combine`](crate::automata::nfa::combine)
/// fills in `nfa_accepting_state` and
/// [`construct`](crate::automata::subset::construct) appends to
/// `dfa_accepting_states`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct PatternDescriptor {
    /// Declaration rank
    pub id: PatternId,
    pub name: CompactString,
    /// Action code, copied verbatim into the generated scanner
    pub action: String,
    /// Declaration line, 0 when not read from a file
    pub line: usize,
    /// Thompson NFA of this pattern alone
    pub nfa: Nfa,
    /// Accepting state in the combined NFA
    pub nfa_accepting_state: Option<u32>,
    /// DFA states that accept for this pattern, in increasing order
    pub dfa_accepting_states: Vec<StateId>,
}

impl PatternDescriptor {
    #[must_use]
    pub fn new(id: PatternId, name: impl Into<CompactString>, action: impl Into<String>, nfa: Nfa) -> Self {
        Self {
            id,
            name: name.into(),
            action: action.into(),
            line: 0,
            nfa,
            nfa_accepting_state: None,
            dfa_accepting_states: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Whether the pattern carries action code to run on a match.
    #[must_use]
    pub fn has_action(&self) -> bool {
        !self.action.trim().is_empty()
    }

    /// Whether no DFA state accepts for this pattern, because every lexeme it
    /// matches is claimed by an earlier pattern.
    #[must_use]
    pub fn is_shadowed(&self) -> bool {
        self.dfa_accepting_states.is_empty()
    }
}
