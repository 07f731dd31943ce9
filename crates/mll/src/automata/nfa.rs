//! Thompson construction over an index arena.
//!
//! Every fragment keeps three invariants, and every combinator preserves them:
//!
//! - state 0 is the only start state,
//! - the last state is the only accepting state and has no transitions,
//! - a state carries either a single symbol move or epsilon moves, never both.
//!
//! Combinators consume their operands and renumber them by a fixed offset
//! instead of allocating into a shared arena, so each fragment stays a
//! self-contained value.

use super::id_from_len;
use super::subset::{epsilon_closure, move_on};
use crate::error::BuildError;
use crate::pattern::PatternDescriptor;
use crate::regex::{Ast, Node};
use smallvec::{SmallVec, smallvec};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// An NFA move. Targets are state indices within the owning [`Nfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Transition {
    Epsilon(u32),
    EpsilonPair(u32, u32),
    OnSymbol(char, u32),
}

impl Transition {
    #[must_use]
    const fn shifted(self, offset: u32) -> Self {
        match self {
            Self::Epsilon(t) => Self::Epsilon(t + offset),
            Self::EpsilonPair(a, b) => Self::EpsilonPair(a + offset, b + offset),
            Self::OnSymbol(c, t) => Self::OnSymbol(c, t + offset),
        }
    }

    /// The symbol consumed by this move, `None` for epsilon moves.
    #[must_use]
    pub const fn symbol(self) -> Option<char> {
        match self {
            Self::OnSymbol(c, _) => Some(c),
            Self::Epsilon(_) | Self::EpsilonPair(..) => None,
        }
    }

    /// Targets reachable without consuming input.
    pub fn epsilon_targets(self) -> impl Iterator<Item = u32> {
        let (first, second) = match self {
            Self::Epsilon(t) => (Some(t), None),
            Self::EpsilonPair(a, b) => (Some(a), Some(b)),
            Self::OnSymbol(..) => (None, None),
        };
        first.into_iter().chain(second)
    }
}

/// NFA state: its outgoing moves.
///
/// Most states have at most one move; the start state of a combined NFA has
/// one epsilon move per pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct NfaState {
    pub transitions: SmallVec<[Transition; 2]>,
}

impl NfaState {
    fn with(transition: Transition) -> Self {
        Self {
            transitions: smallvec![transition],
        }
    }
}

/// Thompson NFA fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Nfa {
    states: Vec<NfaState>,
}

impl Nfa {
    /// Two-state fragment accepting exactly `c`.
    #[must_use]
    pub fn symbol(c: char) -> Self {
        Self {
            states: vec![NfaState::with(Transition::OnSymbol(c, 1)), NfaState::default()],
        }
    }

    #[must_use]
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    #[must_use]
    pub fn state(&self, id: u32) -> &NfaState {
        &self.states[id as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub const fn start(&self) -> u32 {
        0
    }

    /// Index of the accepting state of a single fragment.
    #[must_use]
    pub fn accept(&self) -> u32 {
        id_from_len(self.states.len().saturating_sub(1))
    }

    fn shift(&mut self, offset: u32) {
        if offset == 0 {
            return;
        }
        for state in &mut self.states {
            for transition in &mut state.transitions {
                *transition = transition.shifted(offset);
            }
        }
    }

    fn push(&mut self, state: NfaState) -> u32 {
        let id = id_from_len(self.states.len());
        self.states.push(state);
        id
    }

    fn debug_check_fragment(&self) {
        debug_assert!(self.states.len() >= 2, "fragment needs a start and an accept state");
        debug_assert!(
            self.states.last().is_some_and(|s| s.transitions.is_empty()),
            "accepting state must have no transitions"
        );
    }

    /// `self` followed by `right`. Right's start state takes the place of
    /// self's accepting state.
    #[must_use]
    pub fn concat(mut self, mut right: Self) -> Self {
        self.debug_check_fragment();
        right.debug_check_fragment();

        right.shift(self.accept());
        self.states.pop();
        self.states.append(&mut right.states);
        self
    }

    /// `self | right` with a fresh start and a fresh accepting state.
    #[must_use]
    pub fn union(mut self, mut right: Self) -> Self {
        self.debug_check_fragment();
        right.debug_check_fragment();

        let left_len = id_from_len(self.states.len());
        self.shift(1);
        right.shift(left_len + 1);
        let left_accept = left_len;
        let right_accept = left_len + id_from_len(right.states.len());
        let accept = right_accept + 1;

        let mut states = Vec::with_capacity(self.states.len() + right.states.len() + 2);
        states.push(NfaState::with(Transition::EpsilonPair(1, left_len + 1)));
        states.append(&mut self.states);
        states.append(&mut right.states);
        states.push(NfaState::default());
        states[left_accept as usize] = NfaState::with(Transition::Epsilon(accept));
        states[right_accept as usize] = NfaState::with(Transition::Epsilon(accept));

        Self { states }
    }

    /// Zero or more repetitions of `self`.
    #[must_use]
    pub fn kleene(mut self) -> Self {
        self.debug_check_fragment();

        let len = id_from_len(self.states.len());
        self.shift(1);
        let old_accept = len;
        let accept = len + 1;
        let loop_or_exit = Transition::EpsilonPair(1, accept);

        let mut states = Vec::with_capacity(self.states.len() + 2);
        states.push(NfaState::with(loop_or_exit));
        states.append(&mut self.states);
        states.push(NfaState::default());
        states[old_accept as usize] = NfaState::with(loop_or_exit);

        Self { states }
    }

    /// Simulate the NFA on `word`, reporting whether its accepting state is
    /// reached after consuming the whole word.
    #[must_use]
    pub fn matches(&self, word: &str) -> bool {
        self.matches_at(word, self.accept())
    }

    /// Like [`Nfa::matches`], with an explicit accepting state. Used for
    /// combined NFAs where every pattern has its own accepting state.
    #[must_use]
    pub fn matches_at(&self, word: &str, accept: u32) -> bool {
        let mut current = epsilon_closure(self, [self.start()]);
        for c in word.chars() {
            if current.is_empty() {
                return false;
            }
            current = epsilon_closure(self, move_on(self, &current, c));
        }
        current.contains(accept)
    }
}

/// Build the Thompson NFA of a regex tree, children first.
///
/// The tree is walked with an explicit stack, so arbitrarily long patterns
/// do not exhaust the call stack.
///
/// # Errors
///
/// Returns [`BuildError::ErrorNode`] if the tree contains the error sentinel.
pub fn build(ast: &Ast) -> Result<Nfa, BuildError> {
    ast.try_fold(|node: Node<Nfa>| {
        Ok(match node {
            Node::Char(c) => Nfa::symbol(c),
            Node::Concat(left, right) => left.concat(right),
            Node::Union(left, right) => left.union(right),
            Node::Kleene(operand) => operand.kleene(),
            Node::Error => return Err(BuildError::ErrorNode),
        })
    })
}

/// Combine the per-pattern NFAs into one, recording each pattern's accepting
/// state in the combined numbering.
///
/// A single pattern's NFA is used unchanged. Otherwise a fresh start state 0
/// gets one epsilon move per pattern, to that pattern's renumbered start.
pub fn combine(patterns: &mut [PatternDescriptor]) -> Nfa {
    if let [only] = patterns {
        only.nfa_accepting_state = Some(only.nfa.accept());
        return only.nfa.clone();
    }

    let total = 1 + patterns.iter().map(|p| p.nfa.len()).sum::<usize>();
    let mut combined = Nfa {
        states: Vec::with_capacity(total),
    };
    combined.push(NfaState::default());

    for pattern in patterns.iter_mut() {
        let offset = id_from_len(combined.len());
        let mut fragment = pattern.nfa.clone();
        fragment.shift(offset);
        combined.states[0].transitions.push(Transition::Epsilon(offset));
        combined.states.append(&mut fragment.states);
        pattern.nfa_accepting_state = Some(id_from_len(combined.len() - 1));
    }

    log::debug!(
        "combined {} patterns into an NFA with {} states",
        patterns.len(),
        combined.len()
    );
    combined
}
