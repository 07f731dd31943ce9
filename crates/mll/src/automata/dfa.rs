use super::{PatternId, StateId};
use smallvec::SmallVec;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Canonical set of NFA states identifying a DFA state.
///
/// Always sorted and free of duplicates, so two sets are equal (and hash
/// equal) exactly when they contain the same states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize), serde(transparent))]
pub struct NfaStateSet(SmallVec<[u32; 8]>);

impl NfaStateSet {
    #[must_use]
    pub fn from_unsorted(mut states: SmallVec<[u32; 8]>) -> Self {
        states.sort_unstable();
        states.dedup();
        Self(states)
    }

    #[must_use]
    pub fn contains(&self, state: u32) -> bool {
        self.0.binary_search(&state).is_ok()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<u32> for NfaStateSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}

/// DFA state with its NFA set, outgoing transitions and resolved pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct DfaState {
    pub nfa_states: NfaStateSet,
    /// Transitions: (symbol, target state)
    /// Sorted by symbol for binary search
    pub transitions: Vec<(char, StateId)>,
    /// Pattern this state accepts for, if any
    pub accept: Option<PatternId>,
}

impl DfaState {
    #[must_use]
    pub const fn new(nfa_states: NfaStateSet) -> Self {
        Self {
            nfa_states,
            transitions: Vec::new(),
            accept: None,
        }
    }

    /// Find transition using binary search on sorted symbols
    #[must_use]
    pub fn find_transition(&self, c: char) -> Option<StateId> {
        self.transitions
            .binary_search_by_key(&c, |&(symbol, _)| symbol)
            .ok()
            .map(|idx| self.transitions[idx].1)
    }

    #[must_use]
    pub const fn is_accepting(&self) -> bool {
        self.accept.is_some()
    }
}

/// Deterministic automaton produced by subset construction.
///
/// States are stored in discovery order; the start state is `StateId(0)`.
/// A missing transition means the dead state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    pub(crate) const fn from_states(states: Vec<DfaState>) -> Self {
        Self { states }
    }

    #[must_use]
    pub const fn start(&self) -> StateId {
        StateId(0)
    }

    #[must_use]
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    #[must_use]
    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Follow the transition on `c` out of `state`.
    #[must_use]
    pub fn next(&self, state: StateId, c: char) -> Option<StateId> {
        self.states.get(state.index())?.find_transition(c)
    }

    /// Pattern accepted in `state`, if any.
    #[must_use]
    pub fn accept(&self, state: StateId) -> Option<PatternId> {
        self.states.get(state.index())?.accept
    }

    /// Accepting states in increasing id order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_accepting())
            .map(|(idx, _)| StateId(super::id_from_len(idx)))
    }

    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Run the DFA over the whole of `word` without backtracking.
    ///
    /// Returns the pattern accepted in the final state, or `None` if the walk
    /// dies or ends in a non-accepting state.
    #[must_use]
    pub fn run(&self, word: &str) -> Option<PatternId> {
        let mut state = self.start();
        for c in word.chars() {
            state = self.next(state, c)?;
        }
        self.accept(state)
    }
}
