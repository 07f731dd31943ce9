//! # Automata
//!
//! Thompson construction of per-pattern NFAs ([`nfa`]), their combination into
//! one multi-pattern NFA, and subset construction of the DFA ([`subset`],
//! [`dfa`]).
//!
//! NFA states are plain `u32` indices into an arena. DFA states are
//! [`StateId`]s in discovery order, so the start state is always `StateId(0)`.

pub mod dfa;
pub mod nfa;
pub mod subset;

pub use dfa::{Dfa, DfaState, NfaStateSet};
pub use nfa::{Nfa, NfaState, Transition};

use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// State ID in the DFA
///
/// Uses u32 which is sufficient for all practical DFA sizes.
/// Conversions to usize for indexing are safe on all platforms (usize >= 32 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize), serde(transparent))]
pub struct StateId(pub u32);

impl StateId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Declaration rank of a pattern. Lower ranks win ties between patterns that
/// accept the same lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize), serde(transparent))]
pub struct PatternId(pub u32);

impl PatternId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Convert an arena length to a `u32` id.
///
/// Arenas are bounded well below `u32::MAX` by
/// [`GeneratorConfig::max_dfa_states`](crate::GeneratorConfig) and by the size
/// of the regex sources, so saturation never occurs in practice.
pub(crate) fn id_from_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
