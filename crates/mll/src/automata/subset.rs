//! Subset construction.
//!
//! Each DFA state stands for the epsilon closure of a set of NFA states.
//! States are discovered breadth-first from the closure of the NFA start
//! state, and looked up by their canonical [`NfaStateSet`], so the same set
//! always maps to the same DFA state.

use super::dfa::{Dfa, DfaState, NfaStateSet};
use super::nfa::Nfa;
use super::{PatternId, StateId, id_from_len};
use crate::config::GeneratorConfig;
use crate::error::BuildError;
use crate::pattern::PatternDescriptor;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Compute epsilon closure of NFA states
pub fn epsilon_closure(nfa: &Nfa, seeds: impl IntoIterator<Item = u32>) -> NfaStateSet {
    let mut stack: SmallVec<[u32; 8]> = seeds.into_iter().collect();
    let mut closure: HashSet<u32> = stack.iter().copied().collect();

    while let Some(state) = stack.pop() {
        for transition in &nfa.state(state).transitions {
            for next in transition.epsilon_targets() {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }
    }

    closure.into_iter().collect()
}

/// NFA states reachable from `set` by one move on `symbol`.
#[must_use]
pub fn move_on(nfa: &Nfa, set: &NfaStateSet, symbol: char) -> Vec<u32> {
    set.iter()
        .flat_map(|state| nfa.state(state).transitions.iter())
        .filter_map(|transition| match *transition {
            super::Transition::OnSymbol(c, target) if c == symbol => Some(target),
            _ => None,
        })
        .collect()
}

/// Symbols with at least one move out of `set`, in ascending order.
#[must_use]
pub fn possible_symbols(nfa: &Nfa, set: &NfaStateSet) -> BTreeSet<char> {
    set.iter()
        .flat_map(|state| nfa.state(state).transitions.iter())
        .filter_map(|transition| transition.symbol())
        .collect()
}

/// Convert the combined NFA into a DFA.
///
/// Every discovered state, the start state included, whose NFA set holds a
/// pattern's accepting state accepts for the lowest-ranked such pattern, and
/// is appended to that pattern's `dfa_accepting_states`.
///
/// # Errors
///
/// Returns [`BuildError::TooManyStates`] when discovery exceeds
/// `config.max_dfa_states`.
pub fn construct(
    nfa: &Nfa,
    patterns: &mut [PatternDescriptor],
    config: &GeneratorConfig,
) -> Result<Dfa, BuildError> {
    // Tag each accepting NFA state with the rank of the pattern it belongs to,
    // and the pattern's position in `patterns`
    let ranks: HashMap<u32, (PatternId, usize)> = patterns
        .iter()
        .enumerate()
        .filter_map(|(pos, p)| p.nfa_accepting_state.map(|state| (state, (p.id, pos))))
        .collect();
    debug_assert_eq!(ranks.len(), patterns.len(), "accepting NFA states must be distinct");

    let limit = config.max_dfa_states;
    let mut index: HashMap<NfaStateSet, StateId> = HashMap::new();
    let mut states: Vec<DfaState> = Vec::new();

    let start = epsilon_closure(nfa, [nfa.start()]);
    index.insert(start.clone(), StateId(0));
    states.push(DfaState::new(start));

    // States past `marked` are unmarked; processing in index order follows
    // discovery order.
    let mut marked = 0;
    while marked < states.len() {
        let current = StateId(id_from_len(marked));
        let set = states[marked].nfa_states.clone();
        let mut transitions = Vec::new();

        for symbol in possible_symbols(nfa, &set) {
            let target_set = epsilon_closure(nfa, move_on(nfa, &set, symbol));
            let target = match index.get(&target_set) {
                Some(&id) => id,
                None => {
                    if states.len() >= limit {
                        return Err(BuildError::TooManyStates { limit });
                    }
                    let id = StateId(id_from_len(states.len()));
                    log::trace!("discovered {id} = {:?}", target_set.as_slice());
                    index.insert(target_set.clone(), id);
                    states.push(DfaState::new(target_set));
                    id
                }
            };
            transitions.push((symbol, target));
        }

        states[current.index()].transitions = transitions;
        marked += 1;
    }

    for (idx, state) in states.iter_mut().enumerate() {
        let Some((rank, pos)) = state.nfa_states.iter().filter_map(|s| ranks.get(&s).copied()).min() else {
            continue;
        };
        state.accept = Some(rank);
        patterns[pos]
            .dfa_accepting_states
            .push(StateId(id_from_len(idx)));
    }

    let dfa = Dfa::from_states(states);
    log::debug!(
        "subset construction: {} NFA states -> {} DFA states, {} transitions",
        nfa.len(),
        dfa.len(),
        dfa.transition_count()
    );
    Ok(dfa)
}
