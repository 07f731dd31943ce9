//! Tests for NFA and DFA construction

use mll::automata::nfa::{build, combine};
use mll::automata::subset::construct;
use mll::automata::{Dfa, Nfa, PatternId, StateId};
use mll::regex::{MacroTable, compile};
use mll::{Generator, GeneratorConfig, PatternDescriptor};

fn nfa(source: &str) -> Nfa {
    build(&compile(source, &MacroTable::new()).expect("regex should compile")).expect("NFA should build")
}

fn dfa(sources: &[&str]) -> (Dfa, Vec<PatternDescriptor>) {
    let mut patterns: Vec<PatternDescriptor> = sources
        .iter()
        .zip(0u32..)
        .map(|(source, rank)| PatternDescriptor::new(PatternId(rank), *source, "", nfa(source)))
        .collect();
    let combined = combine(&mut patterns);
    let dfa = construct(&combined, &mut patterns, &GeneratorConfig::default()).expect("DFA should build");
    (dfa, patterns)
}

/// Every word over `alphabet` of length at most `max_len`.
fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut layer = vec![String::new()];
    for _ in 0..max_len {
        layer = layer
            .iter()
            .flat_map(|prefix| alphabet.iter().map(move |c| format!("{prefix}{c}")))
            .collect();
        all.extend(layer.iter().cloned());
    }
    all
}

fn same_language(left: &str, right: &str, alphabet: &[char], max_len: usize) {
    let (left_nfa, right_nfa) = (nfa(left), nfa(right));
    for word in words(alphabet, max_len) {
        assert_eq!(
            left_nfa.matches(&word),
            right_nfa.matches(&word),
            "{left} and {right} disagree on {word:?}"
        );
    }
}

#[test]
fn test_single_char() {
    let nfa = nfa("a");
    assert!(nfa.matches("a"));
    for word in ["", "b", "aa"] {
        assert!(!nfa.matches(word));
    }

    let (dfa, _) = dfa(&["a"]);
    assert_eq!(dfa.len(), 2);
    assert!(!dfa.state(dfa.start()).is_accepting());
    let target = dfa.next(dfa.start(), 'a').unwrap();
    assert_eq!(dfa.accept(target), Some(PatternId(0)));
}

#[test]
fn test_concatenation_is_associative() {
    same_language("(ab)c", "a(bc)", &['a', 'b', 'c'], 4);
    assert!(nfa("(ab)c").matches("abc"));
}

#[test]
fn test_kleene_closure() {
    let nfa = nfa("a*");
    for word in ["", "a", "aa", "aaaaaaa"] {
        assert!(nfa.matches(word), "{word:?}");
    }
    assert!(!nfa.matches("b"));
    assert!(!nfa.matches("ab"));
}

#[test]
fn test_union() {
    let nfa = nfa("a|b");
    assert!(nfa.matches("a"));
    assert!(nfa.matches("b"));
    for word in ["", "ab", "c"] {
        assert!(!nfa.matches(word));
    }
}

#[test]
fn test_dfa_is_deterministic() {
    let (dfa, _) = dfa(&["(a|b)*abb", "a(a|b)*", "b*"]);
    for state in dfa.states() {
        let symbols: Vec<char> = state.transitions.iter().map(|(c, _)| *c).collect();
        assert!(
            symbols.windows(2).all(|pair| pair[0] < pair[1]),
            "transitions must be unique and sorted: {symbols:?}"
        );
        for (_, target) in &state.transitions {
            assert!(target.index() < dfa.len());
        }
    }
}

#[test]
fn test_dfa_agrees_with_nfa() {
    let sources = ["(a|b)*abb", "ab*", "c(a|c)*"];
    let (dfa, patterns) = dfa(&sources);
    let alphabet = ['a', 'b', 'c'];

    for word in words(&alphabet, 5) {
        let expected = sources
            .iter()
            .position(|source| nfa(source).matches(&word))
            .map(|rank| PatternId(u32::try_from(rank).unwrap()));
        assert_eq!(dfa.run(&word), expected, "{word:?}");
    }
    assert!(patterns.iter().all(|p| !p.is_shadowed()));
}

#[test]
fn test_state_count_is_bounded() {
    for source in ["(a|b)*a(a|b)(a|b)", "(ab|ba)*", "((a|b)(c|d))*e"] {
        let nfa_len = nfa(source).len();
        let (dfa, _) = dfa(&[source]);
        assert!(dfa.len() >= 1);
        if nfa_len < 32 {
            assert!(dfa.len() <= 1 << nfa_len, "{source}: {} states", dfa.len());
        }
    }
}

#[test]
fn test_priority_tie_break() {
    let tables = Generator::new()
        .pattern("id", "_[a-z][a-z]*", "")
        .pattern("main", "_main", "")
        .build()
        .unwrap();
    let dfa = tables.dfa();

    let mut state = dfa.start();
    for c in "_main".chars() {
        state = dfa.next(state, c).unwrap();
    }
    assert_eq!(tables.pattern_for(state).unwrap().name, "id");
    assert!(tables.patterns()[1].is_shadowed());
    assert!(tables.patterns()[0].dfa_accepting_states.contains(&state));
}

#[test]
fn test_accepting_states_partition() {
    let (dfa, patterns) = dfa(&["if", "[a-z][a-z]*", "[0-9][0-9]*"]);
    let mut listed: Vec<StateId> = patterns
        .iter()
        .flat_map(|p| p.dfa_accepting_states.iter().copied())
        .collect();
    listed.sort();
    let accepting: Vec<StateId> = dfa.accepting_states().collect();
    assert_eq!(listed, accepting);

    for pattern in &patterns {
        assert!(pattern.dfa_accepting_states.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_discovery_order_is_breadth_first() {
    let (dfa, _) = dfa(&["abc"]);
    let mut state = dfa.start();
    for (expected, c) in (1..).zip("abc".chars()) {
        state = dfa.next(state, c).unwrap();
        assert_eq!(state, StateId(expected));
    }
}
