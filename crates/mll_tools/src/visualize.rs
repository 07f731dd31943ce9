//! DFA visualization utilities
//!
//! Renders generated tables in DOT/Graphviz format. Accepting states are
//! drawn as double circles labelled with the pattern they accept for, and
//! parallel edges are merged into one edge listing every symbol.

use mll::{LexerTables, StateId};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Generate a DOT/Graphviz representation of the DFA
///
/// # Example
///
/// ```rust
/// use mll::Generator;
/// use mll_tools::visualize::generate_dot;
///
/// let tables = Generator::new().pattern("ab", "ab", "").build().unwrap();
/// let dot = generate_dot(&tables);
/// assert!(dot.contains("S0 -> S1 [label=\"a\"];"));
/// ```
#[must_use]
pub fn generate_dot(tables: &LexerTables) -> String {
    let mut output = String::new();
    // Formatting into a String cannot fail
    let _ = write_dot(&mut output, tables);
    output
}

fn write_dot(output: &mut String, tables: &LexerTables) -> std::fmt::Result {
    let dfa = tables.dfa();

    writeln!(output, "digraph DFA {{")?;
    writeln!(output, "  rankdir=LR;")?;
    writeln!(output, "  node [shape=circle];")?;
    writeln!(output, "  start [shape=point];")?;
    writeln!(output, "  start -> {};", dfa.start())?;
    writeln!(output)?;

    for &state in tables.accepting() {
        let name = tables.pattern_for(state).map_or("", |p| p.name.as_str());
        writeln!(
            output,
            "  {state} [shape=doublecircle, label=\"{state}\\n{}\"];",
            escape(name)
        )?;
    }
    writeln!(output)?;

    for (idx, state) in dfa.states().iter().enumerate() {
        let from = StateId(u32::try_from(idx).map_err(|_| std::fmt::Error)?);
        let mut edges: BTreeMap<StateId, Vec<char>> = BTreeMap::new();
        for &(symbol, target) in &state.transitions {
            edges.entry(target).or_default().push(symbol);
        }
        for (target, symbols) in edges {
            let label: Vec<String> = symbols.into_iter().map(symbol_label).collect();
            writeln!(output, "  {from} -> {target} [label=\"{}\"];", label.join(", "))?;
        }
    }

    writeln!(output, "}}")
}

/// Printable form of a transition symbol, escaped for a DOT string.
fn symbol_label(c: char) -> String {
    match c {
        ' ' => "SP".to_owned(),
        '\n' => "\\\\n".to_owned(),
        '\t' => "\\\\t".to_owned(),
        '\r' => "\\\\r".to_owned(),
        c if c.is_control() => format!("\\\\x{:02x}", u32::from(c)),
        c => escape(&c.to_string()),
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mll::Generator;

    #[test]
    fn test_generate_dot() {
        let tables = Generator::new()
            .pattern("ID", "[a-c][a-c]*", "")
            .pattern("WS", " |\n", "")
            .build()
            .unwrap();
        let dot = generate_dot(&tables);

        assert!(dot.starts_with("digraph DFA {\n"));
        assert!(dot.contains("start -> S0;"));
        assert!(dot.trim_end().ends_with('}'));
        for state in tables.accepting() {
            assert!(dot.contains(&format!("  {state} [shape=doublecircle")));
        }
        assert!(dot.contains("label=\"SP\"") || dot.contains("SP, "));
        assert!(dot.contains("\\\\n"));
    }

    #[test]
    fn test_edges_are_merged() {
        let tables = Generator::new().pattern("p", "a|b|c", "").build().unwrap();
        let dot = generate_dot(&tables);
        let edges = dot.lines().filter(|line| line.contains(" -> ") && !line.contains("start")).count();
        assert_eq!(edges, 3);

        let tables = Generator::new().pattern("p", "(a|b)(a|b)*", "").build().unwrap();
        let dot = generate_dot(&tables);
        assert!(dot.contains("[label=\"a, b\"]") || dot.contains("[label=\"a\"]"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(symbol_label('"'), "\\\"");
        assert_eq!(symbol_label('\\'), "\\\\");
        assert_eq!(symbol_label('x'), "x");
    }
}
