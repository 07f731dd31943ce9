//! # Language Samples
//!
//! Bounded enumeration of the words a regex tree accepts.
//!
//! ## Usage
//!
//! ```rust
//! use mll::regex::{compile, MacroTable};
//! use mll::testing::{sample_words, SampleConfig};
//!
//! let ast = compile("a(b|c)*", &MacroTable::new()).unwrap();
//! let words = sample_words(&ast, &SampleConfig::default());
//! assert!(words.contains("a"));
//! assert!(words.contains("abcb"));
//! ```

use crate::regex::{Ast, Node};
use std::collections::BTreeSet;

/// Bounds for language sampling
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Maximum number of iterations unrolled for each Kleene closure
    pub max_repetitions: usize,
    /// Maximum number of words kept per subtree
    pub max_words: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            max_repetitions: 4,
            max_words: 256,
        }
    }
}

/// Words of `ast`'s language, up to the bounds in `config`.
///
/// Every returned word is in the language. The error sentinel has an empty
/// language.
#[must_use]
pub fn sample_words(ast: &Ast, config: &SampleConfig) -> BTreeSet<String> {
    ast.fold(|node: Node<BTreeSet<String>>| {
        let words = match node {
            Node::Error => BTreeSet::new(),
            Node::Char(c) => BTreeSet::from([c.to_string()]),
            Node::Union(mut left, right) => {
                left.extend(right);
                left
            }
            Node::Concat(left, right) => product(&left, &right, config.max_words),
            Node::Kleene(once) => {
                let mut words = BTreeSet::from([String::new()]);
                let mut layer = words.clone();
                for _ in 0..config.max_repetitions {
                    layer = product(&layer, &once, config.max_words);
                    if layer.is_empty() {
                        break;
                    }
                    words.extend(layer.iter().cloned());
                }
                words
            }
        };
        truncate(words, config.max_words)
    })
}

/// Drop the longest words until at most `limit` remain; the shortest words
/// are the most useful to keep.
fn truncate(mut words: BTreeSet<String>, limit: usize) -> BTreeSet<String> {
    while words.len() > limit {
        let Some(longest) = words.iter().max_by_key(|w| w.len()).cloned() else {
            break;
        };
        words.remove(&longest);
    }
    words
}

fn product(prefixes: &BTreeSet<String>, suffixes: &BTreeSet<String>, limit: usize) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for prefix in prefixes {
        for suffix in suffixes {
            if out.len() >= limit {
                return out;
            }
            out.insert(format!("{prefix}{suffix}"));
        }
    }
    out
}
