//! # Generation Pipeline
//!
//! [`Generator`] collects macro and pattern declarations and runs them
//! through the regex front end, Thompson construction and subset
//! construction, producing [`LexerTables`].
//!
//! Macros are processed first, in declaration order, so a macro may only
//! reference macros declared before it. Patterns are ranked by declaration
//! order; when two patterns accept the same lexeme the earlier one wins.
//!
//! ```rust
//! use mll::Generator;
//! use mll::automata::PatternId;
//!
//! let tables = Generator::new()
//!     .define("digit", "[0-9]")
//!     .pattern("num", "{digit}{digit}*", "")
//!     .pattern("ws", " ", "")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tables.dfa().run("42"), Some(PatternId(0)));
//! assert_eq!(tables.dfa().run(" "), Some(PatternId(1)));
//! assert_eq!(tables.dfa().run("4 "), None);
//! ```

use crate::automata::{Dfa, PatternId, StateId, nfa, subset};
use crate::config::GeneratorConfig;
use crate::error::{GenerateError, GenerateErrorKind};
use crate::pattern::PatternDescriptor;
use crate::regex::{MacroTable, compile};
use compact_str::CompactString;
use hashbrown::HashSet;
use std::collections::BTreeSet;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A named sub-pattern, referenced from other regexes as `{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDecl {
    pub name: CompactString,
    pub regex: String,
    /// 1-based source line, 0 when not read from a file
    pub line: usize,
}

/// A pattern with the action code to run when it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDecl {
    pub name: CompactString,
    pub regex: String,
    pub action: String,
    /// 1-based source line, 0 when not read from a file
    pub line: usize,
}

/// Builder for [`LexerTables`].
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
    macros: Vec<MacroDecl>,
    patterns: Vec<PatternDecl>,
}

impl Generator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[must_use]
    pub fn define(self, name: impl Into<CompactString>, regex: impl Into<String>) -> Self {
        self.define_at(0, name, regex)
    }

    /// Declare a macro read from `line` of a source file.
    #[must_use]
    pub fn define_at(mut self, line: usize, name: impl Into<CompactString>, regex: impl Into<String>) -> Self {
        self.macros.push(MacroDecl {
            name: name.into(),
            regex: regex.into(),
            line,
        });
        self
    }

    #[must_use]
    pub fn pattern(
        self,
        name: impl Into<CompactString>,
        regex: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        self.pattern_at(0, name, regex, action)
    }

    /// Declare a pattern read from `line` of a source file.
    #[must_use]
    pub fn pattern_at(
        mut self,
        line: usize,
        name: impl Into<CompactString>,
        regex: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        self.patterns.push(PatternDecl {
            name: name.into(),
            regex: regex.into(),
            action: action.into(),
            line,
        });
        self
    }

    #[must_use]
    pub fn macros(&self) -> &[MacroDecl] {
        &self.macros
    }

    #[must_use]
    pub fn patterns(&self) -> &[PatternDecl] {
        &self.patterns
    }

    /// Resolve every macro declaration into a table, in declaration order.
    ///
    /// # Errors
    ///
    /// Fails on the first macro that does not compile, references an
    /// undefined macro, or reuses a name.
    pub fn macro_table(&self) -> Result<MacroTable, GenerateError> {
        let mut table = MacroTable::new();
        for decl in &self.macros {
            let fail = |kind: GenerateErrorKind| GenerateError::new(decl.line, decl.name.clone(), kind);
            if table.contains(&decl.name) {
                return Err(fail(GenerateErrorKind::DuplicateMacro));
            }
            let ast = compile(&decl.regex, &table).map_err(fail)?;
            table.define(decl.name.clone(), ast);
        }
        log::debug!("resolved {} macros", table.len());
        Ok(table)
    }

    /// Compile every pattern into its descriptor, without combining them.
    ///
    /// # Errors
    ///
    /// See [`Generator::build`].
    pub fn descriptors(&self, macros: &MacroTable) -> Result<Vec<PatternDescriptor>, GenerateError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.patterns.len());
        let mut descriptors = Vec::with_capacity(self.patterns.len());

        for (rank, decl) in self.patterns.iter().enumerate() {
            let fail = |kind: GenerateErrorKind| GenerateError::new(decl.line, decl.name.clone(), kind);
            if !seen.insert(decl.name.as_str()) {
                return Err(fail(GenerateErrorKind::DuplicatePattern));
            }

            let ast = compile(&decl.regex, macros).map_err(fail)?;
            if ast.is_nullable() {
                if self.config.deny_nullable_patterns {
                    return Err(fail(GenerateErrorKind::NullablePattern));
                }
                log::warn!(
                    "pattern '{}' (line {}) matches the empty string",
                    decl.name,
                    decl.line
                );
            }

            let nfa = nfa::build(&ast).map_err(|err| fail(err.into()))?;
            log::debug!("pattern '{}': {} NFA states", decl.name, nfa.len());

            let id = PatternId(u32::try_from(rank).unwrap_or(u32::MAX));
            descriptors.push(
                PatternDescriptor::new(id, decl.name.clone(), decl.action.clone(), nfa)
                    .with_line(decl.line),
            );
        }

        Ok(descriptors)
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first failure, tagged with the offending declaration's
    /// line and name. Failures not tied to a declaration, such as an empty
    /// pattern list or too many DFA states, carry line 0 and no name.
    pub fn build(&self) -> Result<LexerTables, GenerateError> {
        let macros = self.macro_table()?;
        let mut patterns = self.descriptors(&macros)?;
        if patterns.is_empty() {
            return Err(GenerateError::global(GenerateErrorKind::NoPatterns));
        }

        let combined = nfa::combine(&mut patterns);
        let dfa = subset::construct(&combined, &mut patterns, &self.config).map_err(GenerateError::global)?;

        for pattern in patterns.iter().filter(|p| p.is_shadowed()) {
            log::warn!(
                "pattern '{}' (line {}) is shadowed by earlier patterns and never matches",
                pattern.name,
                pattern.line
            );
        }

        let accepting = dfa.accepting_states().collect();
        Ok(LexerTables {
            dfa,
            accepting,
            patterns,
        })
    }
}

/// Output of a generation run: the DFA, its accepting states and the pattern
/// descriptors in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LexerTables {
    dfa: Dfa,
    accepting: BTreeSet<StateId>,
    patterns: Vec<PatternDescriptor>,
}

impl LexerTables {
    #[must_use]
    pub const fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    #[must_use]
    pub const fn accepting(&self) -> &BTreeSet<StateId> {
        &self.accepting
    }

    #[must_use]
    pub fn patterns(&self) -> &[PatternDescriptor] {
        &self.patterns
    }

    #[must_use]
    pub fn pattern(&self, id: PatternId) -> Option<&PatternDescriptor> {
        self.patterns.get(id.index())
    }

    /// The pattern recognized in `state`, if it is accepting.
    #[must_use]
    pub fn pattern_for(&self, state: StateId) -> Option<&PatternDescriptor> {
        self.pattern(self.dfa.accept(state)?)
    }

    #[must_use]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(&state)
    }
}
