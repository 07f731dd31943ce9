#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration for lexer generation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize), serde(default))]
pub struct GeneratorConfig {
    /// Maximum number of DFA states subset construction may discover
    pub max_dfa_states: usize,

    /// Reject patterns that match the empty string instead of warning
    pub deny_nullable_patterns: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_dfa_states: Self::DEFAULT_MAX_DFA_STATES,
            deny_nullable_patterns: false,
        }
    }
}

impl GeneratorConfig {
    pub const DEFAULT_MAX_DFA_STATES: usize = 65_536;

    #[must_use]
    pub const fn with_max_dfa_states(mut self, limit: usize) -> Self {
        self.max_dfa_states = limit;
        self
    }

    #[must_use]
    pub const fn with_deny_nullable_patterns(mut self, deny: bool) -> Self {
        self.deny_nullable_patterns = deny;
        self
    }
}
