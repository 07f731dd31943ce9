use super::ast::Ast;
use compact_str::CompactString;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

/// Named sub-patterns available to `{name}` references.
///
/// Populated by a pass over the macro definitions before any pattern is
/// parsed; a macro may only reference macros defined before it.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    entries: HashMap<CompactString, Ast>,
}

impl MacroTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Returns `false`, leaving the table unchanged, if the
    /// name is already defined.
    pub fn define(&mut self, name: impl Into<CompactString>, ast: Ast) -> bool {
        match self.entries.entry(name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ast);
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Ast> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut table = MacroTable::new();
        assert!(table.is_empty());
        assert!(table.define("a", Ast::Char('a')));
        assert_eq!(table.get("a"), Some(&Ast::Char('a')));
        assert!(table.contains("a"));
        assert_eq!(table.get("b"), None);
    }

    #[test]
    fn test_redefinition_is_rejected() {
        let mut table = MacroTable::new();
        assert!(table.define("a", Ast::Char('a')));
        assert!(!table.define("a", Ast::Char('b')));
        assert_eq!(table.get("a"), Some(&Ast::Char('a')));
        assert_eq!(table.len(), 1);
    }
}
