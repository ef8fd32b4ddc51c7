#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::symbol::SymbolId;

pub type ScopeId = id_arena::Id<Scope>;

/// A lexical region in which names are declared at most once.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    /// Function and class scopes carry the declaring name.
    pub name: Option<String>,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    symbols: BTreeMap<String, SymbolId>,
}

impl Scope {
    pub fn new(name: Option<String>, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            symbols: BTreeMap::new(),
        }
    }

    pub fn defines(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    /// Declared symbols, ordered by name.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, SymbolId)> + '_ {
        self.symbols.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Returns false (and leaves the table untouched) if `name` is taken.
    pub(crate) fn insert(&mut self, name: &str, symbol: SymbolId) -> bool {
        if self.defines(name) {
            return false;
        }
        self.symbols.insert(name.to_string(), symbol);
        true
    }
}
