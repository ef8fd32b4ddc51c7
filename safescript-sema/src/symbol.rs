#![forbid(unsafe_code)]

use crate::scope::ScopeId;
use crate::types::Type;

pub type SymbolId = id_arena::Id<Symbol>;

/// A named declaration handle. Identity is the arena id, never the name.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    /// Declaring scope. Transient call parameters have none.
    pub scope: Option<ScopeId>,
    /// May change between passes as bindings are checked.
    pub ty: Option<Type>,
    /// Member symbols created for `owner.attr` accesses, one per attribute name.
    pub children: Vec<SymbolId>,
    /// Set on member symbols.
    pub owner: Option<SymbolId>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, scope: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            scope,
            ty: None,
            children: Vec::new(),
            owner: None,
        }
    }
}
