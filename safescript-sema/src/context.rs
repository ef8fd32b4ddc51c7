#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fmt;

use id_arena::Arena;
use safescript_ast::{Mutability, NodeId};

use crate::scope::{Scope, ScopeId};
use crate::symbol::{Symbol, SymbolId};
use crate::types::Type;

/// Annotation slots a pass can attach to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Scope a declaration was made in, or a name was resolved in.
    Scope,
    /// Scope opened by a block, function or class.
    InnerScope,
    /// Symbol a declaration created, or a name was resolved to.
    Symbol,
}

impl Key {
    pub fn as_str(self) -> &'static str {
        match self {
            Key::Scope => "scope",
            Key::InnerScope => "innerScope",
            Key::Symbol => "symbol",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation {
    Scope(ScopeId),
    Symbol(SymbolId),
}

/// State shared by the passes of one analysis session.
///
/// Owns every scope and symbol, and maps `(node, key)` pairs to annotations.
/// AST nodes themselves are never mutated.
pub struct Context {
    scopes: Arena<Scope>,
    symbols: Arena<Symbol>,
    annotations: HashMap<(NodeId, Key), Annotation>,
    builtins: ScopeId,
}

impl Context {
    /// A context whose `builtins` scope declares `console` and its
    /// `log`/`error`/`warn` members, each taking one const argument.
    pub fn new() -> Self {
        let mut scopes = Arena::new();
        let builtins = scopes.alloc(Scope::new(Some("builtins".to_string()), None));
        let mut ctx = Self {
            scopes,
            symbols: Arena::new(),
            annotations: HashMap::new(),
            builtins,
        };

        let console = ctx.declare(builtins, "console");
        ctx.symbol_mut(console).ty = Some(Type::function([Mutability::Const]));
        for method in ["log", "error", "warn"] {
            let m = ctx.member(console, method);
            ctx.symbol_mut(m).ty = Some(Type::function([Mutability::Const]));
        }
        ctx
    }

    pub fn builtins(&self) -> ScopeId {
        self.builtins
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }

    pub fn new_scope(&mut self, name: Option<String>, parent: Option<ScopeId>) -> ScopeId {
        let id = self.scopes.alloc(Scope::new(name, parent));
        if let Some(parent) = parent {
            self.scopes[parent].children.push(id);
        }
        id
    }

    /// Allocates a symbol without entering it in any scope table.
    pub fn new_symbol(&mut self, name: impl Into<String>, scope: Option<ScopeId>) -> SymbolId {
        self.symbols.alloc(Symbol::new(name, scope))
    }

    /// Declares `name` in `scope`. If the name is already taken the existing
    /// entry is kept and the returned symbol is left out of the table.
    pub fn declare(&mut self, scope: ScopeId, name: &str) -> SymbolId {
        let id = self.new_symbol(name, Some(scope));
        self.scopes[scope].insert(name, id);
        id
    }

    /// Resolves `name` from `scope` outwards through the parent chain.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, SymbolId)> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            let s = &self.scopes[id];
            if let Some(sym) = s.get(name) {
                return Some((id, sym));
            }
            cursor = s.parent;
        }
        None
    }

    /// The member symbol standing for `owner.name`, created on first access.
    pub fn member(&mut self, owner: SymbolId, name: &str) -> SymbolId {
        let existing = self.symbols[owner]
            .children
            .iter()
            .copied()
            .find(|c| self.symbols[*c].name == name);
        if let Some(id) = existing {
            return id;
        }

        let scope = self.symbols[owner].scope;
        let mut sym = Symbol::new(name, scope);
        sym.owner = Some(owner);
        let id = self.symbols.alloc(sym);
        self.symbols[owner].children.push(id);
        id
    }

    pub fn annotate(&mut self, node: NodeId, key: Key, value: Annotation) {
        self.annotations.insert((node, key), value);
    }

    pub fn get(&self, node: NodeId, key: Key) -> Option<Annotation> {
        self.annotations.get(&(node, key)).copied()
    }

    pub fn set_scope(&mut self, node: NodeId, scope: ScopeId) {
        self.annotate(node, Key::Scope, Annotation::Scope(scope));
    }

    pub fn set_inner_scope(&mut self, node: NodeId, scope: ScopeId) {
        self.annotate(node, Key::InnerScope, Annotation::Scope(scope));
    }

    pub fn set_symbol(&mut self, node: NodeId, symbol: SymbolId) {
        self.annotate(node, Key::Symbol, Annotation::Symbol(symbol));
    }

    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.scope_at(node, Key::Scope)
    }

    pub fn inner_scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.scope_at(node, Key::InnerScope)
    }

    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        match self.get(node, Key::Symbol) {
            Some(Annotation::Symbol(id)) => Some(id),
            _ => None,
        }
    }

    fn scope_at(&self, node: NodeId, key: Key) -> Option<ScopeId> {
        match self.get(node, key) {
            Some(Annotation::Scope(id)) => Some(id),
            _ => None,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("scopes", &self.scopes.len())
            .field("symbols", &self.symbols.len())
            .field("annotations", &self.annotations.len())
            .finish()
    }
}
