#![forbid(unsafe_code)]

//! Pass 4: the permission/location model behind reference bindings.
//!
//! Every symbol that owns or aliases storage is bound to an abstract
//! [`Location`]. Copy bindings allocate locations, reference bindings alias
//! them. Both symbols and locations hold a [`Permissions`] set, and a borrow
//! narrows the location to the single permission it requested until the
//! borrowing symbol goes out of scope.

use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;
use safescript_ast::visit::{self, Visit};
use safescript_ast::{
    Argument, Assignment, Binding, BindingOp, Block, ClassDecl, Expr, ExprKind, NodeId, ParamDecl,
    Span, VarDecl,
};
use tracing::{trace, trace_span};

use crate::context::Context;
use crate::error::{SemanticError, StructuralError};
use crate::pass::{Pass, expect_inner_scope, expect_symbol};
use crate::scope::ScopeId;
use crate::symbol::SymbolId;
use crate::types::{GroundType, Type};

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Permissions: u8 {
        const READ_ONLY = 0x1;
        const READ_WRITE = 0x2;
    }
}

/// A single access mode, as requested by one borrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    ReadOnly,
    ReadWrite,
}

impl Permission {
    pub fn dual(self) -> Self {
        match self {
            Permission::ReadOnly => Permission::ReadWrite,
            Permission::ReadWrite => Permission::ReadOnly,
        }
    }

    fn requested_by(mutable: bool) -> Self {
        if mutable {
            Permission::ReadWrite
        } else {
            Permission::ReadOnly
        }
    }
}

impl From<Permission> for Permissions {
    fn from(p: Permission) -> Self {
        match p {
            Permission::ReadOnly => Permissions::READ_ONLY,
            Permission::ReadWrite => Permissions::READ_WRITE,
        }
    }
}

/// An abstract storage cell. Only its identity matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(u32);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

#[derive(Debug, Default)]
struct LocationAllocator {
    next: u32,
}

impl LocationAllocator {
    fn alloc(&mut self) -> Location {
        let loc = Location(self.next);
        self.next += 1;
        loc
    }
}

/// Anything a permission set can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Holder {
    Symbol(SymbolId),
    Location(Location),
}

/// Bindings and permissions live during one run of the checker.
#[derive(Debug, Default)]
pub struct BorrowState {
    locations: LocationAllocator,
    binding: HashMap<SymbolId, Location>,
    permissions: HashMap<Holder, Permissions>,
    /// Types picked up from initializers and assignments. They shadow the
    /// signatures in the context without overwriting them.
    types: HashMap<SymbolId, Option<Type>>,
}

impl BorrowState {
    pub fn location_of(&self, symbol: SymbolId) -> Option<Location> {
        self.binding.get(&symbol).copied()
    }

    pub fn permissions(&self, holder: Holder) -> Option<Permissions> {
        self.permissions.get(&holder).copied()
    }

    /// Symbols currently bound to `location`.
    pub fn references(&self, location: Location) -> impl Iterator<Item = SymbolId> + '_ {
        self.binding
            .iter()
            .filter(move |(_, loc)| **loc == location)
            .map(|(sym, _)| *sym)
    }

    /// The type a symbol had when the run ended, if a binding changed it.
    pub fn propagated_type(&self, symbol: SymbolId) -> Option<Option<&Type>> {
        self.types.get(&symbol).map(Option::as_ref)
    }

    /// True once every symbol and location has been released.
    pub fn is_quiescent(&self) -> bool {
        self.binding.is_empty() && self.permissions.is_empty()
    }
}

/// Checks every binding and by-reference call argument against the
/// aliasing discipline.
#[derive(Debug, Default)]
pub struct BorrowChecker {
    state: BorrowState,
}

impl BorrowChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// State left by the last run.
    pub fn state(&self) -> &BorrowState {
        &self.state
    }
}

impl Pass for BorrowChecker {
    fn name(&self) -> &'static str {
        "borrow checking"
    }

    fn run(
        &mut self,
        module: &Block,
        ctx: &mut Context,
    ) -> Result<Vec<SemanticError>, StructuralError> {
        self.state = BorrowState::default();
        let mut walker = Checker {
            ctx,
            state: &mut self.state,
            errors: Vec::new(),
        };
        walker.visit_block(module)?;
        Ok(walker.errors)
    }
}

struct Checker<'c> {
    ctx: &'c mut Context,
    state: &'c mut BorrowState,
    errors: Vec<SemanticError>,
}

impl Checker<'_> {
    /// The symbol's own permissions. Members without their own entry use
    /// their owner's.
    fn perm_of(&self, symbol: SymbolId) -> Permissions {
        match self.state.permissions(Holder::Symbol(symbol)) {
            Some(p) => p,
            None => match self.ctx.symbol(symbol).owner {
                Some(owner) => self.perm_of(owner),
                None => Permissions::empty(),
            },
        }
    }

    /// What the symbol may actually do through its binding. A member never
    /// exceeds what its owner may do, even once it has a location of its own.
    fn effective(&self, symbol: SymbolId) -> Permissions {
        let own = self.perm_of(symbol);
        let here = match self
            .state
            .location_of(symbol)
            .and_then(|loc| self.state.permissions(Holder::Location(loc)))
        {
            Some(held) => own.intersection(held),
            None => own,
        };
        match self.ctx.symbol(symbol).owner {
            Some(owner) => here.intersection(self.effective(owner)),
            None => here,
        }
    }

    /// Type as seen at this point of the walk.
    fn type_of(&self, symbol: SymbolId) -> Option<&Type> {
        match self.state.types.get(&symbol) {
            Some(ty) => ty.as_ref(),
            None => self.ctx.symbol(symbol).ty.as_ref(),
        }
    }

    /// Whether `symbol` is the entry its declaring scope keeps under `name`.
    /// Duplicates are not, and are never bound.
    fn is_declared(&self, node: NodeId, name: &str, symbol: SymbolId) -> bool {
        self.ctx
            .scope_of(node)
            .is_some_and(|scope| self.ctx.scope(scope).get(name) == Some(symbol))
    }

    /// Location the symbol refers to, going through owners for members.
    fn resolve_location(&self, symbol: SymbolId) -> Option<Location> {
        self.state.location_of(symbol).or_else(|| {
            self.ctx
                .symbol(symbol)
                .owner
                .and_then(|owner| self.resolve_location(owner))
        })
    }

    fn copy_bind(&mut self, lvalue: SymbolId, span: Span) -> Result<(), SemanticError> {
        let bound = self.state.location_of(lvalue).is_some();
        let member = self.ctx.symbol(lvalue).owner.is_some();
        if (bound || member) && !self.effective(lvalue).contains(Permissions::READ_WRITE) {
            return Err(SemanticError::borrow("cannot mutate immutable object", span));
        }
        if !bound {
            let loc = self.state.locations.alloc();
            let held = self.perm_of(lvalue);
            trace!(symbol = %self.ctx.symbol(lvalue).name, %loc, ?held, "copy binding");
            self.state.binding.insert(lvalue, loc);
            self.state.permissions.insert(Holder::Location(loc), held);
        }
        Ok(())
    }

    fn ref_bind(
        &mut self,
        lvalue: SymbolId,
        source: &Expr,
        requested: Permission,
        span: Span,
    ) -> Result<(), SemanticError> {
        let Some(source_sym) = self.ctx.symbol_of(source.id) else {
            return Err(SemanticError::NonReferenceableExpression {
                span: Some(source.span),
            });
        };
        let Some(loc) = self.resolve_location(source_sym) else {
            return Err(SemanticError::ReferenceError {
                name: self.ctx.symbol(source_sym).name.clone(),
                span: Some(span),
            });
        };

        // One alias holding the dual permission is tolerated; that alias is
        // usually the source itself.
        let dual = Permissions::from(requested.dual());
        let incompatible = self
            .state
            .references(loc)
            .filter(|sym| *sym != lvalue)
            .filter(|sym| self.perm_of(*sym).contains(dual))
            .count();
        if incompatible > 1 {
            return Err(SemanticError::borrow("incompatible borrow", span));
        }

        if requested == Permission::ReadWrite
            && !self.effective(source_sym).contains(Permissions::READ_WRITE)
        {
            return Err(SemanticError::borrow(
                "cannot borrow immutable object as mutable",
                span,
            ));
        }

        if let Some(previous) = self.state.location_of(lvalue) {
            if previous != loc {
                self.restore(previous, lvalue);
            }
        }

        trace!(
            symbol = %self.ctx.symbol(lvalue).name,
            %loc,
            ?requested,
            "reference binding"
        );
        self.state.binding.insert(lvalue, loc);
        self.state
            .permissions
            .insert(Holder::Symbol(lvalue), requested.into());
        self.state
            .permissions
            .insert(Holder::Location(loc), requested.into());
        Ok(())
    }

    /// Recomputes what `loc` still guarantees once `leaving` stops
    /// referring to it. A location nobody refers to is dropped.
    fn restore(&mut self, loc: Location, leaving: SymbolId) {
        let remaining: Vec<SymbolId> = self
            .state
            .references(loc)
            .filter(|sym| *sym != leaving)
            .collect();
        if remaining.is_empty() {
            self.state.permissions.remove(&Holder::Location(loc));
            return;
        }
        let held = remaining
            .iter()
            .fold(Permissions::all(), |acc, sym| acc.intersection(self.perm_of(*sym)));
        self.state.permissions.insert(Holder::Location(loc), held);
    }

    fn release(&mut self, symbol: SymbolId) {
        let children = self.ctx.symbol(symbol).children.clone();
        for child in children {
            self.release(child);
        }
        if let Some(loc) = self.state.location_of(symbol) {
            self.restore(loc, symbol);
            self.state.binding.remove(&symbol);
        }
        self.state.permissions.remove(&Holder::Symbol(symbol));
    }

    fn release_scope(&mut self, scope: ScopeId) {
        let symbols: Vec<SymbolId> = self.ctx.scope(scope).symbols().map(|(_, s)| s).collect();
        for symbol in symbols {
            self.release(symbol);
        }
    }

    /// The declared symbol takes the type of the symbol its value names.
    fn propagate_type(&mut self, target: SymbolId, value: &Expr) {
        let ty = self
            .ctx
            .symbol_of(value.id)
            .and_then(|source| self.type_of(source).cloned());
        self.state.types.insert(target, ty);
    }

    /// Initializer of a variable or default value of a parameter.
    fn bind_initial(
        &mut self,
        symbol: SymbolId,
        binding: &Binding,
        requested: Permission,
        span: Span,
    ) -> Result<(), StructuralError> {
        self.visit_expr(&binding.value)?;
        self.propagate_type(symbol, &binding.value);
        let outcome = match binding.op {
            BindingOp::Copy => self.copy_bind(symbol, span),
            BindingOp::Borrow => self.ref_bind(symbol, &binding.value, requested, span),
        };
        if let Err(err) = outcome {
            self.errors.push(err);
        }
        Ok(())
    }

    fn check_call(
        &mut self,
        call: &Expr,
        callee: &Expr,
        args: &[Argument],
    ) -> Result<(), StructuralError> {
        self.visit_expr(callee)?;

        let Some(symbol) = self.ctx.symbol_of(callee.id) else {
            let reason = match callee_name(callee) {
                Some(name) => format!("cannot find the type of `{name}`"),
                None => "cannot find the type of the callee".to_string(),
            };
            self.errors.push(SemanticError::type_error(reason, call.span));
            return Ok(());
        };
        let domain = match self.type_of(symbol) {
            Some(Type::Function(f)) => f.domain.clone(),
            other => {
                let shown = match other {
                    Some(ty) => ty.to_string(),
                    None => GroundType::Undefined.to_string(),
                };
                self.errors.push(SemanticError::type_error(
                    format!("{shown} is not a function type"),
                    call.span,
                ));
                return Ok(());
            }
        };
        if domain.len() != args.len() {
            self.errors.push(SemanticError::type_error(
                format!(
                    "invalid number of parameters, expected {}, got {}",
                    domain.len(),
                    args.len()
                ),
                call.span,
            ));
            return Ok(());
        }

        let mut transients = Vec::with_capacity(domain.len());
        for qualifier in &domain {
            let requested = Permission::requested_by(qualifier.is_mutable());
            let param = self.ctx.new_symbol("?", None);
            self.state
                .permissions
                .insert(Holder::Symbol(param), requested.into());
            transients.push((param, requested));
        }

        for (arg, (param, requested)) in args.iter().zip(&transients) {
            self.visit_argument(arg)?;
            if !arg.by_ref {
                continue;
            }
            if let Err(err) = self.ref_bind(*param, &arg.value, *requested, arg.span) {
                self.errors.push(err);
                break;
            }
        }

        for (param, _) in transients {
            self.release(param);
        }
        Ok(())
    }
}

fn callee_name(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Ident(name) => Some(name.node.clone()),
        ExprKind::Dot { owner, attribute } => {
            callee_name(owner).map(|owner| format!("{owner}.{}", attribute.node))
        }
        ExprKind::Paren(inner) => callee_name(inner),
        _ => None,
    }
}

impl Visit for Checker<'_> {
    type Error = StructuralError;

    fn visit_block(&mut self, block: &Block) -> Result<(), StructuralError> {
        let scope = expect_inner_scope(self.ctx, block.id, block.span)?;
        visit::walk_block(self, block)?;
        self.release_scope(scope);
        Ok(())
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) -> Result<(), StructuralError> {
        let scope = expect_inner_scope(self.ctx, decl.id, decl.span)?;
        visit::walk_class_decl(self, decl)?;
        self.release_scope(scope);
        Ok(())
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<(), StructuralError> {
        let symbol = expect_symbol(self.ctx, decl.id, decl.span)?;
        if !self.is_declared(decl.id, &decl.name.node, symbol) {
            trace!(name = %decl.name.node, "skipping duplicate declaration");
            return match &decl.init {
                Some(init) => self.visit_expr(&init.value),
                None => Ok(()),
            };
        }
        let mutable = decl.mutability.is_mutable();
        let ceiling = if mutable {
            Permissions::all()
        } else {
            Permissions::READ_ONLY
        };
        self.state.permissions.insert(Holder::Symbol(symbol), ceiling);

        match &decl.init {
            Some(init) => {
                let _span = trace_span!("initializer", name = %decl.name.node).entered();
                self.bind_initial(symbol, init, Permission::requested_by(mutable), decl.span)
            }
            None => Ok(()),
        }
    }

    fn visit_param(&mut self, param: &ParamDecl) -> Result<(), StructuralError> {
        let symbol = expect_symbol(self.ctx, param.id, param.span)?;
        if !self.is_declared(param.id, &param.name.node, symbol) {
            return match &param.default {
                Some(default) => self.visit_expr(&default.value),
                None => Ok(()),
            };
        }
        let requested = Permission::requested_by(param.mutability.is_mutable());
        self.state
            .permissions
            .insert(Holder::Symbol(symbol), requested.into());

        match &param.default {
            Some(default) => self.bind_initial(symbol, default, requested, param.span),
            None => {
                let loc = self.state.locations.alloc();
                self.state.binding.insert(symbol, loc);
                self.state
                    .permissions
                    .insert(Holder::Location(loc), requested.into());
                Ok(())
            }
        }
    }

    fn visit_assignment(&mut self, assign: &Assignment) -> Result<(), StructuralError> {
        let Some(dest) = self.ctx.symbol_of(assign.lvalue.id) else {
            self.errors.push(SemanticError::NonReferenceableExpression {
                span: Some(assign.lvalue.span),
            });
            return self.visit_expr(&assign.rvalue);
        };

        self.visit_expr(&assign.rvalue)?;
        self.propagate_type(dest, &assign.rvalue);
        let outcome = match assign.op {
            BindingOp::Copy => self.copy_bind(dest, assign.span),
            BindingOp::Borrow => {
                let mutable = self.perm_of(dest).contains(Permissions::READ_WRITE);
                let requested = Permission::requested_by(mutable);
                self.ref_bind(dest, &assign.rvalue, requested, assign.span)
            }
        };
        if let Err(err) = outcome {
            self.errors.push(err);
        }
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), StructuralError> {
        match &expr.kind {
            ExprKind::Call { callee, args } => self.check_call(expr, callee, args),
            _ => visit::walk_expr(self, expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::ScopeBinder;
    use crate::extract::SymbolsExtractor;
    use crate::type_creator::TypeCreator;

    fn check(src: &str) -> (BorrowChecker, Vec<SemanticError>) {
        let module = safescript_parse::parse_source(src).expect("parse");
        let mut ctx = Context::new();
        let mut passes: Vec<Box<dyn Pass>> = vec![
            Box::new(SymbolsExtractor::new()),
            Box::new(ScopeBinder::new()),
            Box::new(TypeCreator::new()),
        ];
        for pass in &mut passes {
            let errors = pass.run(&module, &mut ctx).unwrap();
            assert!(errors.is_empty(), "{} errors: {errors:?}", pass.name());
        }
        let mut checker = BorrowChecker::new();
        let errors = checker.run(&module, &mut ctx).unwrap();
        (checker, errors)
    }

    #[test]
    fn dual_swaps_permissions() {
        assert_eq!(Permission::ReadOnly.dual(), Permission::ReadWrite);
        assert_eq!(Permission::ReadWrite.dual(), Permission::ReadOnly);
        assert_eq!(
            Permissions::from(Permission::ReadOnly) | Permissions::from(Permission::ReadWrite),
            Permissions::all()
        );
    }

    #[test]
    fn locations_are_numbered_per_allocator() {
        let mut alloc = LocationAllocator::default();
        assert_eq!(alloc.alloc(), Location(0));
        assert_eq!(alloc.alloc().to_string(), "l1");
    }

    #[test]
    fn module_exit_releases_everything() {
        let (checker, errors) = check("let x: mutable = 0\nlet y: mutable &- x\n");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(checker.state().is_quiescent());
    }

    #[test]
    fn frozen_location_is_restored_when_the_borrow_ends() {
        let src = "let x: mutable = 0\n{\n    let y: const &- x\n    x = 1\n}\nx = 2\n";
        let (_, errors) = check(src);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(
            errors[0].to_string(),
            "borrow error: cannot mutate immutable object"
        );
    }

    #[test]
    fn const_cannot_be_reassigned() {
        let (_, errors) = check("let x = 0\nx = 1\n");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SemanticError::BorrowError { .. }));
    }

    #[test]
    fn borrowing_an_unbound_symbol_is_a_reference_error() {
        let (_, errors) = check("let x: mutable\nlet y &- x\n");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            SemanticError::ReferenceError { name, .. } if name == "x"
        ));
    }

    #[test]
    fn literal_cannot_be_borrowed() {
        let (_, errors) = check("let y &- 1\n");
        assert!(matches!(
            errors.as_slice(),
            [SemanticError::NonReferenceableExpression { .. }]
        ));
    }

    #[test]
    fn member_of_mutable_object_can_be_assigned() {
        let (_, errors) = check("let o: mutable = { k: 1 }\no.k = 2\n");
        assert!(errors.is_empty(), "{errors:?}");

        let (_, errors) = check("let o = { k: 1 }\no.k = 2\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn member_is_frozen_with_its_owner() {
        let (_, errors) = check("let o: mutable = { k: 1 }\nlet view &- o\no.k = 3\n");
        assert_eq!(errors.len(), 1, "{errors:?}");

        // A member that already has its own location is frozen all the same.
        let (checker, errors) =
            check("let o: mutable = { k: 1 }\no.k = 2\nlet view &- o\no.k = 3\n");
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(
            errors[0].to_string(),
            "borrow error: cannot mutate immutable object"
        );
        assert!(checker.state().is_quiescent());
    }

    #[test]
    fn member_is_writable_again_after_the_borrow_ends() {
        let src = "let o: mutable = { k: 1 }\no.k = 2\n{\n    let view &- o\n}\no.k = 3\n";
        let (_, errors) = check(src);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn assigned_types_do_not_outlive_the_run() {
        let module = safescript_parse::parse_source("function f() {}\nf()\nf = 0\n").unwrap();
        let mut ctx = Context::new();
        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(SymbolsExtractor::new()),
            Box::new(ScopeBinder::new()),
            Box::new(TypeCreator::new()),
        ];
        for mut pass in passes {
            assert!(pass.run(&module, &mut ctx).unwrap().is_empty());
        }
        let f = ctx.scope(ctx.inner_scope_of(module.id).unwrap()).get("f").unwrap();

        let mut checker = BorrowChecker::new();
        let first = checker.run(&module, &mut ctx).unwrap();
        assert_eq!(checker.state().propagated_type(f), Some(None));
        let second = checker.run(&module, &mut ctx).unwrap();
        assert!(first.is_empty(), "{first:?}");
        assert_eq!(first, second);
        assert_eq!(ctx.symbol(f).ty, Some(Type::function(Vec::new())));
    }

    #[test]
    fn assigned_function_keeps_its_signature() {
        let (_, errors) = check("function f(a: mutable) {}\nlet g = f\nlet x: mutable = 1\ng(&x)\n");
        assert!(errors.is_empty(), "{errors:?}");

        let (_, errors) = check("function f() {}\nlet g: mutable = f\ng = 0\ng()\n");
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(
            errors[0].to_string(),
            "type error: undefined is not a function type"
        );
    }

    #[test]
    fn duplicate_declarations_are_never_bound() {
        let module = safescript_parse::parse_source("let a = 1\nlet a = 2\n").unwrap();
        let mut ctx = Context::new();
        let duplicates = SymbolsExtractor::new().run(&module, &mut ctx).unwrap();
        assert_eq!(duplicates.len(), 1);
        assert!(ScopeBinder::new().run(&module, &mut ctx).unwrap().is_empty());
        assert!(TypeCreator::new().run(&module, &mut ctx).unwrap().is_empty());

        let mut checker = BorrowChecker::new();
        let errors = checker.run(&module, &mut ctx).unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert!(checker.state().is_quiescent());
    }

    #[test]
    fn parameters_without_defaults_are_bound() {
        let (_, errors) = check("function f(a: mutable) {\n    let b: mutable &- a\n}\n");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn builtin_call_accepts_const_reference() {
        let (checker, errors) = check("let x = 1\nconsole.log(&x)\n");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(checker.state().is_quiescent());
    }
}
