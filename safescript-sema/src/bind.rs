#![forbid(unsafe_code)]

use std::collections::HashMap;

use safescript_ast::visit::{self, Visit};
use safescript_ast::{Block, ClassDecl, Expr, ExprKind, FunDecl, ParamDecl, VarDecl};
use tracing::trace;

use crate::context::Context;
use crate::error::{SemanticError, StructuralError};
use crate::pass::{Pass, expect_inner_scope};
use crate::scope::ScopeId;
use crate::symbol::SymbolId;

/// Pass 2: resolves every name to the declaration pass 1 recorded for it.
///
/// Scopes are taken from the `innerScope` annotations and never rebuilt. A
/// name read inside its own initializer (`let x = x`) refers to an outer
/// declaration, if there is one.
#[derive(Debug, Default)]
pub struct ScopeBinder;

impl ScopeBinder {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for ScopeBinder {
    fn name(&self) -> &'static str {
        "scope binding"
    }

    fn run(
        &mut self,
        module: &Block,
        ctx: &mut Context,
    ) -> Result<Vec<SemanticError>, StructuralError> {
        let builtins = ctx.builtins();
        let mut walker = Binder {
            ctx,
            scopes: vec![builtins],
            under_declaration: HashMap::new(),
            errors: Vec::new(),
        };
        walker.visit_block(module)?;
        Ok(walker.errors)
    }
}

struct Binder<'c> {
    ctx: &'c mut Context,
    scopes: Vec<ScopeId>,
    /// Name whose initializer is being visited, per declaring scope.
    under_declaration: HashMap<ScopeId, String>,
    errors: Vec<SemanticError>,
}

impl Binder<'_> {
    fn current(&self) -> ScopeId {
        self.scopes
            .last()
            .copied()
            .unwrap_or_else(|| self.ctx.builtins())
    }

    fn resolve(&self, name: &str) -> Option<(ScopeId, SymbolId)> {
        let mut cursor = Some(self.current());
        while let Some(id) = cursor {
            let scope = self.ctx.scope(id);
            let shadowed_by_self = self
                .under_declaration
                .get(&id)
                .is_some_and(|declaring| declaring == name);
            if !shadowed_by_self {
                if let Some(sym) = scope.get(name) {
                    return Some((id, sym));
                }
            }
            cursor = scope.parent;
        }
        None
    }

    fn with_scope<F>(&mut self, scope: ScopeId, f: F) -> Result<(), StructuralError>
    where
        F: FnOnce(&mut Self) -> Result<(), StructuralError>,
    {
        self.scopes.push(scope);
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Runs `f` with `name` marked as under declaration in the current scope.
    fn declaring<F>(&mut self, name: &str, f: F) -> Result<(), StructuralError>
    where
        F: FnOnce(&mut Self) -> Result<(), StructuralError>,
    {
        let scope = self.current();
        let previous = self.under_declaration.insert(scope, name.to_string());
        let result = f(self);
        match previous {
            Some(prev) => self.under_declaration.insert(scope, prev),
            None => self.under_declaration.remove(&scope),
        };
        result
    }
}

impl Visit for Binder<'_> {
    type Error = StructuralError;

    fn visit_block(&mut self, block: &Block) -> Result<(), StructuralError> {
        let scope = expect_inner_scope(self.ctx, block.id, block.span)?;
        self.with_scope(scope, |this| visit::walk_block(this, block))
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<(), StructuralError> {
        self.declaring(&decl.name.node, |this| visit::walk_var_decl(this, decl))
    }

    fn visit_param(&mut self, param: &ParamDecl) -> Result<(), StructuralError> {
        self.declaring(&param.name.node, |this| visit::walk_param(this, param))
    }

    fn visit_fun_decl(&mut self, decl: &FunDecl) -> Result<(), StructuralError> {
        let scope = expect_inner_scope(self.ctx, decl.id, decl.span)?;
        self.with_scope(scope, |this| visit::walk_fun_decl(this, decl))
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) -> Result<(), StructuralError> {
        let scope = expect_inner_scope(self.ctx, decl.id, decl.span)?;
        self.with_scope(scope, |this| visit::walk_class_decl(this, decl))
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), StructuralError> {
        match &expr.kind {
            ExprKind::Ident(name) => {
                match self.resolve(&name.node) {
                    Some((scope, symbol)) => {
                        trace!(name = %name.node, node = %expr.id, "resolved identifier");
                        self.ctx.set_scope(expr.id, scope);
                        self.ctx.set_symbol(expr.id, symbol);
                    }
                    None => self.errors.push(SemanticError::UndefinedSymbol {
                        name: name.node.clone(),
                        span: Some(name.span),
                    }),
                }
                Ok(())
            }
            ExprKind::Dot { owner, attribute } => {
                self.visit_expr(owner)?;
                if let Some(owner_sym) = self.ctx.symbol_of(owner.id) {
                    let member = self.ctx.member(owner_sym, &attribute.node);
                    if let Some(scope) = self.ctx.scope_of(owner.id) {
                        self.ctx.set_scope(expr.id, scope);
                    }
                    self.ctx.set_symbol(expr.id, member);
                }
                Ok(())
            }
            _ => visit::walk_expr(self, expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SymbolsExtractor;
    use safescript_ast::Stmt;

    fn bind(src: &str) -> (Block, Context, Vec<SemanticError>) {
        let module = safescript_parse::parse_source(src).expect("parse");
        let mut ctx = Context::new();
        let errors = SymbolsExtractor::new().run(&module, &mut ctx).unwrap();
        assert!(errors.is_empty(), "extraction errors: {errors:?}");
        let errors = ScopeBinder::new().run(&module, &mut ctx).unwrap();
        (module, ctx, errors)
    }

    fn init_of(stmt: &Stmt) -> &Expr {
        match stmt {
            Stmt::VarDecl(d) => &d.init.as_ref().unwrap().value,
            other => panic!("expected var decl, got {other:?}"),
        }
    }

    #[test]
    fn names_resolve_to_their_declaration() {
        let (module, ctx, errors) = bind("let a = 1\nlet b = a\n");
        assert!(errors.is_empty());
        let Stmt::VarDecl(a) = &module.stmts[0] else {
            panic!("expected var decl");
        };
        let use_of_a = init_of(&module.stmts[1]);
        assert_eq!(ctx.symbol_of(use_of_a.id), ctx.symbol_of(a.id));
        assert_eq!(ctx.scope_of(use_of_a.id), ctx.scope_of(a.id));
    }

    #[test]
    fn self_reference_in_initializer_is_undefined_without_outer() {
        let (_, _, errors) = bind("function f() {\n    let x = x\n}\n");
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(matches!(
            &errors[0],
            SemanticError::UndefinedSymbol { name, span: Some(_) } if name == "x"
        ));
    }

    #[test]
    fn self_reference_in_initializer_binds_outer_declaration() {
        let (module, ctx, errors) = bind("let x = 1\nfunction f() {\n    let x = x\n}\n");
        assert!(errors.is_empty(), "{errors:?}");
        let Stmt::VarDecl(outer) = &module.stmts[0] else {
            panic!("expected var decl");
        };
        let Stmt::FunDecl(f) = &module.stmts[1] else {
            panic!("expected function");
        };
        let inner_use = init_of(&f.body.stmts[0]);
        assert_eq!(ctx.symbol_of(inner_use.id), ctx.symbol_of(outer.id));
    }

    #[test]
    fn parameter_default_cannot_see_itself() {
        let (_, _, errors) = bind("function f(a = a) {}\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn member_access_yields_stable_symbol() {
        let (module, ctx, errors) = bind("let o = { k: 1 }\nlet a = o.k\nlet b = o.k\n");
        assert!(errors.is_empty(), "{errors:?}");
        let first = init_of(&module.stmts[1]);
        let second = init_of(&module.stmts[2]);
        let first_sym = ctx.symbol_of(first.id).unwrap();
        assert_eq!(Some(first_sym), ctx.symbol_of(second.id));
        assert_eq!(ctx.symbol(first_sym).name, "k");
    }

    #[test]
    fn object_keys_are_not_references() {
        let (_, _, errors) = bind("let o = { undefined_key: 1 }\n");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn builtins_resolve() {
        let (_, _, errors) = bind("console.log(1)\n");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn missing_extraction_is_structural() {
        let module = safescript_parse::parse_source("let a = 1\n").unwrap();
        let mut ctx = Context::new();
        let err = ScopeBinder::new().run(&module, &mut ctx).unwrap_err();
        assert!(matches!(err, StructuralError::MissingAnnotation { .. }));
    }
}
