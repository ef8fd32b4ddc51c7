#![forbid(unsafe_code)]

use safescript_ast::visit::{self, Visit};
use safescript_ast::{Block, ClassDecl, FunDecl, Ident, NodeId, ParamDecl, Span, VarDecl};

use crate::context::Context;
use crate::error::{SemanticError, StructuralError};
use crate::pass::Pass;
use crate::scope::ScopeId;

/// Pass 1: opens a scope for every block, function and class, and creates a
/// symbol for every declaration.
///
/// Function parameters live in the function's own scope, and the function
/// body shares it rather than opening a nested one.
#[derive(Debug, Default)]
pub struct SymbolsExtractor;

impl SymbolsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for SymbolsExtractor {
    fn name(&self) -> &'static str {
        "symbol extraction"
    }

    fn run(
        &mut self,
        module: &Block,
        ctx: &mut Context,
    ) -> Result<Vec<SemanticError>, StructuralError> {
        let builtins = ctx.builtins();
        let mut walker = Extractor {
            ctx,
            scopes: vec![builtins],
            errors: Vec::new(),
        };
        walker.visit_block(module)?;
        Ok(walker.errors)
    }
}

struct Extractor<'c> {
    ctx: &'c mut Context,
    scopes: Vec<ScopeId>,
    errors: Vec<SemanticError>,
}

impl Extractor<'_> {
    fn current(&self) -> ScopeId {
        self.scopes
            .last()
            .copied()
            .unwrap_or_else(|| self.ctx.builtins())
    }

    fn declare(&mut self, node: NodeId, name: &Ident, span: Span) {
        let scope = self.current();
        let symbol = if self.ctx.scope(scope).defines(&name.node) {
            self.errors.push(SemanticError::DuplicateDeclaration {
                name: name.node.clone(),
                span: Some(span),
            });
            // Keep the first declaration in the table; the duplicate still
            // gets annotations so later passes can read them.
            self.ctx.new_symbol(name.node.as_str(), Some(scope))
        } else {
            self.ctx.declare(scope, &name.node)
        };
        self.ctx.set_scope(node, scope);
        self.ctx.set_symbol(node, symbol);
    }

    fn open_scope(&mut self, name: Option<String>) -> ScopeId {
        let parent = self.current();
        let scope = self.ctx.new_scope(name, Some(parent));
        self.scopes.push(scope);
        scope
    }
}

impl Visit for Extractor<'_> {
    type Error = StructuralError;

    fn visit_block(&mut self, block: &Block) -> Result<(), StructuralError> {
        let scope = self.open_scope(None);
        self.ctx.set_inner_scope(block.id, scope);
        visit::walk_block(self, block)?;
        self.scopes.pop();
        Ok(())
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<(), StructuralError> {
        self.declare(decl.id, &decl.name, decl.span);
        visit::walk_var_decl(self, decl)
    }

    fn visit_param(&mut self, param: &ParamDecl) -> Result<(), StructuralError> {
        self.declare(param.id, &param.name, param.span);
        visit::walk_param(self, param)
    }

    fn visit_fun_decl(&mut self, decl: &FunDecl) -> Result<(), StructuralError> {
        self.declare(decl.id, &decl.name, decl.span);

        let scope = self.open_scope(Some(decl.name.node.clone()));
        self.ctx.set_inner_scope(decl.id, scope);
        self.ctx.set_inner_scope(decl.body.id, scope);
        for param in &decl.params {
            self.visit_param(param)?;
        }
        visit::walk_block(self, &decl.body)?;
        self.scopes.pop();
        Ok(())
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) -> Result<(), StructuralError> {
        self.declare(decl.id, &decl.name, decl.span);

        let scope = self.open_scope(Some(decl.name.node.clone()));
        self.ctx.set_inner_scope(decl.id, scope);
        visit::walk_class_decl(self, decl)?;
        self.scopes.pop();
        Ok(())
    }
}
