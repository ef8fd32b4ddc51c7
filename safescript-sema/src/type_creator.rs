#![forbid(unsafe_code)]

use safescript_ast::{Block, FunDecl};
use safescript_ast::visit::{self, Visit};
use tracing::trace;

use crate::context::Context;
use crate::error::{SemanticError, StructuralError};
use crate::pass::Pass;
use crate::types::Type;

/// Pass 3: gives every function symbol a signature built from its parameter
/// qualifiers. Nested functions and class methods are typed too.
#[derive(Debug, Default)]
pub struct TypeCreator;

impl TypeCreator {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for TypeCreator {
    fn name(&self) -> &'static str {
        "type creation"
    }

    fn run(
        &mut self,
        module: &Block,
        ctx: &mut Context,
    ) -> Result<Vec<SemanticError>, StructuralError> {
        let mut walker = Typer {
            ctx,
            errors: Vec::new(),
        };
        walker.visit_block(module)?;
        Ok(walker.errors)
    }
}

struct Typer<'c> {
    ctx: &'c mut Context,
    errors: Vec<SemanticError>,
}

impl Visit for Typer<'_> {
    type Error = StructuralError;

    fn visit_fun_decl(&mut self, decl: &FunDecl) -> Result<(), StructuralError> {
        match self.ctx.symbol_of(decl.id) {
            Some(symbol) => {
                let ty = Type::function(
                    decl.params
                        .iter()
                        .map(|p| p.mutability)
                        .collect::<Vec<_>>(),
                );
                trace!(function = %decl.name.node, %ty, "typed function");
                self.ctx.symbol_mut(symbol).ty = Some(ty);
            }
            None => self.errors.push(SemanticError::UndefinedSymbol {
                name: decl.name.node.clone(),
                span: Some(decl.span),
            }),
        }
        visit::walk_fun_decl(self, decl)
    }
}
