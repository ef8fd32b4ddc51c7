#![forbid(unsafe_code)]

use safescript_ast::{Block, NodeId, Span};

use crate::context::{Context, Key};
use crate::error::{SemanticError, StructuralError};
use crate::scope::ScopeId;
use crate::symbol::SymbolId;

/// One stage of the analysis pipeline.
///
/// A pass reads the annotations earlier passes left in the context, may add
/// its own, and reports every diagnosable error it finds. A structural error
/// means an earlier pass did not run and aborts this one.
pub trait Pass {
    fn name(&self) -> &'static str;

    fn run(
        &mut self,
        module: &Block,
        ctx: &mut Context,
    ) -> Result<Vec<SemanticError>, StructuralError>;
}

pub(crate) fn expect_inner_scope(
    ctx: &Context,
    node: NodeId,
    span: Span,
) -> Result<ScopeId, StructuralError> {
    ctx.inner_scope_of(node)
        .ok_or(StructuralError::MissingAnnotation {
            node,
            key: Key::InnerScope,
            span,
        })
}

pub(crate) fn expect_symbol(
    ctx: &Context,
    node: NodeId,
    span: Span,
) -> Result<SymbolId, StructuralError> {
    ctx.symbol_of(node).ok_or(StructuralError::MissingAnnotation {
        node,
        key: Key::Symbol,
        span,
    })
}
