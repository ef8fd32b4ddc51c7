#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use miette::Diagnostic;
use safescript_ast::{NodeId, Span};
use thiserror::Error;

use crate::context::Key;

/// A diagnosable error in the analyzed program. Passes collect these and keep going.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum SemanticError {
    #[error("duplicate declaration: {name}")]
    #[diagnostic(code(safescript::duplicate_declaration))]
    DuplicateDeclaration {
        name: String,
        #[label("`{name}` is already declared in this scope")]
        span: Option<Span>,
    },

    #[error("undefined symbol: {name}")]
    #[diagnostic(code(safescript::undefined_symbol))]
    UndefinedSymbol {
        name: String,
        #[label("not found in this scope")]
        span: Option<Span>,
    },

    #[error("non-referenceable expression")]
    #[diagnostic(
        code(safescript::non_referenceable),
        help("only names and member accesses can be bound or borrowed")
    )]
    NonReferenceableExpression {
        #[label]
        span: Option<Span>,
    },

    #[error("reference error: `{name}` is not bound to any object")]
    #[diagnostic(code(safescript::reference))]
    ReferenceError {
        name: String,
        #[label]
        span: Option<Span>,
    },

    #[error("borrow error: {reason}")]
    #[diagnostic(code(safescript::borrow))]
    BorrowError {
        reason: String,
        #[label]
        span: Option<Span>,
    },

    #[error("type error: {reason}")]
    #[diagnostic(code(safescript::type_error))]
    TypeError {
        reason: String,
        #[label]
        span: Option<Span>,
    },
}

impl SemanticError {
    pub fn span(&self) -> Option<Span> {
        match self {
            SemanticError::DuplicateDeclaration { span, .. }
            | SemanticError::UndefinedSymbol { span, .. }
            | SemanticError::NonReferenceableExpression { span }
            | SemanticError::ReferenceError { span, .. }
            | SemanticError::BorrowError { span, .. }
            | SemanticError::TypeError { span, .. } => *span,
        }
    }

    pub fn borrow(reason: impl Into<String>, span: Span) -> Self {
        SemanticError::BorrowError {
            reason: reason.into(),
            span: Some(span),
        }
    }

    pub fn type_error(reason: impl Into<String>, span: Span) -> Self {
        SemanticError::TypeError {
            reason: reason.into(),
            span: Some(span),
        }
    }
}

/// A broken contract between passes. Aborts the current pass.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum StructuralError {
    #[error("missing `{key}` annotation on node {node}")]
    #[diagnostic(
        code(safescript::internal::missing_annotation),
        help("analysis passes must run in order on a single context")
    )]
    MissingAnnotation {
        node: NodeId,
        key: Key,
        #[label]
        span: Span,
    },
}

/// Outcome of a failed `analyze` run.
#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum AnalysisError {
    #[error("{pass} failed with {} error(s)", .errors.len())]
    #[diagnostic(code(safescript::sema))]
    Semantic {
        pass: &'static str,
        #[related]
        errors: Vec<SemanticError>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Structural(#[from] StructuralError),
}
