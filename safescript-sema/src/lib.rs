#![forbid(unsafe_code)]

//! Semantic analysis for SafeScript.
//!
//! Four passes run over the parsed module and share one [`Context`]:
//! symbol extraction, scope binding, type creation and borrow checking.
//! Each pass reads the annotations its predecessors wrote and reports every
//! error it finds; [`analyze`] stops at the first pass that reports any.

pub mod borrowck;
pub mod context;
pub mod error;
pub mod pass;
pub mod scope;
pub mod symbol;
pub mod types;

mod bind;
mod extract;
mod type_creator;

use safescript_ast::Block;
use tracing::{debug, debug_span};

pub use bind::ScopeBinder;
pub use borrowck::BorrowChecker;
pub use context::{Annotation, Context, Key};
pub use error::{AnalysisError, SemanticError, StructuralError};
pub use extract::SymbolsExtractor;
pub use pass::Pass;
pub use scope::{Scope, ScopeId};
pub use symbol::{Symbol, SymbolId};
pub use type_creator::TypeCreator;
pub use types::{FunctionType, GroundType, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Run the borrow checker after type creation.
    pub borrow_check: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { borrow_check: true }
    }
}

/// The passes `analyze_with` runs, in order.
pub fn pipeline(options: &AnalysisOptions) -> Vec<Box<dyn Pass>> {
    let mut passes: Vec<Box<dyn Pass>> = vec![
        Box::new(SymbolsExtractor::new()),
        Box::new(ScopeBinder::new()),
        Box::new(TypeCreator::new()),
    ];
    if options.borrow_check {
        passes.push(Box::new(BorrowChecker::new()));
    }
    passes
}

pub fn analyze(module: &Block, ctx: &mut Context) -> Result<(), AnalysisError> {
    analyze_with(module, ctx, &AnalysisOptions::default())
}

pub fn analyze_with(
    module: &Block,
    ctx: &mut Context,
    options: &AnalysisOptions,
) -> Result<(), AnalysisError> {
    for mut pass in pipeline(options) {
        let name = pass.name();
        let _span = debug_span!("pass", pass = name).entered();
        let errors = pass.run(module, ctx)?;
        if !errors.is_empty() {
            debug!(count = errors.len(), "pass reported errors");
            return Err(AnalysisError::Semantic { pass: name, errors });
        }
        debug!("pass succeeded");
    }
    Ok(())
}
