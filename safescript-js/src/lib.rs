#![forbid(unsafe_code)]

//! Lowering of a parsed SafeScript module to JavaScript.
//!
//! Copy bindings become calls to the deep-copy runtime helper and reference
//! bindings plain aliases. Mutability qualifiers and `&` argument markers
//! have no runtime meaning and are dropped.

mod emit;
mod runtime;

pub use emit::{EmitOptions, emit_expr, emit_module};
pub use runtime::{DEEPCOPY_FN, DEEPCOPY_PRELUDE};
