#![forbid(unsafe_code)]

use std::fmt;

use safescript_ast::Mutability;

/// The little type information the analysis needs: enough to check call
/// arity and the mutability each parameter expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Ground(GroundType),
    Function(FunctionType),
}

impl Type {
    pub fn function(domain: impl Into<Vec<Mutability>>) -> Self {
        Type::Function(FunctionType {
            domain: domain.into(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundType {
    Undefined,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionType {
    /// Mutability qualifier of each parameter, in declaration order.
    pub domain: Vec<Mutability>,
}

impl fmt::Display for GroundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroundType::Undefined => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("f(")?;
        for (i, q) in self.domain.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(q.as_str())?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Ground(g) => g.fmt(f),
            Type::Function(func) => func.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_function_signature() {
        let ty = Type::function([Mutability::Mutable, Mutability::Const]);
        assert_eq!(ty.to_string(), "f(mutable, const)");
        assert_eq!(Type::Ground(GroundType::Undefined).to_string(), "undefined");
    }
}
