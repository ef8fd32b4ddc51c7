#![forbid(unsafe_code)]

use std::fmt;

use miette::SourceSpan;

pub mod visit;

pub type Span = SourceSpan;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub span: Span,
    pub node: T,
}

impl<T> Spanned<T> {
    pub fn new(span: Span, node: T) -> Self {
        Self { span, node }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            span: self.span,
            node: f(self.node),
        }
    }
}

pub fn span(start: usize, len: usize) -> Span {
    SourceSpan::new(start.into(), len)
}

pub fn span_between(start: usize, end: usize) -> Span {
    debug_assert!(end >= start);
    span(start, end - start)
}

/// Smallest span covering both `a` and `b`.
pub fn join(a: Span, b: Span) -> Span {
    let a0: usize = a.offset();
    let b0: usize = b.offset();
    let start = a0.min(b0);
    let end = (a0 + a.len()).max(b0 + b.len());
    span_between(start, end)
}

pub type Ident = Spanned<String>;

/// Identity of an AST node within one parsed module.
///
/// Assigned by the parser in creation order; analysis passes key their
/// annotations on it, never on structural equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A brace-delimited statement list. The module root is a `Block` too.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    FunDecl(FunDecl),
    ClassDecl(ClassDecl),
    Assign(Assignment),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Break(Span),
    Continue(Span),
    Block(Block),
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::FunDecl(s) => s.span,
            Stmt::ClassDecl(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(span) | Stmt::Continue(span) => *span,
            Stmt::Block(b) => b.span,
            Stmt::Expr(e) => e.span,
        }
    }
}

/// Mutability qualifier written after a declared name (`x: mutable`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mutability {
    Mutable,
    #[default]
    Const,
}

impl Mutability {
    pub fn as_str(self) -> &'static str {
        match self {
            Mutability::Mutable => "mutable",
            Mutability::Const => "const",
        }
    }

    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `=` gives the target its own copy, `&-` makes it an alias of the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingOp {
    Copy,
    Borrow,
}

impl BindingOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BindingOp::Copy => "=",
            BindingOp::Borrow => "&-",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub op: BindingOp,
    pub value: Expr,
}

/// `let`/`const` declaration. `reassignable` is false for `const`.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub reassignable: bool,
    pub mutability: Mutability,
    pub init: Option<Binding>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub mutability: Mutability,
    pub default: Option<Binding>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub params: Vec<ParamDecl>,
    pub ret_mutability: Mutability,
    pub body: Block,
}

/// Class body members are restricted to `VarDecl` and `FunDecl` statements.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub members: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub span: Span,
    pub lvalue: Expr,
    pub op: BindingOp,
    pub rvalue: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub span: Span,
    pub cond: Expr,
    pub then_block: Block,
    /// `else if` chains are wrapped into a block holding a single `If`.
    pub else_block: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub span: Span,
    pub cond: Expr,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub span: Span,
    pub value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(Ident),
    Number(f64),
    Str(String),
    Bool(bool),
    Array(Vec<Expr>),
    /// Keys are plain property names, not references.
    Object(Vec<(Ident, Expr)>),
    Prefix {
        op: PrefixOp,
        expr: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        expr: Box<Expr>,
    },
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Dot {
        owner: Box<Expr>,
        attribute: Ident,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Argument>,
    },
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Paren(Box<Expr>),
}

/// Call argument; `&expr` passes by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub span: Span,
    pub by_ref: bool,
    pub value: Expr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Not,
    BitNot,
    Neg,
    Plus,
    Incr,
    Decr,
    TypeOf,
    Void,
    Delete,
    Await,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::BitNot => "~",
            PrefixOp::Neg => "-",
            PrefixOp::Plus => "+",
            PrefixOp::Incr => "++",
            PrefixOp::Decr => "--",
            PrefixOp::TypeOf => "typeof",
            PrefixOp::Void => "void",
            PrefixOp::Delete => "delete",
            PrefixOp::Await => "await",
        }
    }

    /// Keyword operators need a space before their operand.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            PrefixOp::TypeOf | PrefixOp::Void | PrefixOp::Delete | PrefixOp::Await
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Incr,
    Decr,
}

impl PostfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Incr => "++",
            PostfixOp::Decr => "--",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    In,
    InstanceOf,
    Lt,
    Le,
    Ge,
    Gt,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl InfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Or => "||",
            InfixOp::And => "&&",
            InfixOp::BitOr => "|",
            InfixOp::BitXor => "^",
            InfixOp::BitAnd => "&",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
            InfixOp::StrictEq => "===",
            InfixOp::StrictNe => "!==",
            InfixOp::In => "in",
            InfixOp::InstanceOf => "instanceof",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::Ge => ">=",
            InfixOp::Gt => ">",
            InfixOp::Shl => "<<",
            InfixOp::Shr => ">>",
            InfixOp::UShr => ">>>",
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Mod => "%",
            InfixOp::Pow => "**",
        }
    }

    /// Binding power; higher binds tighter. `**` is the only right-associative operator.
    pub fn precedence(self) -> u8 {
        match self {
            InfixOp::Or => 0,
            InfixOp::And => 1,
            InfixOp::BitOr => 2,
            InfixOp::BitXor => 3,
            InfixOp::BitAnd => 4,
            InfixOp::Eq | InfixOp::Ne | InfixOp::StrictEq | InfixOp::StrictNe => 5,
            InfixOp::In | InfixOp::InstanceOf => 6,
            InfixOp::Lt | InfixOp::Le | InfixOp::Ge | InfixOp::Gt => 7,
            InfixOp::Shl | InfixOp::Shr | InfixOp::UShr => 8,
            InfixOp::Add | InfixOp::Sub => 9,
            InfixOp::Mul | InfixOp::Div | InfixOp::Mod => 10,
            InfixOp::Pow => 11,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, InfixOp::Pow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_covers_both_spans_in_any_order() {
        let a = span(4, 2);
        let b = span(10, 3);
        assert_eq!(join(a, b), span_between(4, 13));
        assert_eq!(join(b, a), span_between(4, 13));
    }

    #[test]
    fn pow_binds_tighter_than_mul() {
        assert!(InfixOp::Pow.precedence() > InfixOp::Mul.precedence());
        assert!(InfixOp::Pow.is_right_assoc());
        assert!(!InfixOp::Sub.is_right_assoc());
    }
}
