#![forbid(unsafe_code)]

mod error;
mod fmt;
mod parser;

use miette::IntoDiagnostic;
use safescript_lex::Lexer;

pub use error::ParseError;
pub use fmt::{format_expr, format_module};
pub use parser::Parser;

pub fn parse_source(src: &str) -> miette::Result<safescript_ast::Block> {
    let tokens = Lexer::new(src).lex().into_diagnostic()?;
    let mut parser = Parser::new(&tokens);
    parser.parse_module().into_diagnostic()
}

/// Parse a source file while attempting to recover from errors.
///
/// Returns a best-effort AST and a list of encountered `ParseError`s.
pub fn parse_source_with_recovery(
    src: &str,
) -> miette::Result<(safescript_ast::Block, Vec<ParseError>)> {
    let tokens = Lexer::new(src).lex().into_diagnostic()?;
    let mut parser = Parser::new(&tokens);
    Ok(parser.parse_module_with_recovery())
}

pub fn parse_expr(src: &str) -> miette::Result<safescript_ast::Expr> {
    let tokens = Lexer::new(src).lex().into_diagnostic()?;
    let mut parser = Parser::new(&tokens);
    parser.parse_expr_eof().into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use safescript_ast::{BindingOp, ExprKind, InfixOp, Mutability, Stmt};

    #[test]
    fn parses_var_decl_with_qualifier_and_borrow() {
        let module = parse_source("let x: mutable = 0\nconst y: mutable &- x\n").unwrap();
        assert_eq!(module.stmts.len(), 2);

        let Stmt::VarDecl(x) = &module.stmts[0] else {
            panic!("expected var decl");
        };
        assert!(x.reassignable);
        assert_eq!(x.mutability, Mutability::Mutable);
        assert_eq!(x.init.as_ref().map(|b| b.op), Some(BindingOp::Copy));

        let Stmt::VarDecl(y) = &module.stmts[1] else {
            panic!("expected var decl");
        };
        assert!(!y.reassignable);
        assert_eq!(y.init.as_ref().map(|b| b.op), Some(BindingOp::Borrow));
    }

    #[test]
    fn mutability_defaults_to_const() {
        let module = parse_source("let x").unwrap();
        let Stmt::VarDecl(x) = &module.stmts[0] else {
            panic!("expected var decl");
        };
        assert_eq!(x.mutability, Mutability::Const);
        assert!(x.init.is_none());
    }

    #[test]
    fn parses_function_with_params_and_by_ref_call() {
        let src = "function f(a: mutable, b: const = 1): mutable {\n  return a\n}\nf(&x, y)\n";
        let module = parse_source(src).unwrap();
        let Stmt::FunDecl(f) = &module.stmts[0] else {
            panic!("expected function");
        };
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].mutability, Mutability::Mutable);
        assert!(f.params[1].default.is_some());
        assert_eq!(f.ret_mutability, Mutability::Mutable);

        let Stmt::Expr(call) = &module.stmts[1] else {
            panic!("expected call");
        };
        let ExprKind::Call { args, .. } = &call.kind else {
            panic!("expected call");
        };
        assert!(args[0].by_ref);
        assert!(!args[1].by_ref);
    }

    #[test]
    fn assignment_statements_carry_binding_operator() {
        let module = parse_source("a.b &- c; d = e").unwrap();
        let Stmt::Assign(first) = &module.stmts[0] else {
            panic!("expected assignment");
        };
        assert_eq!(first.op, BindingOp::Borrow);
        assert!(matches!(first.lvalue.kind, ExprKind::Dot { .. }));
        let Stmt::Assign(second) = &module.stmts[1] else {
            panic!("expected assignment");
        };
        assert_eq!(second.op, BindingOp::Copy);
    }

    #[test]
    fn infix_precedence_and_associativity() {
        let expr = parse_expr("1 + 2 * 3 ** 2 ** 2").unwrap();
        let ExprKind::Infix { op, right, .. } = &expr.kind else {
            panic!("expected infix");
        };
        assert_eq!(*op, InfixOp::Add);
        let ExprKind::Infix { op, right, .. } = &right.kind else {
            panic!("expected infix");
        };
        assert_eq!(*op, InfixOp::Mul);
        let ExprKind::Infix { op, right, .. } = &right.kind else {
            panic!("expected infix");
        };
        assert_eq!(*op, InfixOp::Pow);
        assert!(matches!(right.kind, ExprKind::Infix { op: InfixOp::Pow, .. }));
    }

    #[test]
    fn left_associative_subtraction() {
        let expr = parse_expr("a - b - c").unwrap();
        let ExprKind::Infix { left, .. } = &expr.kind else {
            panic!("expected infix");
        };
        assert!(matches!(left.kind, ExprKind::Infix { op: InfixOp::Sub, .. }));
    }

    #[test]
    fn else_if_is_wrapped_in_a_block() {
        let module = parse_source("if a {\n} else if b {\n  c\n} else {\n}\n").unwrap();
        let Stmt::If(s) = &module.stmts[0] else {
            panic!("expected if");
        };
        let else_block = s.else_block.as_ref().unwrap();
        assert_eq!(else_block.stmts.len(), 1);
        assert!(matches!(else_block.stmts[0], Stmt::If(_)));
    }

    #[test]
    fn node_ids_are_unique() {
        let module = parse_source("let a = [1, 2]\n{ let b = { k: a } }\n").unwrap();
        let Stmt::VarDecl(a) = &module.stmts[0] else {
            panic!("expected var decl");
        };
        let Stmt::Block(inner) = &module.stmts[1] else {
            panic!("expected block");
        };
        let Stmt::VarDecl(b) = &inner.stmts[0] else {
            panic!("expected var decl");
        };
        let ids = [module.id, a.id, inner.id, b.id];
        for (i, x) in ids.iter().enumerate() {
            for y in &ids[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn class_members_must_be_declarations() {
        let err = parse_source("class A {\n  x = 1\n}\n").unwrap_err();
        assert!(format!("{err}").contains("class members"));
    }

    #[test]
    fn reserved_keywords_are_rejected() {
        let err = parse_source("for x in y {}").unwrap_err();
        assert!(format!("{err}").contains("reserved"));
    }

    #[test]
    fn statements_need_delimiters() {
        let err = parse_source("let a = 1 let b = 2").unwrap_err();
        assert!(format!("{err}").contains("statement delimiter"));
    }

    #[test]
    fn recovery_skips_to_next_statement() {
        let (module, errors) = parse_source_with_recovery("let = 1\nlet ok = 2\n").unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(module.stmts.len(), 1);
    }
}
