#![forbid(unsafe_code)]

use safescript_ast::{
    Binding, BindingOp, Block, ClassDecl, Expr, ExprKind, FunDecl, IfStmt, ParamDecl, Stmt,
    VarDecl,
};
use tracing::debug;

use crate::runtime::{DEEPCOPY_FN, DEEPCOPY_PRELUDE};

const INDENT: &str = "    ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Emit the deep-copy helper ahead of the module body. Turn off when the
    /// helper is provided by the host page.
    pub preamble: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { preamble: true }
    }
}

pub fn emit_module(module: &Block, options: &EmitOptions) -> String {
    let mut w = JsWriter::default();
    if options.preamble {
        w.out.push_str(DEEPCOPY_PRELUDE);
        w.out.push('\n');
    }
    for stmt in &module.stmts {
        w.stmt(stmt);
    }
    debug!(
        statements = module.stmts.len(),
        bytes = w.out.len(),
        "emitted javascript"
    );
    w.out
}

pub fn emit_expr(expr: &Expr) -> String {
    let mut w = JsWriter::default();
    w.expr(expr);
    w.out
}

#[derive(Default)]
struct JsWriter {
    out: String,
    indent: usize,
}

impl JsWriter {
    fn line_start(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.line_start();
        match stmt {
            Stmt::VarDecl(d) => self.var_decl(d),
            Stmt::FunDecl(d) => {
                self.out.push_str("function ");
                self.function(d);
            }
            Stmt::ClassDecl(d) => self.class_decl(d),
            Stmt::Assign(a) => {
                self.expr(&a.lvalue);
                self.bound_value(a.op, &a.rvalue);
                self.out.push(';');
            }
            Stmt::If(s) => self.if_stmt(s),
            Stmt::While(s) => {
                self.out.push_str("while (");
                self.expr(&s.cond);
                self.out.push_str(") ");
                self.block(&s.body);
            }
            Stmt::Return(s) => {
                self.out.push_str("return");
                if let Some(value) = &s.value {
                    self.out.push(' ');
                    self.expr(value);
                }
                self.out.push(';');
            }
            Stmt::Break(_) => self.out.push_str("break;"),
            Stmt::Continue(_) => self.out.push_str("continue;"),
            Stmt::Block(b) => self.block(b),
            Stmt::Expr(e) => {
                self.expr(e);
                self.out.push(';');
            }
        }
        self.out.push('\n');
    }

    fn var_decl(&mut self, d: &VarDecl) {
        self.out
            .push_str(if d.reassignable { "let " } else { "const " });
        self.out.push_str(&d.name.node);
        match &d.init {
            Some(init) => self.binding(init),
            // `const x;` is a syntax error in JavaScript.
            None if !d.reassignable => self.out.push_str(" = undefined"),
            None => {}
        }
        self.out.push(';');
    }

    fn binding(&mut self, b: &Binding) {
        self.bound_value(b.op, &b.value);
    }

    fn bound_value(&mut self, op: BindingOp, value: &Expr) {
        match op {
            BindingOp::Copy => {
                self.out.push_str(" = ");
                self.out.push_str(DEEPCOPY_FN);
                self.out.push('(');
            }
            BindingOp::Borrow => self.out.push_str(" = ("),
        }
        self.expr(value);
        self.out.push(')');
    }

    /// Name, parameters and body; the caller writes any leading keyword.
    fn function(&mut self, d: &FunDecl) {
        self.out.push_str(&d.name.node);
        self.out.push('(');
        for (i, p) in d.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.param(p);
        }
        self.out.push_str(") ");
        self.block(&d.body);
    }

    fn param(&mut self, p: &ParamDecl) {
        self.out.push_str(&p.name.node);
        if let Some(default) = &p.default {
            self.binding(default);
        }
    }

    fn class_decl(&mut self, d: &ClassDecl) {
        self.out.push_str("class ");
        self.out.push_str(&d.name.node);
        self.out.push_str(" {\n");
        self.indent += 1;
        for member in &d.members {
            self.line_start();
            match member {
                Stmt::VarDecl(field) => {
                    self.out.push_str(&field.name.node);
                    if let Some(init) = &field.init {
                        self.binding(init);
                    }
                    self.out.push(';');
                }
                Stmt::FunDecl(method) => self.function(method),
                // The parser admits nothing else in a class body.
                other => {
                    self.out.push_str("/* unsupported member */");
                    debug!(span = ?other.span(), "skipped class member");
                }
            }
            self.out.push('\n');
        }
        self.indent -= 1;
        self.line_start();
        self.out.push('}');
    }

    fn if_stmt(&mut self, s: &IfStmt) {
        self.out.push_str("if (");
        self.expr(&s.cond);
        self.out.push_str(") ");
        self.block(&s.then_block);
        let Some(else_block) = &s.else_block else {
            return;
        };
        self.out.push_str(" else ");
        match else_block.stmts.as_slice() {
            [Stmt::If(nested)] => self.if_stmt(nested),
            _ => self.block(else_block),
        }
    }

    fn block(&mut self, block: &Block) {
        if block.stmts.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.line_start();
        self.out.push('}');
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Ident(id) => self.out.push_str(&id.node),
            ExprKind::Number(n) => self.out.push_str(&n.to_string()),
            ExprKind::Str(s) => self.string(s),
            ExprKind::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            ExprKind::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(item);
                }
                self.out.push(']');
            }
            ExprKind::Object(fields) => {
                // Parenthesized so a statement never starts with `{`.
                self.out.push_str("({");
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&key.node);
                    self.out.push_str(": ");
                    self.expr(value);
                }
                self.out.push_str("})");
            }
            ExprKind::Prefix { op, expr } => {
                self.out.push_str(op.as_str());
                if op.is_keyword() {
                    self.out.push(' ');
                }
                self.expr(expr);
            }
            ExprKind::Postfix { op, expr } => {
                self.expr(expr);
                self.out.push_str(op.as_str());
            }
            ExprKind::Infix { left, op, right } => {
                self.expr(left);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(right);
            }
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(cond);
                self.out.push_str(" ? ");
                self.expr(then_expr);
                self.out.push_str(" : ");
                self.expr(else_expr);
            }
            ExprKind::Dot { owner, attribute } => {
                self.expr(owner);
                self.out.push('.');
                self.out.push_str(&attribute.node);
            }
            ExprKind::Call { callee, args } => {
                self.expr(callee);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(&arg.value);
                }
                self.out.push(')');
            }
            ExprKind::Subscript { base, index } => {
                self.expr(base);
                self.out.push('[');
                self.expr(index);
                self.out.push(']');
            }
            ExprKind::Paren(inner) => {
                self.out.push('(');
                self.expr(inner);
                self.out.push(')');
            }
        }
    }

    fn string(&mut self, s: &str) {
        self.out.push('"');
        for ch in s.chars() {
            match ch {
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                other => self.out.push(other),
            }
        }
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js(src: &str) -> String {
        let module = safescript_parse::parse_source(src).expect("parse");
        emit_module(&module, &EmitOptions { preamble: false })
    }

    #[test]
    fn copies_and_borrows_lower_differently() {
        assert_eq!(
            js("let x: mutable = 1\nconst y &- x\n"),
            "let x = __ssdeepcopy(1);\nconst y = (x);\n"
        );
    }

    #[test]
    fn uninitialized_const_gets_undefined() {
        assert_eq!(js("const z\nlet w\n"), "const z = undefined;\nlet w;\n");
    }

    #[test]
    fn reference_markers_are_erased() {
        assert_eq!(js("f(&a, b)\n"), "f(a, b);\n");
    }

    #[test]
    fn preamble_comes_first() {
        let module = safescript_parse::parse_source("let a = 1\n").unwrap();
        let out = emit_module(&module, &EmitOptions::default());
        assert!(out.starts_with("function __ssdeepcopy(obj, refs = []) {"));
        assert!(out.ends_with("let a = __ssdeepcopy(1);\n"));
    }

    #[test]
    fn expressions_keep_their_shape() {
        let expr = safescript_parse::parse_expr("(a + b) * -c[0].d ? typeof e : 'x'").unwrap();
        assert_eq!(emit_expr(&expr), "(a + b) * -c[0].d ? typeof e : \"x\"");
    }
}
