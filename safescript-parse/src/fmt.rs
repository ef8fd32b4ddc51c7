#![forbid(unsafe_code)]

use safescript_ast::{
    Argument, Binding, Block, ClassDecl, Expr, ExprKind, FunDecl, IfStmt, ParamDecl, Stmt, VarDecl,
};

const INDENT: &str = "    ";

/// Canonical source form of a module. Mutability qualifiers are always spelled out.
pub fn format_module(module: &Block) -> String {
    let mut out = String::new();
    for stmt in &module.stmts {
        fmt_stmt(&mut out, 0, stmt);
    }
    out
}

pub fn format_expr(expr: &Expr) -> String {
    let mut out = String::new();
    fmt_expr(&mut out, expr);
    out
}

fn fmt_stmt(out: &mut String, indent: usize, stmt: &Stmt) {
    indent_line(out, indent);
    match stmt {
        Stmt::VarDecl(d) => fmt_var_decl(out, d),
        Stmt::FunDecl(d) => fmt_fun_decl(out, indent, d),
        Stmt::ClassDecl(d) => fmt_class_decl(out, indent, d),
        Stmt::Assign(a) => {
            fmt_expr(out, &a.lvalue);
            out.push(' ');
            out.push_str(a.op.as_str());
            out.push(' ');
            fmt_expr(out, &a.rvalue);
        }
        Stmt::If(s) => fmt_if(out, indent, s),
        Stmt::While(s) => {
            out.push_str("while ");
            fmt_expr(out, &s.cond);
            out.push(' ');
            fmt_block(out, indent, &s.body);
        }
        Stmt::Return(s) => {
            out.push_str("return");
            if let Some(v) = &s.value {
                out.push(' ');
                fmt_expr(out, v);
            }
        }
        Stmt::Break(_) => out.push_str("break"),
        Stmt::Continue(_) => out.push_str("continue"),
        Stmt::Block(b) => fmt_block(out, indent, b),
        Stmt::Expr(e) => fmt_expr(out, e),
    }
    out.push('\n');
}

fn fmt_var_decl(out: &mut String, d: &VarDecl) {
    out.push_str(if d.reassignable { "let " } else { "const " });
    out.push_str(&d.name.node);
    out.push_str(": ");
    out.push_str(d.mutability.as_str());
    if let Some(b) = &d.init {
        fmt_binding(out, b);
    }
}

fn fmt_binding(out: &mut String, b: &Binding) {
    out.push(' ');
    out.push_str(b.op.as_str());
    out.push(' ');
    fmt_expr(out, &b.value);
}

fn fmt_fun_decl(out: &mut String, indent: usize, d: &FunDecl) {
    out.push_str("function ");
    out.push_str(&d.name.node);
    out.push('(');
    for (i, p) in d.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        fmt_param(out, p);
    }
    out.push_str("): ");
    out.push_str(d.ret_mutability.as_str());
    out.push(' ');
    fmt_block(out, indent, &d.body);
}

fn fmt_param(out: &mut String, p: &ParamDecl) {
    out.push_str(&p.name.node);
    out.push_str(": ");
    out.push_str(p.mutability.as_str());
    if let Some(b) = &p.default {
        fmt_binding(out, b);
    }
}

fn fmt_class_decl(out: &mut String, indent: usize, d: &ClassDecl) {
    out.push_str("class ");
    out.push_str(&d.name.node);
    out.push_str(" {\n");
    for member in &d.members {
        fmt_stmt(out, indent + 1, member);
    }
    indent_line(out, indent);
    out.push('}');
}

fn fmt_if(out: &mut String, indent: usize, s: &IfStmt) {
    out.push_str("if ");
    fmt_expr(out, &s.cond);
    out.push(' ');
    fmt_block(out, indent, &s.then_block);
    let Some(else_block) = &s.else_block else {
        return;
    };
    out.push_str(" else ");
    match else_block.stmts.as_slice() {
        // Collapse the block the parser wraps around `else if`.
        [Stmt::If(nested)] => fmt_if(out, indent, nested),
        _ => fmt_block(out, indent, else_block),
    }
}

fn fmt_block(out: &mut String, indent: usize, block: &Block) {
    if block.stmts.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for stmt in &block.stmts {
        fmt_stmt(out, indent + 1, stmt);
    }
    indent_line(out, indent);
    out.push('}');
}

fn fmt_expr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Ident(id) => out.push_str(&id.node),
        ExprKind::Number(n) => out.push_str(&n.to_string()),
        ExprKind::Str(s) => fmt_string(out, s),
        ExprKind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ExprKind::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                fmt_expr(out, item);
            }
            out.push(']');
        }
        ExprKind::Object(fields) => {
            if fields.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{ ");
            for (i, (key, value)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&key.node);
                out.push_str(": ");
                fmt_expr(out, value);
            }
            out.push_str(" }");
        }
        ExprKind::Prefix { op, expr } => {
            out.push_str(op.as_str());
            if op.is_keyword() {
                out.push(' ');
            }
            fmt_expr(out, expr);
        }
        ExprKind::Postfix { op, expr } => {
            fmt_expr(out, expr);
            out.push_str(op.as_str());
        }
        ExprKind::Infix { left, op, right } => {
            fmt_expr(out, left);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            fmt_expr(out, right);
        }
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            fmt_expr(out, cond);
            out.push_str(" ? ");
            fmt_expr(out, then_expr);
            out.push_str(" : ");
            fmt_expr(out, else_expr);
        }
        ExprKind::Dot { owner, attribute } => {
            fmt_expr(out, owner);
            out.push('.');
            out.push_str(&attribute.node);
        }
        ExprKind::Call { callee, args } => {
            fmt_expr(out, callee);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                fmt_argument(out, arg);
            }
            out.push(')');
        }
        ExprKind::Subscript { base, index } => {
            fmt_expr(out, base);
            out.push('[');
            fmt_expr(out, index);
            out.push(']');
        }
        ExprKind::Paren(inner) => {
            out.push('(');
            fmt_expr(out, inner);
            out.push(')');
        }
    }
}

fn fmt_argument(out: &mut String, arg: &Argument) {
    if arg.by_ref {
        out.push('&');
    }
    fmt_expr(out, &arg.value);
}

fn fmt_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('"');
}

fn indent_line(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}
