#![forbid(unsafe_code)]

//! Depth-first traversal over the AST.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, which
//! recurses into the node's children. Implementors override only the nodes
//! they care about and call `walk_*` themselves to keep descending.

use crate::{
    Argument, Assignment, Binding, Block, ClassDecl, Expr, ExprKind, FunDecl, IfStmt, ParamDecl,
    ReturnStmt, Stmt, VarDecl, WhileStmt,
};

pub trait Visit {
    type Error;

    fn visit_block(&mut self, block: &Block) -> Result<(), Self::Error> {
        walk_block(self, block)
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), Self::Error> {
        walk_stmt(self, stmt)
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<(), Self::Error> {
        walk_var_decl(self, decl)
    }

    fn visit_param(&mut self, param: &ParamDecl) -> Result<(), Self::Error> {
        walk_param(self, param)
    }

    fn visit_fun_decl(&mut self, decl: &FunDecl) -> Result<(), Self::Error> {
        walk_fun_decl(self, decl)
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) -> Result<(), Self::Error> {
        walk_class_decl(self, decl)
    }

    fn visit_assignment(&mut self, assign: &Assignment) -> Result<(), Self::Error> {
        walk_assignment(self, assign)
    }

    fn visit_if(&mut self, stmt: &IfStmt) -> Result<(), Self::Error> {
        walk_if(self, stmt)
    }

    fn visit_while(&mut self, stmt: &WhileStmt) -> Result<(), Self::Error> {
        walk_while(self, stmt)
    }

    fn visit_return(&mut self, stmt: &ReturnStmt) -> Result<(), Self::Error> {
        walk_return(self, stmt)
    }

    fn visit_binding(&mut self, binding: &Binding) -> Result<(), Self::Error> {
        self.visit_expr(&binding.value)
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), Self::Error> {
        walk_expr(self, expr)
    }

    fn visit_argument(&mut self, arg: &Argument) -> Result<(), Self::Error> {
        self.visit_expr(&arg.value)
    }
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, block: &Block) -> Result<(), V::Error> {
    for stmt in &block.stmts {
        v.visit_stmt(stmt)?;
    }
    Ok(())
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Stmt) -> Result<(), V::Error> {
    match stmt {
        Stmt::VarDecl(d) => v.visit_var_decl(d),
        Stmt::FunDecl(d) => v.visit_fun_decl(d),
        Stmt::ClassDecl(d) => v.visit_class_decl(d),
        Stmt::Assign(a) => v.visit_assignment(a),
        Stmt::If(s) => v.visit_if(s),
        Stmt::While(s) => v.visit_while(s),
        Stmt::Return(s) => v.visit_return(s),
        Stmt::Break(_) | Stmt::Continue(_) => Ok(()),
        Stmt::Block(b) => v.visit_block(b),
        Stmt::Expr(e) => v.visit_expr(e),
    }
}

pub fn walk_var_decl<V: Visit + ?Sized>(v: &mut V, decl: &VarDecl) -> Result<(), V::Error> {
    match &decl.init {
        Some(binding) => v.visit_binding(binding),
        None => Ok(()),
    }
}

pub fn walk_param<V: Visit + ?Sized>(v: &mut V, param: &ParamDecl) -> Result<(), V::Error> {
    match &param.default {
        Some(binding) => v.visit_binding(binding),
        None => Ok(()),
    }
}

pub fn walk_fun_decl<V: Visit + ?Sized>(v: &mut V, decl: &FunDecl) -> Result<(), V::Error> {
    for param in &decl.params {
        v.visit_param(param)?;
    }
    v.visit_block(&decl.body)
}

pub fn walk_class_decl<V: Visit + ?Sized>(v: &mut V, decl: &ClassDecl) -> Result<(), V::Error> {
    for member in &decl.members {
        v.visit_stmt(member)?;
    }
    Ok(())
}

pub fn walk_assignment<V: Visit + ?Sized>(v: &mut V, assign: &Assignment) -> Result<(), V::Error> {
    v.visit_expr(&assign.lvalue)?;
    v.visit_expr(&assign.rvalue)
}

pub fn walk_if<V: Visit + ?Sized>(v: &mut V, stmt: &IfStmt) -> Result<(), V::Error> {
    v.visit_expr(&stmt.cond)?;
    v.visit_block(&stmt.then_block)?;
    if let Some(else_block) = &stmt.else_block {
        v.visit_block(else_block)?;
    }
    Ok(())
}

pub fn walk_while<V: Visit + ?Sized>(v: &mut V, stmt: &WhileStmt) -> Result<(), V::Error> {
    v.visit_expr(&stmt.cond)?;
    v.visit_block(&stmt.body)
}

pub fn walk_return<V: Visit + ?Sized>(v: &mut V, stmt: &ReturnStmt) -> Result<(), V::Error> {
    match &stmt.value {
        Some(value) => v.visit_expr(value),
        None => Ok(()),
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Expr) -> Result<(), V::Error> {
    match &expr.kind {
        ExprKind::Ident(_) | ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Bool(_) => Ok(()),
        ExprKind::Array(items) => {
            for item in items {
                v.visit_expr(item)?;
            }
            Ok(())
        }
        ExprKind::Object(fields) => {
            for (_, value) in fields {
                v.visit_expr(value)?;
            }
            Ok(())
        }
        ExprKind::Prefix { expr, .. } | ExprKind::Postfix { expr, .. } => v.visit_expr(expr),
        ExprKind::Infix { left, right, .. } => {
            v.visit_expr(left)?;
            v.visit_expr(right)
        }
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            v.visit_expr(cond)?;
            v.visit_expr(then_expr)?;
            v.visit_expr(else_expr)
        }
        ExprKind::Dot { owner, .. } => v.visit_expr(owner),
        ExprKind::Call { callee, args } => {
            v.visit_expr(callee)?;
            for arg in args {
                v.visit_argument(arg)?;
            }
            Ok(())
        }
        ExprKind::Subscript { base, index } => {
            v.visit_expr(base)?;
            v.visit_expr(index)
        }
        ExprKind::Paren(inner) => v.visit_expr(inner),
    }
}
