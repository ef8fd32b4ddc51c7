#![forbid(unsafe_code)]

use std::mem;

use safescript_ast::{
    Argument, Assignment, Binding, BindingOp, Block, ClassDecl, Expr, ExprKind, FunDecl, Ident,
    IfStmt, InfixOp, Mutability, NodeId, ParamDecl, PostfixOp, PrefixOp, ReturnStmt, Span, Stmt,
    VarDecl, WhileStmt, join, span_between,
};
use safescript_lex::{Token, TokenKind};

use crate::error::ParseError;

pub struct Parser<'a> {
    tokens: &'a [Token],
    idx: usize,
    next_id: u32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            idx: 0,
            next_id: 0,
        }
    }

    /// Parse a whole source file into its module block.
    pub fn parse_module(&mut self) -> Result<Block, ParseError> {
        let id = self.fresh_id();
        let mut stmts = Vec::new();
        self.skip_delimiters();
        while !self.at(TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
            self.expect_stmt_terminator()?;
            self.skip_delimiters();
        }
        Ok(Block {
            id,
            span: self.module_span(),
            stmts,
        })
    }

    /// Parse a module while attempting to recover from errors.
    ///
    /// On a statement parse error, tokens are skipped up to the next statement
    /// delimiter and parsing resumes. Intended for best-effort diagnostics.
    pub fn parse_module_with_recovery(&mut self) -> (Block, Vec<ParseError>) {
        let id = self.fresh_id();
        let mut stmts = Vec::new();
        let mut errors = Vec::new();

        self.skip_delimiters();
        while !self.at(TokenKind::Eof) {
            match self
                .parse_stmt()
                .and_then(|stmt| self.expect_stmt_terminator().map(|()| stmt))
            {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    errors.push(err);
                    self.recover_to_stmt_boundary();
                }
            }
            self.skip_delimiters();
        }

        let module = Block {
            id,
            span: self.module_span(),
            stmts,
        };
        (module, errors)
    }

    fn recover_to_stmt_boundary(&mut self) {
        while !self.at(TokenKind::Eof) {
            if self.peek_kind().is_some_and(TokenKind::is_delimiter) {
                self.next();
                break;
            }
            self.next();
        }
    }

    fn module_span(&self) -> Span {
        let end = self
            .tokens
            .last()
            .map(|t| t.span.offset() + t.span.len())
            .unwrap_or(0);
        span_between(0, end)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::KwLet) | Some(TokenKind::KwConst) => {
                Ok(Stmt::VarDecl(self.parse_var_decl()?))
            }
            Some(TokenKind::KwFunction) => Ok(Stmt::FunDecl(self.parse_fun_decl()?)),
            Some(TokenKind::KwClass) => Ok(Stmt::ClassDecl(self.parse_class_decl()?)),
            Some(TokenKind::KwIf) => Ok(Stmt::If(self.parse_if_stmt()?)),
            Some(TokenKind::KwWhile) => Ok(Stmt::While(self.parse_while_stmt()?)),
            Some(TokenKind::KwReturn) => Ok(Stmt::Return(self.parse_return_stmt()?)),
            Some(TokenKind::KwBreak) => {
                let tok = self.expect(TokenKind::KwBreak)?;
                Ok(Stmt::Break(tok.span))
            }
            Some(TokenKind::KwContinue) => {
                let tok = self.expect(TokenKind::KwContinue)?;
                Ok(Stmt::Continue(tok.span))
            }
            Some(TokenKind::LBrace) => Ok(Stmt::Block(self.parse_brace_block()?)),
            Some(
                kind @ (TokenKind::KwFor
                | TokenKind::KwSwitch
                | TokenKind::KwCase
                | TokenKind::KwYield
                | TokenKind::KwStatic
                | TokenKind::KwNew),
            ) => Err(ParseError {
                message: format!("{kind} is reserved but not supported"),
                span: self.peek_span().unwrap_or_else(|| span_between(0, 0)),
            }),
            _ => {
                let lvalue = self.parse_expr()?;
                match self.binding_op() {
                    Some(op) => {
                        self.next();
                        self.skip_newlines();
                        let rvalue = self.parse_expr()?;
                        Ok(Stmt::Assign(Assignment {
                            span: join(lvalue.span, rvalue.span),
                            lvalue,
                            op,
                            rvalue,
                        }))
                    }
                    None => Ok(Stmt::Expr(lvalue)),
                }
            }
        }
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let start = self.expect_any()?;
        let reassignable = match start.kind {
            TokenKind::KwLet => true,
            TokenKind::KwConst => false,
            other => {
                return Err(ParseError {
                    message: format!("expected `let` or `const`, found {other}"),
                    span: start.span,
                });
            }
        };

        let name = self.expect_ident()?;
        let mut end = name.span;

        let mutability = match self.parse_qualifier()? {
            Some((q, span)) => {
                end = span;
                q
            }
            None => Mutability::Const,
        };

        let init = self.parse_binding_opt()?;
        if let Some(b) = &init {
            end = b.value.span;
        }

        Ok(VarDecl {
            id: self.fresh_id(),
            span: join(start.span, end),
            name,
            reassignable,
            mutability,
            init,
        })
    }

    /// `: mutable` or `: const`.
    fn parse_qualifier(&mut self) -> Result<Option<(Mutability, Span)>, ParseError> {
        if !self.at(TokenKind::Colon) {
            return Ok(None);
        }
        self.next();
        let tok = self.expect_any()?;
        let q = match tok.kind {
            TokenKind::KwMutable => Mutability::Mutable,
            TokenKind::KwConst => Mutability::Const,
            other => {
                return Err(ParseError {
                    message: format!("expected mutability qualifier, found {other}"),
                    span: tok.span,
                });
            }
        };
        Ok(Some((q, tok.span)))
    }

    fn parse_binding_opt(&mut self) -> Result<Option<Binding>, ParseError> {
        let Some(op) = self.binding_op() else {
            return Ok(None);
        };
        self.next();
        self.skip_newlines();
        let value = self.parse_expr()?;
        Ok(Some(Binding { op, value }))
    }

    fn binding_op(&self) -> Option<BindingOp> {
        match self.peek_kind() {
            Some(TokenKind::Eq) => Some(BindingOp::Copy),
            Some(TokenKind::AmpMinus) => Some(BindingOp::Borrow),
            _ => None,
        }
    }

    fn parse_fun_decl(&mut self) -> Result<FunDecl, ParseError> {
        let start = self.expect(TokenKind::KwFunction)?;
        let name = self.expect_ident()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;

        let ret_mutability = self
            .parse_qualifier()?
            .map(|(q, _)| q)
            .unwrap_or(Mutability::Const);

        self.skip_newlines();
        let body = self.parse_brace_block()?;

        Ok(FunDecl {
            id: self.fresh_id(),
            span: join(start.span, body.span),
            name,
            params,
            ret_mutability,
            body,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<ParamDecl>, ParseError> {
        let mut params = Vec::new();
        self.skip_newlines();
        if self.at(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.parse_param()?);
            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.next();
                self.skip_newlines();
                if self.at(TokenKind::RParen) {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<ParamDecl, ParseError> {
        let name = self.expect_ident()?;
        let mut end = name.span;

        let mutability = match self.parse_qualifier()? {
            Some((q, span)) => {
                end = span;
                q
            }
            None => Mutability::Const,
        };

        let default = self.parse_binding_opt()?;
        if let Some(b) = &default {
            end = b.value.span;
        }

        Ok(ParamDecl {
            id: self.fresh_id(),
            span: join(name.span, end),
            name,
            mutability,
            default,
        })
    }

    fn parse_class_decl(&mut self) -> Result<ClassDecl, ParseError> {
        let start = self.expect(TokenKind::KwClass)?;
        let name = self.expect_ident()?;
        self.skip_newlines();
        self.expect(TokenKind::LBrace)?;

        let mut members = Vec::new();
        self.skip_delimiters();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return Err(ParseError {
                    message: "unterminated class body; expected `}`".to_string(),
                    span: start.span,
                });
            }
            let member = match self.peek_kind() {
                Some(TokenKind::KwLet) | Some(TokenKind::KwConst) => {
                    Stmt::VarDecl(self.parse_var_decl()?)
                }
                Some(TokenKind::KwFunction) => Stmt::FunDecl(self.parse_fun_decl()?),
                _ => {
                    return Err(ParseError {
                        message: "class members must be variable or function declarations"
                            .to_string(),
                        span: self.peek_span().unwrap_or(start.span),
                    });
                }
            };
            members.push(member);
            self.expect_stmt_terminator()?;
            self.skip_delimiters();
        }
        let rb = self.expect(TokenKind::RBrace)?;

        Ok(ClassDecl {
            id: self.fresh_id(),
            span: join(start.span, rb.span),
            name,
            members,
        })
    }

    fn parse_if_stmt(&mut self) -> Result<IfStmt, ParseError> {
        let start = self.expect(TokenKind::KwIf)?;
        let cond = self.parse_expr()?;
        self.skip_newlines();
        let then_block = self.parse_brace_block()?;
        let mut end = then_block.span;

        // `else` may sit on the line after the closing brace.
        let checkpoint = self.idx;
        self.skip_newlines();
        let else_block = if self.at(TokenKind::KwElse) {
            self.next();
            self.skip_newlines();
            let block = if self.at(TokenKind::KwIf) {
                let id = self.fresh_id();
                let nested = self.parse_if_stmt()?;
                Block {
                    id,
                    span: nested.span,
                    stmts: vec![Stmt::If(nested)],
                }
            } else {
                self.parse_brace_block()?
            };
            end = block.span;
            Some(block)
        } else {
            self.idx = checkpoint;
            None
        };

        Ok(IfStmt {
            span: join(start.span, end),
            cond,
            then_block,
            else_block,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<WhileStmt, ParseError> {
        let start = self.expect(TokenKind::KwWhile)?;
        let cond = self.parse_expr()?;
        self.skip_newlines();
        let body = self.parse_brace_block()?;
        Ok(WhileStmt {
            span: join(start.span, body.span),
            cond,
            body,
        })
    }

    fn parse_return_stmt(&mut self) -> Result<ReturnStmt, ParseError> {
        let start = self.expect(TokenKind::KwReturn)?;
        let ends_here = self.peek_kind().is_none_or(|k| {
            k.is_delimiter() || matches!(k, TokenKind::RBrace | TokenKind::Eof)
        });
        if ends_here {
            return Ok(ReturnStmt {
                span: start.span,
                value: None,
            });
        }
        let value = self.parse_expr()?;
        Ok(ReturnStmt {
            span: join(start.span, value.span),
            value: Some(value),
        })
    }

    fn parse_brace_block(&mut self) -> Result<Block, ParseError> {
        let lb = self.expect(TokenKind::LBrace)?;
        let id = self.fresh_id();

        let mut stmts = Vec::new();
        self.skip_delimiters();
        loop {
            if self.at(TokenKind::RBrace) {
                let rb = self.expect(TokenKind::RBrace)?;
                return Ok(Block {
                    id,
                    span: join(lb.span, rb.span),
                    stmts,
                });
            }
            if self.at(TokenKind::Eof) {
                return Err(ParseError {
                    message: "unterminated brace block; expected `}`".to_string(),
                    span: lb.span,
                });
            }
            stmts.push(self.parse_stmt()?);
            self.expect_stmt_terminator()?;
            self.skip_delimiters();
        }
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_infix_expr(0)?;
        if !self.at(TokenKind::Question) {
            return Ok(cond);
        }
        self.next();
        self.skip_newlines();
        let then_expr = self.parse_expr()?;
        self.skip_newlines();
        self.expect(TokenKind::Colon)?;
        self.skip_newlines();
        let else_expr = self.parse_expr()?;
        Ok(Expr {
            id: self.fresh_id(),
            span: join(cond.span, else_expr.span),
            kind: ExprKind::Ternary {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
        })
    }

    pub fn parse_expr_eof(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.skip_delimiters();
        if !self.at(TokenKind::Eof) {
            return Err(ParseError {
                message: "expected end of input".to_string(),
                span: self.peek_span().unwrap_or_else(|| span_between(0, 0)),
            });
        }
        Ok(expr)
    }

    /// Precedence climbing over the infix operator table.
    fn parse_infix_expr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix_expr()?;
        loop {
            let Some(op) = self.peek_kind().and_then(infix_op) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.next();
            self.skip_newlines();
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let right = self.parse_infix_expr(next_min)?;
            left = Expr {
                id: self.fresh_id(),
                span: join(left.span, right.span),
                kind: ExprKind::Infix {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn parse_prefix_expr(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = self.peek_kind().and_then(prefix_op) else {
            return self.parse_postfix_expr();
        };
        let tok = self.expect_any()?;
        let expr = self.parse_prefix_expr()?;
        Ok(Expr {
            id: self.fresh_id(),
            span: join(tok.span, expr.span),
            kind: ExprKind::Prefix {
                op,
                expr: Box::new(expr),
            },
        })
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::LParen) => {
                    self.next();
                    let args = self.parse_args()?;
                    let rp = self.expect(TokenKind::RParen)?;
                    expr = Expr {
                        id: self.fresh_id(),
                        span: join(expr.span, rp.span),
                        kind: ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                    };
                }
                Some(TokenKind::LBracket) => {
                    self.next();
                    self.skip_newlines();
                    let index = self.parse_expr()?;
                    self.skip_newlines();
                    let rb = self.expect(TokenKind::RBracket)?;
                    expr = Expr {
                        id: self.fresh_id(),
                        span: join(expr.span, rb.span),
                        kind: ExprKind::Subscript {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                    };
                }
                Some(TokenKind::Dot) => {
                    self.next();
                    let attribute = self.expect_ident()?;
                    expr = Expr {
                        id: self.fresh_id(),
                        span: join(expr.span, attribute.span),
                        kind: ExprKind::Dot {
                            owner: Box::new(expr),
                            attribute,
                        },
                    };
                }
                Some(TokenKind::PlusPlus) | Some(TokenKind::MinusMinus) => {
                    let tok = self.expect_any()?;
                    let op = if matches!(tok.kind, TokenKind::PlusPlus) {
                        PostfixOp::Incr
                    } else {
                        PostfixOp::Decr
                    };
                    expr = Expr {
                        id: self.fresh_id(),
                        span: join(expr.span, tok.span),
                        kind: ExprKind::Postfix {
                            op,
                            expr: Box::new(expr),
                        },
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut args = Vec::new();
        self.skip_newlines();
        if self.at(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            let amp = if self.at(TokenKind::Amp) {
                let tok = self.expect_any()?;
                self.skip_newlines();
                Some(tok)
            } else {
                None
            };
            let value = self.parse_expr()?;
            let start = amp.as_ref().map(|t| t.span).unwrap_or(value.span);
            args.push(Argument {
                span: join(start, value.span),
                by_ref: amp.is_some(),
                value,
            });

            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.next();
                self.skip_newlines();
                if self.at(TokenKind::RParen) {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(args)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let tok = self.expect_any()?;
        let kind = match tok.kind {
            TokenKind::Ident(name) => ExprKind::Ident(Ident::new(tok.span, name)),
            TokenKind::Number(n) => ExprKind::Number(n),
            TokenKind::String(s) => ExprKind::Str(s),
            TokenKind::KwTrue => ExprKind::Bool(true),
            TokenKind::KwFalse => ExprKind::Bool(false),
            TokenKind::LParen => {
                self.skip_newlines();
                let inner = self.parse_expr()?;
                self.skip_newlines();
                let rp = self.expect(TokenKind::RParen)?;
                return Ok(Expr {
                    id: self.fresh_id(),
                    span: join(tok.span, rp.span),
                    kind: ExprKind::Paren(Box::new(inner)),
                });
            }
            TokenKind::LBracket => return self.parse_array_lit(tok.span),
            TokenKind::LBrace => return self.parse_object_lit(tok.span),
            other => {
                return Err(ParseError {
                    message: format!("expected an expression, found {other}"),
                    span: tok.span,
                });
            }
        };
        Ok(Expr {
            id: self.fresh_id(),
            span: tok.span,
            kind,
        })
    }

    fn parse_array_lit(&mut self, start: Span) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.at(TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.next();
                self.skip_newlines();
                continue;
            }
            if !self.at(TokenKind::RBracket) {
                return Err(ParseError {
                    message: "expected `,` or `]` in array literal".to_string(),
                    span: self.peek_span().unwrap_or(start),
                });
            }
        }
        let rb = self.expect(TokenKind::RBracket)?;
        Ok(Expr {
            id: self.fresh_id(),
            span: join(start, rb.span),
            kind: ExprKind::Array(items),
        })
    }

    fn parse_object_lit(&mut self, start: Span) -> Result<Expr, ParseError> {
        let mut fields: Vec<(Ident, Expr)> = Vec::new();
        self.skip_newlines();
        while !self.at(TokenKind::RBrace) {
            let key_tok = self.expect_any()?;
            let key = match key_tok.kind {
                TokenKind::Ident(name) | TokenKind::String(name) => Ident::new(key_tok.span, name),
                other => {
                    return Err(ParseError {
                        message: format!("expected a property name, found {other}"),
                        span: key_tok.span,
                    });
                }
            };
            self.skip_newlines();
            self.expect(TokenKind::Colon)?;
            self.skip_newlines();
            let value = self.parse_expr()?;
            fields.push((key, value));

            self.skip_newlines();
            if self.at(TokenKind::Comma) {
                self.next();
                self.skip_newlines();
                continue;
            }
            if !self.at(TokenKind::RBrace) {
                return Err(ParseError {
                    message: "expected `,` or `}` in object literal".to_string(),
                    span: self.peek_span().unwrap_or(start),
                });
            }
        }
        let rb = self.expect(TokenKind::RBrace)?;
        Ok(Expr {
            id: self.fresh_id(),
            span: join(start, rb.span),
            kind: ExprKind::Object(fields),
        })
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.next();
        }
    }

    fn skip_delimiters(&mut self) {
        while self.peek_kind().is_some_and(TokenKind::is_delimiter) {
            self.next();
        }
    }

    fn expect_stmt_terminator(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            Some(k) if k.is_delimiter() => {
                self.next();
                Ok(())
            }
            Some(TokenKind::RBrace) | Some(TokenKind::Eof) | None => Ok(()),
            Some(other) => Err(ParseError {
                message: format!("expected a statement delimiter, found {other}"),
                span: self.peek_span().unwrap_or_else(|| span_between(0, 0)),
            }),
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        let tok = self.expect_any()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok(Ident::new(tok.span, name)),
            other => Err(ParseError {
                message: format!("expected identifier, found {other}"),
                span: tok.span,
            }),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let tok = self.expect_any()?;
        if mem::discriminant(&tok.kind) == mem::discriminant(&expected) {
            Ok(tok)
        } else {
            Err(ParseError {
                message: format!("expected {expected}, found {}", tok.kind),
                span: tok.span,
            })
        }
    }

    fn expect_any(&mut self) -> Result<Token, ParseError> {
        let eof_span = self.tokens.last().map(|t| t.span);
        self.next().ok_or_else(|| ParseError {
            message: "unexpected end of input".to_string(),
            span: eof_span.unwrap_or_else(|| span_between(0, 0)),
        })
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind()
            .is_some_and(|k| mem::discriminant(k) == mem::discriminant(&kind))
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.idx)?.clone();
        self.idx += 1;
        Some(tok)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.idx).map(|t| &t.kind)
    }

    fn peek_span(&self) -> Option<Span> {
        self.tokens.get(self.idx).map(|t| t.span)
    }
}

fn infix_op(kind: &TokenKind) -> Option<InfixOp> {
    Some(match kind {
        TokenKind::OrOr => InfixOp::Or,
        TokenKind::AndAnd => InfixOp::And,
        TokenKind::Pipe => InfixOp::BitOr,
        TokenKind::Caret => InfixOp::BitXor,
        TokenKind::Amp => InfixOp::BitAnd,
        TokenKind::EqEq => InfixOp::Eq,
        TokenKind::Neq => InfixOp::Ne,
        TokenKind::EqEqEq => InfixOp::StrictEq,
        TokenKind::NeqEq => InfixOp::StrictNe,
        TokenKind::KwIn => InfixOp::In,
        TokenKind::KwInstanceOf => InfixOp::InstanceOf,
        TokenKind::Lt => InfixOp::Lt,
        TokenKind::Le => InfixOp::Le,
        TokenKind::Ge => InfixOp::Ge,
        TokenKind::Gt => InfixOp::Gt,
        TokenKind::Shl => InfixOp::Shl,
        TokenKind::Shr => InfixOp::Shr,
        TokenKind::UShr => InfixOp::UShr,
        TokenKind::Plus => InfixOp::Add,
        TokenKind::Minus => InfixOp::Sub,
        TokenKind::Star => InfixOp::Mul,
        TokenKind::Slash => InfixOp::Div,
        TokenKind::Percent => InfixOp::Mod,
        TokenKind::StarStar => InfixOp::Pow,
        _ => return None,
    })
}

fn prefix_op(kind: &TokenKind) -> Option<PrefixOp> {
    Some(match kind {
        TokenKind::Bang => PrefixOp::Not,
        TokenKind::Tilde => PrefixOp::BitNot,
        TokenKind::Minus => PrefixOp::Neg,
        TokenKind::Plus => PrefixOp::Plus,
        TokenKind::PlusPlus => PrefixOp::Incr,
        TokenKind::MinusMinus => PrefixOp::Decr,
        TokenKind::KwTypeOf => PrefixOp::TypeOf,
        TokenKind::KwVoid => PrefixOp::Void,
        TokenKind::KwDelete => PrefixOp::Delete,
        TokenKind::KwAwait => PrefixOp::Await,
        _ => return None,
    })
}
