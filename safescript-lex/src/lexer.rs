#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use logos::Logos;
use miette::Diagnostic;
use safescript_ast::{Span, span_between};
use thiserror::Error;

use crate::token::{Token, TokenKind};

#[derive(Debug, Error, Diagnostic)]
#[error("lex error: {message}")]
#[diagnostic(code(safescript::lex))]
#[allow(unused_assignments)]
pub struct LexError {
    pub message: String,
    #[label]
    pub span: Span,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f\r]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum RawToken {
    #[token("let")]
    KwLet,
    #[token("const")]
    KwConst,
    #[token("mutable")]
    KwMutable,
    #[token("function")]
    KwFunction,
    #[token("class")]
    KwClass,
    #[token("static")]
    KwStatic,
    #[token("new")]
    KwNew,
    #[token("while")]
    KwWhile,
    #[token("for")]
    KwFor,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,
    #[token("return")]
    KwReturn,
    #[token("yield")]
    KwYield,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("switch")]
    KwSwitch,
    #[token("case")]
    KwCase,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,

    #[token("typeof")]
    KwTypeOf,
    #[token("void")]
    KwVoid,
    #[token("delete")]
    KwDelete,
    #[token("await")]
    KwAwait,
    #[token("in")]
    KwIn,
    #[token("instanceof")]
    KwInstanceOf,

    #[token("**")]
    StarStar,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    #[token("<<")]
    Shl,
    #[token(">>>")]
    UShr,
    #[token(">>")]
    Shr,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    #[token("===")]
    EqEqEq,
    #[token("!==")]
    NeqEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Neq,
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Eq,

    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("&-")]
    AmpMinus,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,

    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[token("\n")]
    Newline,
    #[token(";")]
    Semi,

    // Only reached when no closing `*/` follows; a closed comment is skipped above.
    #[token("/*")]
    UnterminatedComment,

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(Option<f64>),

    // Supported escapes: \n, \t, \r, \\, \" and \'.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, parse_string)]
    String(Option<String>),

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Ident(String),
}

fn parse_string(lex: &mut logos::Lexer<RawToken>) -> Option<String> {
    let s = lex.slice();
    let inner = &s[1..s.len().saturating_sub(1)];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            _ => return None,
        }
    }

    Some(out)
}

pub struct Lexer<'a> {
    src: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    pub fn lex(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut lex = RawToken::lexer(self.src);

        while let Some(raw) = lex.next() {
            let range = lex.span();
            let span = span_between(range.start, range.end);

            let kind = match raw {
                Ok(RawToken::KwLet) => TokenKind::KwLet,
                Ok(RawToken::KwConst) => TokenKind::KwConst,
                Ok(RawToken::KwMutable) => TokenKind::KwMutable,
                Ok(RawToken::KwFunction) => TokenKind::KwFunction,
                Ok(RawToken::KwClass) => TokenKind::KwClass,
                Ok(RawToken::KwStatic) => TokenKind::KwStatic,
                Ok(RawToken::KwNew) => TokenKind::KwNew,
                Ok(RawToken::KwWhile) => TokenKind::KwWhile,
                Ok(RawToken::KwFor) => TokenKind::KwFor,
                Ok(RawToken::KwBreak) => TokenKind::KwBreak,
                Ok(RawToken::KwContinue) => TokenKind::KwContinue,
                Ok(RawToken::KwReturn) => TokenKind::KwReturn,
                Ok(RawToken::KwYield) => TokenKind::KwYield,
                Ok(RawToken::KwIf) => TokenKind::KwIf,
                Ok(RawToken::KwElse) => TokenKind::KwElse,
                Ok(RawToken::KwSwitch) => TokenKind::KwSwitch,
                Ok(RawToken::KwCase) => TokenKind::KwCase,
                Ok(RawToken::KwTrue) => TokenKind::KwTrue,
                Ok(RawToken::KwFalse) => TokenKind::KwFalse,

                Ok(RawToken::KwTypeOf) => TokenKind::KwTypeOf,
                Ok(RawToken::KwVoid) => TokenKind::KwVoid,
                Ok(RawToken::KwDelete) => TokenKind::KwDelete,
                Ok(RawToken::KwAwait) => TokenKind::KwAwait,
                Ok(RawToken::KwIn) => TokenKind::KwIn,
                Ok(RawToken::KwInstanceOf) => TokenKind::KwInstanceOf,

                Ok(RawToken::StarStar) => TokenKind::StarStar,
                Ok(RawToken::Star) => TokenKind::Star,
                Ok(RawToken::Slash) => TokenKind::Slash,
                Ok(RawToken::Percent) => TokenKind::Percent,
                Ok(RawToken::PlusPlus) => TokenKind::PlusPlus,
                Ok(RawToken::MinusMinus) => TokenKind::MinusMinus,
                Ok(RawToken::Plus) => TokenKind::Plus,
                Ok(RawToken::Minus) => TokenKind::Minus,

                Ok(RawToken::Shl) => TokenKind::Shl,
                Ok(RawToken::UShr) => TokenKind::UShr,
                Ok(RawToken::Shr) => TokenKind::Shr,
                Ok(RawToken::Le) => TokenKind::Le,
                Ok(RawToken::Ge) => TokenKind::Ge,
                Ok(RawToken::Lt) => TokenKind::Lt,
                Ok(RawToken::Gt) => TokenKind::Gt,

                Ok(RawToken::EqEqEq) => TokenKind::EqEqEq,
                Ok(RawToken::NeqEq) => TokenKind::NeqEq,
                Ok(RawToken::EqEq) => TokenKind::EqEq,
                Ok(RawToken::Neq) => TokenKind::Neq,
                Ok(RawToken::FatArrow) => TokenKind::FatArrow,
                Ok(RawToken::Eq) => TokenKind::Eq,

                Ok(RawToken::AndAnd) => TokenKind::AndAnd,
                Ok(RawToken::OrOr) => TokenKind::OrOr,
                Ok(RawToken::AmpMinus) => TokenKind::AmpMinus,
                Ok(RawToken::Amp) => TokenKind::Amp,
                Ok(RawToken::Pipe) => TokenKind::Pipe,
                Ok(RawToken::Caret) => TokenKind::Caret,
                Ok(RawToken::Bang) => TokenKind::Bang,
                Ok(RawToken::Tilde) => TokenKind::Tilde,

                Ok(RawToken::Ellipsis) => TokenKind::Ellipsis,
                Ok(RawToken::Dot) => TokenKind::Dot,
                Ok(RawToken::Comma) => TokenKind::Comma,
                Ok(RawToken::Colon) => TokenKind::Colon,
                Ok(RawToken::Question) => TokenKind::Question,

                Ok(RawToken::LParen) => TokenKind::LParen,
                Ok(RawToken::RParen) => TokenKind::RParen,
                Ok(RawToken::LBrace) => TokenKind::LBrace,
                Ok(RawToken::RBrace) => TokenKind::RBrace,
                Ok(RawToken::LBracket) => TokenKind::LBracket,
                Ok(RawToken::RBracket) => TokenKind::RBracket,

                Ok(RawToken::Newline) => TokenKind::Newline,
                Ok(RawToken::Semi) => TokenKind::Semi,

                Ok(RawToken::UnterminatedComment) => {
                    return Err(LexError {
                        message: "unterminated block comment".to_string(),
                        span,
                    });
                }

                Ok(RawToken::Ident(s)) => TokenKind::Ident(s),
                Ok(RawToken::Number(Some(n))) => TokenKind::Number(n),
                Ok(RawToken::Number(None)) => {
                    return Err(LexError {
                        message: "invalid number literal".to_string(),
                        span,
                    });
                }
                Ok(RawToken::String(Some(s))) => TokenKind::String(s),
                Ok(RawToken::String(None)) => {
                    return Err(LexError {
                        message: "invalid string literal".to_string(),
                        span,
                    });
                }

                Err(_) => {
                    return Err(LexError {
                        message: "unexpected character".to_string(),
                        span,
                    });
                }
            };

            // Collapse runs of delimiters into the first one.
            if kind.is_delimiter() && tokens.last().is_some_and(|t| t.kind.is_delimiter()) {
                continue;
            }

            tokens.push(Token { kind, span });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: span_between(self.src.len(), self.src.len()),
        });

        Ok(tokens)
    }
}
