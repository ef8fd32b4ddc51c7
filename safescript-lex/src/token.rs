#![forbid(unsafe_code)]

use std::fmt;

use safescript_ast::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwLet,
    KwConst,
    KwMutable,
    KwFunction,
    KwClass,
    KwStatic,
    KwNew,
    KwWhile,
    KwFor,
    KwBreak,
    KwContinue,
    KwReturn,
    KwYield,
    KwIf,
    KwElse,
    KwSwitch,
    KwCase,
    KwTrue,
    KwFalse,

    // Keyword operators
    KwTypeOf,
    KwVoid,
    KwDelete,
    KwAwait,
    KwIn,
    KwInstanceOf,

    // Operators / punctuation
    StarStar,
    Star,
    Slash,
    Percent,
    Plus,
    Minus,
    Shl,
    Shr,
    UShr,
    Lt,
    Le,
    Ge,
    Gt,
    EqEq,
    Neq,
    EqEqEq,
    NeqEq,
    Bang,
    Tilde,
    Amp,
    Caret,
    Pipe,
    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,
    /// `=`, copy binding.
    Eq,
    /// `&-`, borrow binding.
    AmpMinus,
    FatArrow,
    Dot,
    Ellipsis,
    Comma,
    Colon,
    Question,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    /// Statement delimiters. A run of newlines and semicolons lexes as one token.
    Newline,
    Semi,
    Eof,

    // Literals / identifiers
    Ident(String),
    Number(f64),
    String(String),
}

impl TokenKind {
    pub fn is_delimiter(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semi)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::KwLet => "let",
            TokenKind::KwConst => "const",
            TokenKind::KwMutable => "mutable",
            TokenKind::KwFunction => "function",
            TokenKind::KwClass => "class",
            TokenKind::KwStatic => "static",
            TokenKind::KwNew => "new",
            TokenKind::KwWhile => "while",
            TokenKind::KwFor => "for",
            TokenKind::KwBreak => "break",
            TokenKind::KwContinue => "continue",
            TokenKind::KwReturn => "return",
            TokenKind::KwYield => "yield",
            TokenKind::KwIf => "if",
            TokenKind::KwElse => "else",
            TokenKind::KwSwitch => "switch",
            TokenKind::KwCase => "case",
            TokenKind::KwTrue => "true",
            TokenKind::KwFalse => "false",
            TokenKind::KwTypeOf => "typeof",
            TokenKind::KwVoid => "void",
            TokenKind::KwDelete => "delete",
            TokenKind::KwAwait => "await",
            TokenKind::KwIn => "in",
            TokenKind::KwInstanceOf => "instanceof",
            TokenKind::StarStar => "**",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::UShr => ">>>",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Ge => ">=",
            TokenKind::Gt => ">",
            TokenKind::EqEq => "==",
            TokenKind::Neq => "!=",
            TokenKind::EqEqEq => "===",
            TokenKind::NeqEq => "!==",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::Caret => "^",
            TokenKind::Pipe => "|",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Eq => "=",
            TokenKind::AmpMinus => "&-",
            TokenKind::FatArrow => "=>",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Newline => "newline",
            TokenKind::Semi => ";",
            TokenKind::Eof => "end of input",
            TokenKind::Ident(name) => return write!(f, "identifier `{name}`"),
            TokenKind::Number(n) => return write!(f, "number `{n}`"),
            TokenKind::String(_) => "string literal",
        };
        write!(f, "`{text}`")
    }
}
