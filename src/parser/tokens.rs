//! Token stream produced by the lexer

/// The kind of a lexed token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Numeric literal, already parsed to the closest IEEE-754 double.
    Number(f64),
    /// Identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    Ident,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Dollar,
    Hash,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    EqEq,
    NotEq,
    /// End of input; positioned one past the final character.
    Eof,
}

/// A token with its source lexeme and 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// The lexeme exactly as written, used in error messages.
    pub text: String,
    pub line: u32,
    pub col: u32,
}

impl Token {
    pub(crate) fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
