//! Lexer for the formula language
//!
//! Scans an input string into a token stream. UTF-8 input is accepted but
//! only ASCII is semantically significant; any character outside the token
//! table is a syntax error carrying its 1-based line and column. The stream
//! always ends with an explicit EOF token positioned one past the final
//! character, which the parser uses for end-of-formula diagnostics.

use crate::core::error::ValidationError;
use crate::parser::tokens::{Token, TokenKind};

/// Scan `input` into tokens.
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ValidationError> {
    Scanner::new(input).run()
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Scanner {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>, ValidationError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek() {
            let (line, col) = (self.line, self.col);
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '0'..='9' => tokens.push(self.number(line, col)),
                c if c.is_ascii_alphabetic() || c == '_' => tokens.push(self.ident(line, col)),
                '+' => tokens.push(self.single(TokenKind::Plus, line, col)),
                '-' => tokens.push(self.single(TokenKind::Minus, line, col)),
                '*' => tokens.push(self.single(TokenKind::Star, line, col)),
                '/' => tokens.push(self.single(TokenKind::Slash, line, col)),
                '%' => tokens.push(self.single(TokenKind::Percent, line, col)),
                '^' => tokens.push(self.single(TokenKind::Caret, line, col)),
                '(' => tokens.push(self.single(TokenKind::LParen, line, col)),
                ')' => tokens.push(self.single(TokenKind::RParen, line, col)),
                '[' => tokens.push(self.single(TokenKind::LBracket, line, col)),
                ']' => tokens.push(self.single(TokenKind::RBracket, line, col)),
                ',' => tokens.push(self.single(TokenKind::Comma, line, col)),
                '.' => tokens.push(self.single(TokenKind::Dot, line, col)),
                '$' => tokens.push(self.single(TokenKind::Dollar, line, col)),
                '#' => tokens.push(self.single(TokenKind::Hash, line, col)),
                '>' | '<' | '=' | '!' => tokens.push(self.comparison(line, col)?),
                _ => {
                    return Err(ValidationError::syntax_near(c.to_string(), line, col));
                }
            }
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            line: self.line,
            col: self.col,
        });
        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind, line: u32, col: u32) -> Token {
        let text = self.bump().map(|c| c.to_string()).unwrap_or_default();
        Token {
            kind,
            text,
            line,
            col,
        }
    }

    /// Longest match: `>=` beats `>`, `<=` beats `<`. Lone `=` and `!` are
    /// not tokens.
    fn comparison(&mut self, line: u32, col: u32) -> Result<Token, ValidationError> {
        let Some(first) = self.bump() else {
            return Err(ValidationError::UnexpectedEnd { line, col });
        };
        let followed_by_eq = self.peek() == Some('=');
        let (kind, text) = match (first, followed_by_eq) {
            ('>', true) => (TokenKind::GreaterEq, ">="),
            ('>', false) => (TokenKind::Greater, ">"),
            ('<', true) => (TokenKind::LessEq, "<="),
            ('<', false) => (TokenKind::Less, "<"),
            ('=', true) => (TokenKind::EqEq, "=="),
            ('!', true) => (TokenKind::NotEq, "!="),
            _ => {
                return Err(ValidationError::syntax_near(first.to_string(), line, col));
            }
        };
        if followed_by_eq {
            self.bump();
        }
        Ok(Token {
            kind,
            text: text.to_string(),
            line,
            col,
        })
    }

    /// `[0-9]+ ( '.' [0-9]+ )? ( [eE] [+-]? [0-9]+ )?`
    ///
    /// A `.` not followed by a digit is left in the stream as a Dot token
    /// (it may start a unit suffix), and an `e` not followed by a valid
    /// exponent is left as the start of an identifier.
    fn number(&mut self, line: u32, col: u32) -> Token {
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.bump();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_len = match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => Some(1),
                Some('+' | '-') if self.peek_at(2).is_some_and(|c| c.is_ascii_digit()) => Some(2),
                _ => None,
            };
            if let Some(prefix) = exponent_len {
                for _ in 0..prefix {
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
        }

        // The grammar guarantees the collected text is a valid float.
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        Token {
            kind: TokenKind::Number(value),
            text,
            line,
            col,
        }
    }

    fn ident(&mut self, line: u32, col: u32) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Token {
            kind: TokenKind::Ident,
            text,
            line,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::lex;
    use crate::core::error::ValidationError;
    use crate::parser::tokens::TokenKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input)
            .expect("lex should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_numbers() {
        assert_eq!(
            kinds("3.14"),
            vec![TokenKind::Number(3.14), TokenKind::Eof]
        );
        assert_eq!(
            kinds("2.5e-3"),
            vec![TokenKind::Number(0.0025), TokenKind::Eof]
        );
        assert_eq!(kinds("1e10"), vec![TokenKind::Number(1e10), TokenKind::Eof]);
    }

    #[test]
    fn dot_without_digits_stays_a_dot() {
        // "1." lexes as number then dot so "$d.km" style suffixes work
        assert_eq!(
            kinds("1."),
            vec![TokenKind::Number(1.0), TokenKind::Dot, TokenKind::Eof]
        );
    }

    #[test]
    fn bare_exponent_is_an_identifier() {
        assert_eq!(
            kinds("1e"),
            vec![TokenKind::Number(1.0), TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn longest_match_comparisons() {
        assert_eq!(
            kinds("a>=b"),
            vec![
                TokenKind::Ident,
                TokenKind::GreaterEq,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("1<2"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Less,
                TokenKind::Number(2.0),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn variable_reference_tokens() {
        assert_eq!(
            kinds("$temps[1].km"),
            vec![
                TokenKind::Dollar,
                TokenKind::Ident,
                TokenKind::LBracket,
                TokenKind::Number(1.0),
                TokenKind::RBracket,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unknown_character_reports_position() {
        let err = lex("1 + @").expect_err("@ is not a token");
        assert_eq!(
            err,
            ValidationError::syntax_near("@", 1, 5)
        );
    }

    #[test]
    fn lone_equals_is_an_error() {
        let err = lex("a = b").expect_err("= is not a token");
        assert_eq!(err, ValidationError::syntax_near("=", 1, 3));
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = lex("1 +\n 2").expect("lex should succeed");
        let positions: Vec<(u32, u32)> = tokens.iter().map(|t| (t.line, t.col)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 3), (2, 2), (2, 3)]);
    }

    #[test]
    fn eof_column_is_one_past_the_end() {
        let tokens = lex("5 + ").expect("lex should succeed");
        let eof = tokens.last().expect("stream ends with EOF");
        assert!(eof.is_eof());
        assert_eq!((eof.line, eof.col), (1, 5));
    }
}
