//! Recursive-descent parser
//!
//! Implements the grammar:
//!
//! ```text
//! formula  := expr EOF
//! expr     := cmp
//! cmp      := add ( (>= | <= | == | != | > | <) add )*      -- left-assoc
//! add      := mul ( (+ | -) mul )*                          -- left-assoc
//! mul      := pow ( (* | / | %) pow )*                      -- left-assoc
//! pow      := unary ( ^ unary )*                            -- left-assoc
//! unary    := + unary | - unary | primary
//! primary  := NUMBER | '$' IDENT suffix* | '#' IDENT
//!           | IDENT '(' (expr (',' expr)*)? ')' | '(' expr ')'
//! suffix   := '.' IDENT | '[' expr ']'
//! ```
//!
//! The power operator is left-associative by default (`2^3^2` is `64`); the
//! `right_associative_pow` option switches it to the conventional right
//! associativity. The first error wins and no partial tree is returned.

use crate::core::error::ValidationError;
use crate::core::expr::{BinaryOp, Expr, Suffix, UnaryOp};
use crate::parser::ParseOptions;
use crate::parser::tokens::{Token, TokenKind};

/// Parse a token stream (ending in EOF) into an expression tree.
pub(crate) fn parse_tokens(
    tokens: &[Token],
    options: &ParseOptions,
) -> Result<Expr, ValidationError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth: options.max_depth,
        right_associative_pow: options.right_associative_pow,
    };
    parser.formula()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
    right_associative_pow: bool,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &'a Token {
        // The stream always terminates with an EOF token and `pos` never
        // advances past it.
        self.tokens.get(self.pos).unwrap_or(&EMPTY_EOF)
    }

    fn advance(&mut self) {
        if !self.peek().is_eof() {
            self.pos += 1;
        }
    }

    /// `Syntax error near` at the current token, or end-of-formula at EOF.
    fn syntax_here(&self) -> ValidationError {
        let token = self.peek();
        if token.is_eof() {
            ValidationError::UnexpectedEnd {
                line: token.line,
                col: token.col,
            }
        } else {
            ValidationError::syntax_near(token.text.clone(), token.line, token.col)
        }
    }

    /// `Unexpected token` at the current token, or end-of-formula at EOF.
    fn unexpected_here(&self) -> ValidationError {
        let token = self.peek();
        if token.is_eof() {
            ValidationError::UnexpectedEnd {
                line: token.line,
                col: token.col,
            }
        } else {
            ValidationError::unexpected_token(token.text.clone(), token.line, token.col)
        }
    }

    fn expect_ident(&mut self) -> Result<String, ValidationError> {
        if matches!(self.peek().kind, TokenKind::Ident) {
            let text = self.peek().text.clone();
            self.advance();
            Ok(text)
        } else {
            Err(self.syntax_here())
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ValidationError> {
        if &self.peek().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_here())
        }
    }

    fn formula(&mut self) -> Result<Expr, ValidationError> {
        let expr = self.expr()?;
        if self.peek().is_eof() {
            Ok(expr)
        } else {
            Err(self.unexpected_here())
        }
    }

    fn expr(&mut self) -> Result<Expr, ValidationError> {
        if self.depth >= self.max_depth {
            return Err(ValidationError::FormulaTooDeep);
        }
        self.depth += 1;
        let result = self.cmp();
        self.depth -= 1;
        result
    }

    fn cmp(&mut self) -> Result<Expr, ValidationError> {
        let mut lhs = self.add()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::GreaterEq => BinaryOp::Ge,
                TokenKind::LessEq => BinaryOp::Le,
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::Less => BinaryOp::Lt,
                _ => break,
            };
            self.advance();
            let rhs = self.add()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn add(&mut self) -> Result<Expr, ValidationError> {
        let mut lhs = self.mul()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.mul()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn mul(&mut self) -> Result<Expr, ValidationError> {
        let mut lhs = self.pow()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let rhs = self.pow()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn pow(&mut self) -> Result<Expr, ValidationError> {
        let lhs = self.unary()?;
        if !matches!(self.peek().kind, TokenKind::Caret) {
            return Ok(lhs);
        }
        if self.right_associative_pow {
            self.advance();
            if self.depth >= self.max_depth {
                return Err(ValidationError::FormulaTooDeep);
            }
            self.depth += 1;
            let rhs = self.pow();
            self.depth -= 1;
            return Ok(Expr::binary(BinaryOp::Pow, lhs, rhs?));
        }
        let mut lhs = lhs;
        while matches!(self.peek().kind, TokenKind::Caret) {
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::binary(BinaryOp::Pow, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ValidationError> {
        let op = match self.peek().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.primary(),
        };
        self.advance();
        if self.depth >= self.max_depth {
            return Err(ValidationError::FormulaTooDeep);
        }
        self.depth += 1;
        let operand = self.unary();
        self.depth -= 1;
        Ok(Expr::unary(op, operand?))
    }

    fn primary(&mut self) -> Result<Expr, ValidationError> {
        match self.peek().kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Number(value))
            }
            TokenKind::Dollar => {
                self.advance();
                let name = self.expect_ident()?;
                let suffixes = self.suffixes()?;
                Ok(Expr::Variable { name, suffixes })
            }
            TokenKind::Hash => {
                self.advance();
                let name = self.expect_ident()?;
                Ok(Expr::Constant { name })
            }
            TokenKind::Ident => {
                let name = self.peek().text.clone();
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let args = self.call_args()?;
                Ok(Expr::Call { name, args })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected_here()),
        }
    }

    fn suffixes(&mut self) -> Result<Vec<Suffix>, ValidationError> {
        let mut suffixes = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    suffixes.push(Suffix::Unit(self.expect_ident()?));
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    suffixes.push(Suffix::Index(index));
                }
                _ => break,
            }
        }
        Ok(suffixes)
    }

    fn call_args(&mut self) -> Result<Vec<Expr>, ValidationError> {
        let mut args = Vec::new();
        if matches!(self.peek().kind, TokenKind::RParen) {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.peek().kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => {
                    self.advance();
                    return Ok(args);
                }
                _ => return Err(self.syntax_here()),
            }
        }
    }
}

static EMPTY_EOF: Token = Token {
    kind: TokenKind::Eof,
    text: String::new(),
    line: 1,
    col: 1,
};

#[cfg(test)]
mod tests {
    #![allow(clippy::panic, reason = "test assertions may panic")]

    use super::parse_tokens;
    use crate::core::error::ValidationError;
    use crate::core::expr::{BinaryOp, Expr, Suffix, UnaryOp};
    use crate::parser::{ParseOptions, lexer};

    fn parse(input: &str) -> Result<Expr, ValidationError> {
        let tokens = lexer::lex(input)?;
        parse_tokens(&tokens, &ParseOptions::default())
    }

    fn parse_right_pow(input: &str) -> Result<Expr, ValidationError> {
        let tokens = lexer::lex(input).expect("lex should succeed");
        let options = ParseOptions {
            right_associative_pow: true,
            ..ParseOptions::default()
        };
        parse_tokens(&tokens, &options)
    }

    #[test]
    fn additive_is_left_associative() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let expr = parse("1 - 2 - 3").expect("parse should succeed");
        let Expr::Binary { op, lhs, .. } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn power_is_left_associative_by_default() {
        // 2^3^2 parses as (2^3)^2
        let expr = parse("2^3^2").expect("parse should succeed");
        let Expr::Binary { op, lhs, rhs } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Pow);
        assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::Pow, .. }));
        assert_eq!(*rhs, Expr::Number(2.0));
    }

    #[test]
    fn power_right_associativity_behind_flag() {
        let expr = parse_right_pow("2^3^2").expect("parse should succeed");
        let Expr::Binary { op, lhs, rhs } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Pow);
        assert_eq!(*lhs, Expr::Number(2.0));
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn precedence_mul_over_add() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse("1 + 2 * 3").expect("parse should succeed");
        let Expr::Binary { op, rhs, .. } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn comparison_chains_left() {
        // 1 < 2 < 3 parses as (1 < 2) < 3
        let expr = parse("1 < 2 < 3").expect("parse should succeed");
        let Expr::Binary { op, lhs, .. } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op, BinaryOp::Lt);
        assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::Lt, .. }));
    }

    #[test]
    fn unary_chain() {
        let expr = parse("--1").expect("parse should succeed");
        let Expr::Unary { op, operand } = expr else {
            panic!("expected unary node");
        };
        assert_eq!(op, UnaryOp::Minus);
        assert!(matches!(*operand, Expr::Unary { .. }));
    }

    #[test]
    fn variable_with_suffixes() {
        let expr = parse("$d.km[0]").expect("parse should succeed");
        let Expr::Variable { name, suffixes } = expr else {
            panic!("expected variable node");
        };
        assert_eq!(name, "d");
        assert_eq!(suffixes.len(), 2);
        assert!(matches!(&suffixes[0], Suffix::Unit(u) if u == "km"));
        assert!(matches!(&suffixes[1], Suffix::Index(Expr::Number(n)) if *n == 0.0));
    }

    #[test]
    fn function_calls() {
        let expr = parse("max(1, 2, 3)").expect("parse should succeed");
        let Expr::Call { name, args } = expr else {
            panic!("expected call node");
        };
        assert_eq!(name, "max");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn trailing_input_is_unexpected_token() {
        let err = parse("1 2").expect_err("trailing number is invalid");
        assert_eq!(err, ValidationError::unexpected_token("2", 1, 3));
    }

    #[test]
    fn dangling_operator_names_eof() {
        let err = parse("5 + ").expect_err("dangling operator is invalid");
        assert_eq!(err, ValidationError::UnexpectedEnd { line: 1, col: 5 });
    }

    #[test]
    fn missing_close_paren_is_eof() {
        let err = parse("(1 + 2").expect_err("unclosed paren is invalid");
        assert_eq!(err, ValidationError::UnexpectedEnd { line: 1, col: 7 });
    }

    #[test]
    fn bare_identifier_requires_call() {
        let err = parse("abs").expect_err("bare identifier is invalid");
        assert_eq!(err, ValidationError::UnexpectedEnd { line: 1, col: 4 });
    }

    #[test]
    fn misplaced_comma_is_syntax_error() {
        let err = parse("max(1 2)").expect_err("missing comma is invalid");
        assert_eq!(err, ValidationError::syntax_near("2", 1, 7));
    }

    #[test]
    fn parse_is_deterministic() {
        let a = parse("min($a[0], 2 * #k) >= 3 ^ 2");
        let b = parse("min($a[0], 2 * #k) >= 3 ^ 2");
        assert_eq!(a, b);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        let err = parse(&deep).expect_err("300 nested parens exceed the limit");
        assert_eq!(err, ValidationError::FormulaTooDeep);
    }
}
