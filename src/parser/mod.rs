//! Parser module - converts formula strings to expression trees

mod descent;
mod lexer;
mod tokens;

use crate::core::error::ValidationError;
use crate::core::expr::Expr;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_FORMULA_LEN};

/// Limits and dialect switches applied while parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum accepted input length in characters.
    pub max_len: usize,
    /// Maximum grammar recursion depth.
    pub max_depth: usize,
    /// Parse `^` right-associatively instead of the default left.
    pub right_associative_pow: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_len: DEFAULT_MAX_FORMULA_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            right_associative_pow: false,
        }
    }
}

/// Parse a formula string into an expression tree.
///
/// The pipeline is: emptiness check → size limit → lex → recursive descent.
/// The first error wins; no partial tree is returned. Positions in error
/// messages are 1-based line and column of the submitted text.
///
/// # Example
/// ```
/// use formuval::{ParseOptions, parse};
///
/// let expr = parse("2 + 2", &ParseOptions::default()).unwrap();
/// assert_eq!(expr.node_count(), 3);
/// ```
pub fn parse(input: &str, options: &ParseOptions) -> Result<Expr, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyFormula);
    }
    if input.chars().count() > options.max_len {
        return Err(ValidationError::FormulaTooLarge);
    }
    let tokens = lexer::lex(input)?;
    descent::parse_tokens(&tokens, options)
}

#[cfg(test)]
mod tests {
    use super::{ParseOptions, parse};
    use crate::core::error::ValidationError;

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            parse("", &ParseOptions::default()),
            Err(ValidationError::EmptyFormula)
        );
        assert_eq!(
            parse("   \t\n", &ParseOptions::default()),
            Err(ValidationError::EmptyFormula)
        );
    }

    #[test]
    fn length_limit_applies_before_lexing() {
        let options = ParseOptions {
            max_len: 8,
            ..ParseOptions::default()
        };
        // Nine characters, including one the lexer would reject.
        assert_eq!(
            parse("1 + 2 @ 3", &options),
            Err(ValidationError::FormulaTooLarge)
        );
    }
}
