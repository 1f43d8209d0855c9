//! Error types for the validation pipeline
//!
//! `ValidationError` covers every failure the pipeline can report: input
//! shape, lexing/parsing, semantic analysis, evaluation, and the final
//! numeric-domain checks. The `Display` impl is the single source of truth
//! for the user-facing message text; hosts serialize these messages verbatim.

use std::fmt;

/// Errors that can occur while validating and evaluating a formula
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    // Input-shape errors
    /// The formula was empty or contained only whitespace.
    EmptyFormula,
    /// The formula exceeded the configured character limit.
    FormulaTooLarge,
    /// The formula exceeded the configured nesting-depth limit.
    FormulaTooDeep,
    /// A measured value declared neither a scalar nor a non-empty vector,
    /// or declared both.
    MalformedValue {
        /// The normalized variable name.
        name: String,
    },
    /// A measured value carried a NaN or infinite component.
    NonFiniteValue {
        /// The normalized variable name.
        name: String,
    },
    /// A constant carried a NaN or infinite value.
    NonFiniteConstant {
        /// The normalized constant name.
        name: String,
    },
    /// Two measured values normalized to the same identifier.
    DuplicateVariable {
        /// The normalized variable name.
        name: String,
    },
    /// Two request constants normalized to the same identifier.
    DuplicateConstant {
        /// The normalized constant name.
        name: String,
    },

    // Syntactic errors
    /// A token sequence that does not fit the grammar.
    SyntaxNear {
        /// The offending lexeme.
        token: String,
        /// 1-based line of the lexeme.
        line: u32,
        /// 1-based column of the lexeme.
        col: u32,
    },
    /// A token that cannot appear at this position.
    UnexpectedToken {
        /// The offending lexeme.
        token: String,
        /// 1-based line of the lexeme.
        line: u32,
        /// 1-based column of the lexeme.
        col: u32,
    },
    /// The formula ended where more input was required.
    UnexpectedEnd {
        /// 1-based line one past the final character.
        line: u32,
        /// 1-based column one past the final character.
        col: u32,
    },

    // Semantic errors
    /// A referenced variable is not among the measured values.
    UndefinedVariable {
        /// The name as written in the formula.
        name: String,
    },
    /// A referenced constant is neither predefined nor supplied.
    UndefinedConstant {
        /// The name as written in the formula.
        name: String,
    },
    /// A scalar variable was referenced with an index suffix.
    ScalarIndexed {
        /// The name as written in the formula.
        name: String,
    },
    /// A vector variable was referenced without an index suffix.
    VectorNotIndexed {
        /// The name as written in the formula.
        name: String,
    },
    /// The same variable was referenced both with and without an index.
    MixedIndexUsage {
        /// The name as written in the formula.
        name: String,
    },
    /// A unit suffix was applied to a variable with no declared unit.
    MissingUnit {
        /// The name as written in the formula.
        name: String,
    },

    // Evaluation errors
    /// A single variable reference carried more than one index suffix.
    MultipleIndices {
        /// The name as written in the formula.
        name: String,
    },
    /// A single variable reference carried more than one unit suffix.
    MultipleUnits {
        /// The name as written in the formula.
        name: String,
    },
    /// An index expression evaluated to NaN or infinity.
    IndexNotFinite {
        /// The name as written in the formula.
        name: String,
    },
    /// An index expression evaluated to a non-integer.
    IndexNotInteger {
        /// The name as written in the formula.
        name: String,
    },
    /// An index expression evaluated to a negative number.
    IndexNegative {
        /// The name as written in the formula.
        name: String,
    },
    /// An index evaluated past the end of the vector.
    IndexOutOfRange {
        /// The rounded index value.
        index: i64,
        /// The name as written in the formula.
        name: String,
    },
    /// The unit resolver rejected a conversion.
    UnitConversion {
        /// The name as written in the formula.
        name: String,
        /// The unit declared on the measured value.
        from: String,
        /// The unit requested by the suffix.
        to: String,
    },
    /// A function name with no registry entry.
    UnknownFunction {
        /// The name as written in the formula.
        name: String,
    },
    /// A function called with the wrong number of arguments.
    ArityMismatch {
        /// The nearer bound of the accepted arity range.
        expected: usize,
    },
    /// A function rejected its arguments (e.g. factorial of a negative).
    InvalidOperation {
        /// Description of the rejection.
        message: String,
    },

    // Numeric-domain errors
    /// The final value was NaN.
    ResultNaN,
    /// The final value was positive or negative infinity.
    ResultInfinite,

    /// Catch-all for implementer-side bugs; should never fire.
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl ValidationError {
    /// Create a `SyntaxNear` error from a lexeme and its position
    pub fn syntax_near(token: impl Into<String>, line: u32, col: u32) -> Self {
        ValidationError::SyntaxNear {
            token: token.into(),
            line,
            col,
        }
    }

    /// Create an `UnexpectedToken` error from a lexeme and its position
    pub fn unexpected_token(token: impl Into<String>, line: u32, col: u32) -> Self {
        ValidationError::UnexpectedToken {
            token: token.into(),
            line,
            col,
        }
    }

    /// Create an `Internal` error from any message
    pub fn internal(message: impl Into<String>) -> Self {
        ValidationError::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyFormula => write!(f, "Formula cannot be empty"),
            ValidationError::FormulaTooLarge => write!(f, "Formula too large"),
            ValidationError::FormulaTooDeep => write!(f, "Formula too deep"),
            ValidationError::MalformedValue { name } => {
                write!(
                    f,
                    "Variable '${}' must define exactly one of a value or a list of values.",
                    name
                )
            }
            ValidationError::NonFiniteValue { name } => {
                write!(f, "Variable '${}' must be finite.", name)
            }
            ValidationError::NonFiniteConstant { name } => {
                write!(f, "Constant '#{}' must be finite.", name)
            }
            ValidationError::DuplicateVariable { name } => {
                write!(f, "Duplicate variable: ${}", name)
            }
            ValidationError::DuplicateConstant { name } => {
                write!(f, "Duplicate constant: #{}", name)
            }
            ValidationError::SyntaxNear { token, line, col } => {
                write!(
                    f,
                    "Syntax error near '{}' at [line {}, col {}]",
                    token, line, col
                )
            }
            ValidationError::UnexpectedToken { token, line, col } => {
                write!(
                    f,
                    "Unexpected token: '{}' at [line {}, col {}]",
                    token, line, col
                )
            }
            ValidationError::UnexpectedEnd { line, col } => {
                write!(f, "Unexpected end of formula at [line {}, col {}]", line, col)
            }
            ValidationError::UndefinedVariable { name } => {
                write!(f, "Undefined variable: ${}", name)
            }
            ValidationError::UndefinedConstant { name } => {
                write!(f, "Undefined constant: #{}", name)
            }
            ValidationError::ScalarIndexed { name } => {
                write!(f, "Variable '{}' is scalar but is used with an index.", name)
            }
            ValidationError::VectorNotIndexed { name } => {
                write!(
                    f,
                    "Variable '{}' is non-scalar. Use an index like '${}[i]'.",
                    name, name
                )
            }
            ValidationError::MixedIndexUsage { name } => {
                write!(
                    f,
                    "Variable '{}' is used both with and without an index.",
                    name
                )
            }
            ValidationError::MissingUnit { name } => {
                write!(
                    f,
                    "Variable '{}' has no unit defined but is used with a unit suffix.",
                    name
                )
            }
            ValidationError::MultipleIndices { name } => {
                write!(f, "Variable '{}' is used with multiple indices.", name)
            }
            ValidationError::MultipleUnits { name } => {
                write!(f, "Variable '{}' is used with multiple units.", name)
            }
            ValidationError::IndexNotFinite { name } => {
                write!(
                    f,
                    "Index for variable '{}' must evaluate to a finite number.",
                    name
                )
            }
            ValidationError::IndexNotInteger { name } => {
                write!(f, "Index for variable '{}' must be an integer.", name)
            }
            ValidationError::IndexNegative { name } => {
                write!(f, "Index for variable '{}' must be non-negative.", name)
            }
            ValidationError::IndexOutOfRange { index, name } => {
                write!(f, "Index {} is out of range for variable '{}'.", index, name)
            }
            ValidationError::UnitConversion { name, from, to } => {
                write!(
                    f,
                    "Cannot convert variable '{}' from '{}' to '{}'.",
                    name, from, to
                )
            }
            ValidationError::UnknownFunction { name } => {
                write!(f, "Unknown function: {}", name)
            }
            ValidationError::ArityMismatch { expected } => {
                write!(f, "Function expects {} argument(s).", expected)
            }
            ValidationError::InvalidOperation { message } => write!(f, "{}", message),
            ValidationError::ResultNaN => write!(f, "Result is not a real number (NaN)"),
            ValidationError::ResultInfinite => {
                write!(f, "Result is infinity - division by zero or overflow")
            }
            ValidationError::Internal { message } => {
                write!(f, "Validation error: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
