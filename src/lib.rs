#![forbid(unsafe_code)]
//! Formula Validation Engine
//!
//! A server-side processor for a small arithmetic/logical formula language:
//! it accepts a formula string, a bag of measured values (scalar or vector,
//! optionally carrying a physical unit), and a bag of named constants, and
//! returns either a numeric result or a precise, user-actionable error.
//!
//! The pipeline is lexer → parser → symbol analyzer → evaluator, backed by
//! an immutable built-in function registry and a unit-conversion resolver.
//! All shared state is built once and read-only; per-request state lives on
//! the caller's stack, so a single [`Validator`] can serve concurrent
//! requests without synchronization.
//!
//! # Usage
//!
//! ## One-shot API
//! ```
//! use formuval::{MeasuredValueInput, validate};
//!
//! let inputs = vec![MeasuredValueInput::scalar("$d", 1000.0).with_unit("meter")];
//! let response = validate("$d.km * 2", &inputs, &[]);
//! assert!(response.is_valid);
//! assert_eq!(response.result, Some(2.0));
//! ```
//!
//! ## Builder API
//! ```
//! use formuval::{ValidationRequest, Validator};
//!
//! let validator = Validator::new().right_associative_pow(true);
//! let request = ValidationRequest {
//!     formula: "2^3^2".to_string(),
//!     ..ValidationRequest::default()
//! };
//! assert_eq!(validator.validate(&request).result, Some(512.0));
//! ```

mod api;
mod config;
mod core;
mod evaluator;
mod functions;
mod parser;
mod units;

#[cfg(test)]
mod tests;

pub use api::{
    ConstantInput, MeasuredValueInput, RESPONSE_SOURCE, ValidationRequest, ValidationResponse,
    Validator,
};
pub use config::PredefinedConstants;
pub use crate::core::error::ValidationError;
pub use crate::core::expr::analysis::{ConstantUse, SymbolUsage, VariableUse};
pub use crate::core::expr::{BinaryOp, Expr, Suffix, UnaryOp};
pub use crate::core::value::{MeasuredData, MeasuredValue};
pub use functions::registry::FunctionRegistry;
pub use parser::{ParseOptions, parse};
pub use units::{ConversionError, Quantity, UnitResolver};

/// Default maximum formula length in characters
pub const DEFAULT_MAX_FORMULA_LEN: usize = 10_000;
/// Default maximum grammar recursion depth
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Validate and evaluate a formula with default settings.
///
/// Convenience wrapper over [`Validator`]; builds a request from the given
/// inputs and runs the full pipeline.
///
/// # Example
/// ```
/// use formuval::validate;
///
/// let response = validate("sqrt(16)", &[], &[]);
/// assert_eq!(response.result, Some(4.0));
///
/// let response = validate("1 / 0", &[], &[]);
/// assert_eq!(
///     response.error.as_deref(),
///     Some("Result is infinity - division by zero or overflow")
/// );
/// ```
pub fn validate(
    formula: &str,
    measured_values: &[MeasuredValueInput],
    constants: &[ConstantInput],
) -> ValidationResponse {
    let request = ValidationRequest {
        formula: formula.to_string(),
        measured_values: measured_values.to_vec(),
        constants: constants.to_vec(),
    };
    Validator::new().validate(&request)
}
