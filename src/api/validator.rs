//! Validation orchestrator
//!
//! Composes the pipeline: trim and emptiness check, input normalization,
//! parse, symbol analysis, semantic checks, constant merging, evaluation,
//! and the response envelope. Holds only immutable shared state; every
//! request is processed on the caller's stack with no synchronization.

use rustc_hash::FxHashMap;

use crate::config::PredefinedConstants;
use crate::core::error::ValidationError;
use crate::core::expr::analysis::SymbolUsage;
use crate::core::value::{MeasuredData, MeasuredValue};
use crate::evaluator::{self, EvalContext};
use crate::functions::registry::FunctionRegistry;
use crate::parser::{self, ParseOptions};
use crate::units::UnitResolver;
use crate::{
    ConstantInput, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FORMULA_LEN, MeasuredValueInput,
    ValidationRequest, ValidationResponse,
};

/// The top-level formula validator.
///
/// Built once (typically at process start) and shared across requests; the
/// function registry, unit catalog, and predefined constants it references
/// are immutable.
///
/// # Example
/// ```
/// use formuval::{ValidationRequest, Validator};
///
/// let validator = Validator::new();
/// let request = ValidationRequest {
///     formula: "2 + 2".to_string(),
///     ..ValidationRequest::default()
/// };
/// let response = validator.validate(&request);
/// assert!(response.is_valid);
/// assert_eq!(response.result, Some(4.0));
/// ```
#[derive(Clone)]
pub struct Validator {
    functions: &'static FunctionRegistry,
    units: &'static UnitResolver,
    predefined: PredefinedConstants,
    max_formula_len: usize,
    max_depth: usize,
    right_associative_pow: bool,
}

impl Default for Validator {
    fn default() -> Self {
        Validator {
            functions: FunctionRegistry::global(),
            units: UnitResolver::global(),
            predefined: PredefinedConstants::default(),
            max_formula_len: DEFAULT_MAX_FORMULA_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            right_associative_pow: false,
        }
    }
}

impl Validator {
    /// Create a validator with the built-in registry, catalog, constants,
    /// and limits
    #[must_use]
    pub fn new() -> Self {
        Validator::default()
    }

    /// Replace the predefined constants table
    #[must_use]
    pub fn predefined_constants(mut self, constants: PredefinedConstants) -> Self {
        self.predefined = constants;
        self
    }

    /// Cap the accepted formula length in characters
    #[must_use]
    pub fn max_formula_len(mut self, max_len: usize) -> Self {
        self.max_formula_len = max_len;
        self
    }

    /// Cap the grammar recursion depth
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse `^` right-associatively instead of the default left
    #[must_use]
    pub fn right_associative_pow(mut self, enabled: bool) -> Self {
        self.right_associative_pow = enabled;
        self
    }

    /// Run the full pipeline for one request.
    pub fn validate(&self, request: &ValidationRequest) -> ValidationResponse {
        match self.run(request) {
            Ok((result, evaluated_formula)) => {
                ValidationResponse::success(result, evaluated_formula)
            }
            Err(error) => ValidationResponse::failure(error),
        }
    }

    fn run(&self, request: &ValidationRequest) -> Result<(f64, String), ValidationError> {
        let trimmed = request.formula.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyFormula);
        }
        tracing::debug!(formula = trimmed, "validating formula");

        let variables = normalize_measured_values(&request.measured_values)?;
        let overrides = normalize_constants(&request.constants)?;

        // Parse the submitted text unmodified so error columns match it.
        let options = ParseOptions {
            max_len: self.max_formula_len,
            max_depth: self.max_depth,
            right_associative_pow: self.right_associative_pow,
        };
        let expr = parser::parse(&request.formula, &options)?;

        let usage = SymbolUsage::of(&expr);
        self.check_symbols(&usage, &variables)?;

        let constants = self.predefined.merged_with(&overrides);
        for constant in usage.constants() {
            if !constants.contains_key(constant.name.to_ascii_lowercase().as_str()) {
                return Err(ValidationError::UndefinedConstant {
                    name: constant.name.clone(),
                });
            }
        }
        self.check_units(&usage, &variables)?;

        let ctx = EvalContext {
            variables: &variables,
            constants: &constants,
            functions: self.functions,
            units: self.units,
        };
        let result = evaluator::evaluate(&expr, &ctx)?;
        tracing::debug!(result, "formula evaluated");
        Ok((result, trimmed.to_string()))
    }

    /// Variable checks in the documented order: undefined, indexed scalar,
    /// mixed use, non-indexed vector. Constants and units come after.
    fn check_symbols(
        &self,
        usage: &SymbolUsage,
        variables: &FxHashMap<String, MeasuredValue>,
    ) -> Result<(), ValidationError> {
        for var in usage.variables() {
            if !variables.contains_key(var.name.to_ascii_lowercase().as_str()) {
                return Err(ValidationError::UndefinedVariable {
                    name: var.name.clone(),
                });
            }
        }
        for var in usage.variables() {
            let measured = &variables[var.name.to_ascii_lowercase().as_str()];
            if measured.data.is_scalar() && var.with_index {
                return Err(ValidationError::ScalarIndexed {
                    name: var.name.clone(),
                });
            }
        }
        for var in usage.variables() {
            if var.with_index && var.without_index {
                return Err(ValidationError::MixedIndexUsage {
                    name: var.name.clone(),
                });
            }
        }
        for var in usage.variables() {
            let measured = &variables[var.name.to_ascii_lowercase().as_str()];
            if measured.data.is_vector() && var.without_index {
                return Err(ValidationError::VectorNotIndexed {
                    name: var.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_units(
        &self,
        usage: &SymbolUsage,
        variables: &FxHashMap<String, MeasuredValue>,
    ) -> Result<(), ValidationError> {
        for var in usage.variables() {
            if !var.with_unit {
                continue;
            }
            let measured = &variables[var.name.to_ascii_lowercase().as_str()];
            if measured.unit_str().is_none() {
                return Err(ValidationError::MissingUnit {
                    name: var.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Normalize the wire inputs into the evaluator's variable table: strip the
/// leading `$`, fold case, reject duplicates, and enforce the
/// scalar-XOR-vector invariant (an empty vector counts as absent).
fn normalize_measured_values(
    inputs: &[MeasuredValueInput],
) -> Result<FxHashMap<String, MeasuredValue>, ValidationError> {
    let mut variables = FxHashMap::default();
    for input in inputs {
        let id = input.id.trim();
        let name = id.strip_prefix('$').unwrap_or(id);
        if name.is_empty() {
            return Err(ValidationError::internal("measured value with empty id"));
        }
        let key = name.to_ascii_lowercase();

        let values = input.values.as_deref().filter(|v| !v.is_empty());
        let data = match (input.value, values) {
            (Some(scalar), None) => MeasuredData::Scalar(scalar),
            (None, Some(vector)) => MeasuredData::Vector(vector.to_vec()),
            _ => {
                return Err(ValidationError::MalformedValue {
                    name: name.to_string(),
                });
            }
        };
        let finite = match &data {
            MeasuredData::Scalar(v) => v.is_finite(),
            MeasuredData::Vector(vs) => vs.iter().all(|v| v.is_finite()),
        };
        if !finite {
            return Err(ValidationError::NonFiniteValue {
                name: name.to_string(),
            });
        }

        if variables.contains_key(&key) {
            return Err(ValidationError::DuplicateVariable {
                name: name.to_string(),
            });
        }
        variables.insert(
            key,
            MeasuredValue {
                name: name.to_string(),
                data,
                unit: input.unit.clone(),
            },
        );
    }
    Ok(variables)
}

/// Normalize request constants: strip the leading `#`, fold case, reject
/// duplicates and non-finite values.
fn normalize_constants(
    inputs: &[ConstantInput],
) -> Result<FxHashMap<String, f64>, ValidationError> {
    let mut constants = FxHashMap::default();
    for input in inputs {
        let id = input.id.trim();
        let name = id.strip_prefix('#').unwrap_or(id);
        if name.is_empty() {
            return Err(ValidationError::internal("constant with empty id"));
        }
        if !input.value.is_finite() {
            return Err(ValidationError::NonFiniteConstant {
                name: name.to_string(),
            });
        }
        let key = name.to_ascii_lowercase();
        if constants.contains_key(&key) {
            return Err(ValidationError::DuplicateConstant {
                name: name.to_string(),
            });
        }
        constants.insert(key, input.value);
    }
    Ok(constants)
}
