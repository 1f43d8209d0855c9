//! Request and response envelopes
//!
//! The wire shapes consumed and produced by the validation pipeline,
//! serialized as camelCase JSON. Transport is the host's concern; these
//! types only fix the contract.

use serde::{Deserialize, Serialize};

/// The value of the `source` field on every response.
pub const RESPONSE_SOURCE: &str = "Backend";

/// A validation request: the formula plus its inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// The formula text.
    pub formula: String,
    /// User-supplied measured values.
    #[serde(default)]
    pub measured_values: Vec<MeasuredValueInput>,
    /// Per-request constant overrides.
    #[serde(default)]
    pub constants: Vec<ConstantInput>,
}

/// One measured value as supplied on the wire.
///
/// `id` accepts both `$name` and `name`. Exactly one of `value` (scalar)
/// and `values` (vector) must be present; an empty `values` array counts
/// as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasuredValueInput {
    /// Identifier, with or without the leading `$`.
    pub id: String,
    /// Display name; not used for lookup.
    pub name: String,
    /// Scalar form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Vector form, mutually exclusive with `value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    /// Unit alias recognized by the unit resolver; empty means unitless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl MeasuredValueInput {
    /// Build a scalar input
    pub fn scalar(id: impl Into<String>, value: f64) -> Self {
        MeasuredValueInput {
            id: id.into(),
            value: Some(value),
            ..MeasuredValueInput::default()
        }
    }

    /// Build a vector input
    pub fn vector(id: impl Into<String>, values: Vec<f64>) -> Self {
        MeasuredValueInput {
            id: id.into(),
            values: Some(values),
            ..MeasuredValueInput::default()
        }
    }

    /// Attach a unit alias
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// One constant as supplied on the wire; `id` accepts both `#name` and
/// `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantInput {
    /// Identifier, with or without the leading `#`.
    pub id: String,
    /// Display name; not used for lookup.
    #[serde(default)]
    pub name: String,
    /// The constant's value.
    pub value: f64,
}

impl ConstantInput {
    /// Build a constant input
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        ConstantInput {
            id: id.into(),
            name: String::new(),
            value,
        }
    }
}

/// The validation outcome envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Whether the formula validated and evaluated successfully.
    pub is_valid: bool,
    /// The failure message, present exactly when `is_valid` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The numeric result, present exactly when `is_valid` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    /// The trimmed original input, echoed on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated_formula: Option<String>,
    /// Always `"Backend"`.
    pub source: String,
}

impl ValidationResponse {
    /// Build a success envelope
    #[must_use]
    pub fn success(result: f64, evaluated_formula: impl Into<String>) -> Self {
        ValidationResponse {
            is_valid: true,
            error: None,
            result: Some(result),
            evaluated_formula: Some(evaluated_formula.into()),
            source: RESPONSE_SOURCE.to_string(),
        }
    }

    /// Build a failure envelope from any displayable error
    #[must_use]
    pub fn failure(error: impl std::fmt::Display) -> Self {
        ValidationResponse {
            is_valid: false,
            error: Some(error.to_string()),
            result: None,
            evaluated_formula: None,
            source: RESPONSE_SOURCE.to_string(),
        }
    }
}
