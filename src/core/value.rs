//! Measured-value model
//!
//! A measured value is a named per-request input: exactly one of a scalar or
//! a non-empty vector, optionally carrying a unit alias. The ambiguous middle
//! ground (both or neither) is rejected at ingest by the orchestrator.

/// The payload of a measured value: a single reading or an ordered series.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasuredData {
    /// A single finite reading.
    Scalar(f64),
    /// An ordered series of finite readings, zero-based indexing, length ≥ 1.
    Vector(Vec<f64>),
}

impl MeasuredData {
    /// Whether this value is a scalar
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, MeasuredData::Scalar(_))
    }

    /// Whether this value is a vector
    #[must_use]
    pub fn is_vector(&self) -> bool {
        matches!(self, MeasuredData::Vector(_))
    }
}

/// A named numeric input supplied with a validation request.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredValue {
    /// Identifier with the leading `$` stripped, request spelling preserved.
    pub name: String,
    /// Scalar or vector payload.
    pub data: MeasuredData,
    /// Declared unit alias; `None` means unitless.
    pub unit: Option<String>,
}

impl MeasuredValue {
    /// Create a unitless scalar measured value
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        MeasuredValue {
            name: name.into(),
            data: MeasuredData::Scalar(value),
            unit: None,
        }
    }

    /// Create a unitless vector measured value
    pub fn vector(name: impl Into<String>, values: Vec<f64>) -> Self {
        MeasuredValue {
            name: name.into(),
            data: MeasuredData::Vector(values),
            unit: None,
        }
    }

    /// Attach a unit alias
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// The declared unit, with an empty or whitespace-only string treated
    /// as unitless.
    #[must_use]
    pub fn unit_str(&self) -> Option<&str> {
        self.unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::MeasuredValue;

    #[test]
    fn empty_unit_is_unitless() {
        assert_eq!(MeasuredValue::scalar("d", 1.0).unit_str(), None);
        assert_eq!(MeasuredValue::scalar("d", 1.0).with_unit("").unit_str(), None);
        assert_eq!(MeasuredValue::scalar("d", 1.0).with_unit("  ").unit_str(), None);
        assert_eq!(
            MeasuredValue::scalar("d", 1.0).with_unit("km").unit_str(),
            Some("km")
        );
    }
}
