//! Predefined-constants configuration
//!
//! Constants available to every request without being supplied in the
//! payload. A built-in default set (`pi`, `e`, `tau`) can be extended or
//! replaced from a TOML document at process start:
//!
//! ```toml
//! [[constants]]
//! id = "gravity"
//! name = "Standard gravity"
//! value = 9.80665
//! ```
//!
//! Entries with an empty id or a non-finite value are skipped at load time;
//! a warning is traced but no error is raised. Request-supplied constants
//! shadow predefined ones by normalized identifier.

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// The predefined constants table, keyed by ASCII-lowercased identifier.
#[derive(Debug, Clone)]
pub struct PredefinedConstants {
    entries: FxHashMap<String, f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ConstantsFile {
    #[serde(default)]
    constants: Vec<ConstantRecord>,
}

#[derive(Debug, Deserialize)]
struct ConstantRecord {
    id: String,
    #[serde(default)]
    #[allow(dead_code, reason = "display-only field, accepted but unused")]
    name: String,
    value: f64,
}

impl Default for PredefinedConstants {
    /// The built-in mathematical constants: `pi`, `e`, `tau`.
    fn default() -> Self {
        let mut constants = PredefinedConstants::empty();
        constants.insert("pi", std::f64::consts::PI);
        constants.insert("e", std::f64::consts::E);
        constants.insert("tau", std::f64::consts::TAU);
        constants
    }
}

impl PredefinedConstants {
    /// An empty table
    #[must_use]
    pub fn empty() -> Self {
        PredefinedConstants {
            entries: FxHashMap::default(),
        }
    }

    /// Load a table from a TOML document, without the built-in defaults.
    ///
    /// Invalid entries (empty id, non-finite value) are skipped.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        let mut constants = PredefinedConstants::empty();
        constants.extend_from_toml_str(input)?;
        Ok(constants)
    }

    /// Merge a TOML document into this table; later entries win.
    pub fn extend_from_toml_str(&mut self, input: &str) -> Result<(), toml::de::Error> {
        let file: ConstantsFile = toml::from_str(input)?;
        for record in file.constants {
            let id = record.id.trim();
            if id.is_empty() || !record.value.is_finite() {
                tracing::warn!(id = %record.id, value = record.value, "skipping invalid predefined constant");
                continue;
            }
            self.insert(id, record.value);
        }
        Ok(())
    }

    /// Insert or replace a constant; the id is normalized by stripping one
    /// leading `#` and folding case.
    pub fn insert(&mut self, id: &str, value: f64) {
        let id = id.trim();
        let id = id.strip_prefix('#').unwrap_or(id);
        self.entries.insert(id.to_ascii_lowercase(), value);
    }

    /// Look up a constant by normalized identifier
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.entries.get(id.to_ascii_lowercase().as_str()).copied()
    }

    /// Number of constants in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// This table merged with per-request overrides; overrides win on
    /// normalized-id collision.
    pub(crate) fn merged_with(&self, overrides: &FxHashMap<String, f64>) -> FxHashMap<String, f64> {
        let mut merged = self.entries.clone();
        for (key, value) in overrides {
            merged.insert(key.clone(), *value);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::PredefinedConstants;

    #[test]
    fn defaults_include_pi() {
        let constants = PredefinedConstants::default();
        assert_eq!(constants.get("pi"), Some(std::f64::consts::PI));
        assert_eq!(constants.get("PI"), Some(std::f64::consts::PI));
        assert_eq!(constants.get("missing"), None);
    }

    #[test]
    fn loads_records_from_toml() {
        let toml = r##"
            [[constants]]
            id = "gravity"
            name = "Standard gravity"
            value = 9.80665

            [[constants]]
            id = "#Boltzmann"
            value = 1.380649e-23
        "##;
        let constants = PredefinedConstants::from_toml_str(toml).expect("valid toml");
        assert_eq!(constants.len(), 2);
        assert_eq!(constants.get("gravity"), Some(9.80665));
        assert_eq!(constants.get("boltzmann"), Some(1.380649e-23));
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let toml = r#"
            [[constants]]
            id = ""
            value = 1.0

            [[constants]]
            id = "bad"
            value = inf

            [[constants]]
            id = "good"
            value = 2.0
        "#;
        let constants = PredefinedConstants::from_toml_str(toml).expect("valid toml");
        assert_eq!(constants.len(), 1);
        assert_eq!(constants.get("good"), Some(2.0));
    }

    #[test]
    fn later_entries_override_earlier() {
        let toml = r#"
            [[constants]]
            id = "k"
            value = 1.0

            [[constants]]
            id = "K"
            value = 2.0
        "#;
        let constants = PredefinedConstants::from_toml_str(toml).expect("valid toml");
        assert_eq!(constants.len(), 1);
        assert_eq!(constants.get("k"), Some(2.0));
    }
}
