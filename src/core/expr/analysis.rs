//! Symbol usage analysis
//!
//! A single-pass read-only traversal that records which variables and
//! constants a formula references and how each variable is used: with a
//! unit suffix, with an index, or bare. The traversal is idempotent, never
//! mutates the tree, and consults neither the function registry nor the
//! unit resolver. Index sub-expressions are traversed too, so a variable
//! referenced only inside `$v[$i]` is still recorded.

use super::{Expr, Suffix};

/// How a single variable is referenced across the whole formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableUse {
    /// The name as first written in the formula (without the `$`).
    pub name: String,
    /// At least one reference carries a unit suffix.
    pub with_unit: bool,
    /// At least one reference carries an index suffix.
    pub with_index: bool,
    /// At least one reference carries no index suffix.
    pub without_index: bool,
}

/// A constant referenced by the formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantUse {
    /// The name as first written in the formula (without the `#`).
    pub name: String,
}

/// The symbol usage record produced by analyzing one expression tree.
///
/// Variables and constants appear in first-reference order, deduplicated
/// case-insensitively; the stored spelling is the first occurrence, which
/// is what error messages display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolUsage {
    variables: Vec<VariableUse>,
    constants: Vec<ConstantUse>,
}

impl SymbolUsage {
    /// Analyze an expression tree
    #[must_use]
    pub fn of(expr: &Expr) -> Self {
        let mut usage = SymbolUsage::default();
        usage.walk(expr);
        usage
    }

    /// Referenced variables in first-reference order
    #[must_use]
    pub fn variables(&self) -> &[VariableUse] {
        &self.variables
    }

    /// Referenced constants in first-reference order
    #[must_use]
    pub fn constants(&self) -> &[ConstantUse] {
        &self.constants
    }

    fn record_variable(&mut self, name: &str, with_unit: bool, with_index: bool) {
        let entry = self
            .variables
            .iter_mut()
            .find(|v| v.name.eq_ignore_ascii_case(name));
        match entry {
            Some(v) => {
                v.with_unit |= with_unit;
                v.with_index |= with_index;
                v.without_index |= !with_index;
            }
            None => self.variables.push(VariableUse {
                name: name.to_string(),
                with_unit,
                with_index,
                without_index: !with_index,
            }),
        }
    }

    fn record_constant(&mut self, name: &str) {
        if !self
            .constants
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
        {
            self.constants.push(ConstantUse {
                name: name.to_string(),
            });
        }
    }

    fn walk(&mut self, expr: &Expr) {
        match expr {
            Expr::Number(_) => {}
            Expr::Variable { name, suffixes } => {
                let with_unit = suffixes.iter().any(|s| matches!(s, Suffix::Unit(_)));
                let with_index = suffixes.iter().any(|s| matches!(s, Suffix::Index(_)));
                self.record_variable(name, with_unit, with_index);
                for suffix in suffixes {
                    if let Suffix::Index(index) = suffix {
                        self.walk(index);
                    }
                }
            }
            Expr::Constant { name } => self.record_constant(name),
            Expr::Call { args, .. } => {
                for arg in args {
                    self.walk(arg);
                }
            }
            Expr::Unary { operand, .. } => self.walk(operand),
            Expr::Binary { lhs, rhs, .. } => {
                self.walk(lhs);
                self.walk(rhs);
            }
        }
    }
}
