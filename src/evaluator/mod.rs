//! Formula evaluation
//!
//! Walks the expression tree producing a double. The evaluator is handed
//! its symbol tables, the function registry, and the unit resolver by
//! reference; it holds no state of its own and performs no I/O. Errors are
//! values and short-circuit the traversal.

use rustc_hash::FxHashMap;

use crate::core::error::ValidationError;
use crate::core::expr::{BinaryOp, Expr, Suffix, UnaryOp};
use crate::core::value::{MeasuredData, MeasuredValue};
use crate::functions::registry::FunctionRegistry;
use crate::units::UnitResolver;

/// Tolerance for accepting an index expression as a whole number.
const INDEX_INTEGER_TOLERANCE: f64 = 1e-9;

/// Everything one evaluation needs, borrowed from the caller.
///
/// Symbol tables are keyed by ASCII-lowercased identifier.
pub(crate) struct EvalContext<'a> {
    pub variables: &'a FxHashMap<String, MeasuredValue>,
    pub constants: &'a FxHashMap<String, f64>,
    pub functions: &'a FunctionRegistry,
    pub units: &'a UnitResolver,
}

/// Evaluate a tree and apply the final-value termination policy:
/// NaN and ±∞ results are errors, anything else succeeds.
pub(crate) fn evaluate(expr: &Expr, ctx: &EvalContext<'_>) -> Result<f64, ValidationError> {
    let value = eval_node(expr, ctx)?;
    if value.is_nan() {
        return Err(ValidationError::ResultNaN);
    }
    if value.is_infinite() {
        return Err(ValidationError::ResultInfinite);
    }
    Ok(value)
}

fn eval_node(expr: &Expr, ctx: &EvalContext<'_>) -> Result<f64, ValidationError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Variable { name, suffixes } => eval_variable(name, suffixes, ctx),
        Expr::Constant { name } => ctx
            .constants
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| ValidationError::UndefinedConstant { name: name.clone() }),
        Expr::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_node(arg, ctx)?);
            }
            ctx.functions.call(name, &values)
        }
        Expr::Unary { op, operand } => {
            let value = eval_node(operand, ctx)?;
            Ok(match op {
                UnaryOp::Plus => value,
                UnaryOp::Minus => -value,
            })
        }
        Expr::Binary { op, lhs, rhs } => {
            let a = eval_node(lhs, ctx)?;
            let b = eval_node(rhs, ctx)?;
            Ok(eval_binary(*op, a, b))
        }
    }
}

fn eval_binary(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Pow => a.powf(b),
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Gt => bool_value(a > b),
        BinaryOp::Ge => bool_value(a >= b),
        BinaryOp::Lt => bool_value(a < b),
        BinaryOp::Le => bool_value(a <= b),
        BinaryOp::Eq => bool_value(approx_eq(a, b)),
        BinaryOp::Ne => bool_value(!approx_eq(a, b)),
    }
}

fn bool_value(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// Equality within machine epsilon, matching the `if` condition test.
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

/// Resolve a `$name` reference: collect its suffixes, select the scalar or
/// the indexed vector element, then apply the unit conversion if requested.
fn eval_variable(
    name: &str,
    suffixes: &[Suffix],
    ctx: &EvalContext<'_>,
) -> Result<f64, ValidationError> {
    let Some(measured) = ctx.variables.get(name.to_ascii_lowercase().as_str()) else {
        return Err(ValidationError::UndefinedVariable {
            name: name.to_string(),
        });
    };

    // At most one index and one unit tag across all suffixes.
    let mut index_expr: Option<&Expr> = None;
    let mut unit_tag: Option<&str> = None;
    for suffix in suffixes {
        match suffix {
            Suffix::Index(expr) => {
                if index_expr.replace(expr).is_some() {
                    return Err(ValidationError::MultipleIndices {
                        name: name.to_string(),
                    });
                }
            }
            Suffix::Unit(unit) => {
                if unit_tag.replace(unit).is_some() {
                    return Err(ValidationError::MultipleUnits {
                        name: name.to_string(),
                    });
                }
            }
        }
    }

    let mut value = match &measured.data {
        MeasuredData::Vector(items) => {
            let Some(index_expr) = index_expr else {
                return Err(ValidationError::VectorNotIndexed {
                    name: name.to_string(),
                });
            };
            let position = resolve_index(index_expr, name, items.len(), ctx)?;
            items[position]
        }
        MeasuredData::Scalar(value) => {
            if index_expr.is_some() {
                return Err(ValidationError::ScalarIndexed {
                    name: name.to_string(),
                });
            }
            *value
        }
    };

    if let Some(to) = unit_tag {
        let Some(from) = measured.unit_str() else {
            return Err(ValidationError::MissingUnit {
                name: name.to_string(),
            });
        };
        value = ctx
            .units
            .try_convert(value, from, to)
            .map_err(|_| ValidationError::UnitConversion {
                name: name.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            })?;
    }

    Ok(value)
}

/// Evaluate an index expression and check it is finite, integral (within
/// tolerance), non-negative, and inside the vector, in that order.
fn resolve_index(
    expr: &Expr,
    name: &str,
    len: usize,
    ctx: &EvalContext<'_>,
) -> Result<usize, ValidationError> {
    let raw = eval_node(expr, ctx)?;
    if !raw.is_finite() {
        return Err(ValidationError::IndexNotFinite {
            name: name.to_string(),
        });
    }
    let rounded = raw.round();
    if (raw - rounded).abs() > INDEX_INTEGER_TOLERANCE {
        return Err(ValidationError::IndexNotInteger {
            name: name.to_string(),
        });
    }
    if rounded < 0.0 {
        return Err(ValidationError::IndexNegative {
            name: name.to_string(),
        });
    }
    let position = rounded as usize;
    if position >= len {
        return Err(ValidationError::IndexOutOfRange {
            index: rounded as i64,
            name: name.to_string(),
        });
    }
    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::{EvalContext, evaluate};
    use crate::core::error::ValidationError;
    use crate::core::expr::Expr;
    use crate::core::value::MeasuredValue;
    use crate::functions::registry::FunctionRegistry;
    use crate::parser::{ParseOptions, parse};
    use crate::units::UnitResolver;
    use rustc_hash::FxHashMap;

    fn eval_with(
        formula: &str,
        variables: Vec<MeasuredValue>,
        constants: Vec<(&str, f64)>,
    ) -> Result<f64, ValidationError> {
        let expr: Expr = parse(formula, &ParseOptions::default())?;
        let variables: FxHashMap<String, MeasuredValue> = variables
            .into_iter()
            .map(|v| (v.name.to_ascii_lowercase(), v))
            .collect();
        let constants: FxHashMap<String, f64> = constants
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        let ctx = EvalContext {
            variables: &variables,
            constants: &constants,
            functions: FunctionRegistry::global(),
            units: UnitResolver::global(),
        };
        evaluate(&expr, &ctx)
    }

    fn eval(formula: &str) -> Result<f64, ValidationError> {
        eval_with(formula, vec![], vec![])
    }

    #[test]
    fn arithmetic_and_precedence() {
        assert_eq!(eval("2 + 2"), Ok(4.0));
        assert_eq!(eval("2 + 3 * 4"), Ok(14.0));
        assert_eq!(eval("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(eval("7 % 4"), Ok(3.0));
        assert_eq!(eval("-2 ^ 2"), Ok(4.0));
    }

    #[test]
    fn power_is_left_associative() {
        assert_eq!(eval("2^3^2"), Ok(64.0));
    }

    #[test]
    fn comparison_chain_reduces_left() {
        // (1 < 2) < 3  =>  1 < 3  =>  1
        assert_eq!(eval("1 < 2 < 3"), Ok(1.0));
        // (3 > 2) > 1  =>  1 > 1  =>  0
        assert_eq!(eval("3 > 2 > 1"), Ok(0.0));
        assert_eq!(eval("2 >= 2"), Ok(1.0));
        assert_eq!(eval("1 == 1"), Ok(1.0));
        assert_eq!(eval("1 != 1"), Ok(0.0));
    }

    #[test]
    fn division_by_zero_is_infinity_error() {
        assert_eq!(eval("1 / 0"), Err(ValidationError::ResultInfinite));
    }

    #[test]
    fn nan_results_are_errors() {
        assert_eq!(eval("0 / 0"), Err(ValidationError::ResultNaN));
        assert_eq!(eval("ln(0 - 1)"), Err(ValidationError::ResultNaN));
        assert_eq!(eval("sqrt(0 - 1)"), Err(ValidationError::ResultNaN));
    }

    #[test]
    fn scalar_variable_lookup_is_case_insensitive() {
        let vars = vec![MeasuredValue::scalar("Temp", 21.5)];
        assert_eq!(eval_with("$temp + $TEMP", vars, vec![]), Ok(43.0));
    }

    #[test]
    fn vector_indexing() {
        let vars = vec![MeasuredValue::vector("temps", vec![10.0, 20.0, 30.0])];
        assert_eq!(
            eval_with("$temps[1] + $temps[2]", vars.clone(), vec![]),
            Ok(50.0)
        );
        assert_eq!(eval_with("$temps[2]", vars.clone(), vec![]), Ok(30.0));
        assert_eq!(
            eval_with("$temps[3]", vars.clone(), vec![]),
            Err(ValidationError::IndexOutOfRange {
                index: 3,
                name: "temps".into()
            })
        );
        assert_eq!(
            eval_with("$temps[0 - 1]", vars.clone(), vec![]),
            Err(ValidationError::IndexNegative {
                name: "temps".into()
            })
        );
        assert_eq!(
            eval_with("$temps[0.5]", vars.clone(), vec![]),
            Err(ValidationError::IndexNotInteger {
                name: "temps".into()
            })
        );
        assert_eq!(
            eval_with("$temps[1 / 0]", vars, vec![]),
            Err(ValidationError::IndexNotFinite {
                name: "temps".into()
            })
        );
    }

    #[test]
    fn index_expressions_may_reference_symbols() {
        let vars = vec![
            MeasuredValue::vector("v", vec![5.0, 6.0, 7.0]),
            MeasuredValue::scalar("i", 2.0),
        ];
        assert_eq!(eval_with("$v[$i]", vars, vec![]), Ok(7.0));
    }

    #[test]
    fn near_integer_indices_are_accepted() {
        let vars = vec![MeasuredValue::vector("v", vec![5.0, 6.0])];
        assert_eq!(eval_with("$v[1.0000000001]", vars, vec![]), Ok(6.0));
    }

    #[test]
    fn unit_suffix_converts_the_value() {
        let vars = vec![MeasuredValue::scalar("d", 1000.0).with_unit("meter")];
        assert_eq!(eval_with("$d.km", vars.clone(), vec![]), Ok(1.0));
        // Without the suffix the raw magnitude is used
        assert_eq!(eval_with("$d", vars, vec![]), Ok(1000.0));
    }

    #[test]
    fn unit_suffix_without_declared_unit_fails() {
        let vars = vec![MeasuredValue::scalar("d", 1000.0)];
        assert_eq!(
            eval_with("$d.km", vars, vec![]),
            Err(ValidationError::MissingUnit { name: "d".into() })
        );
    }

    #[test]
    fn incompatible_units_fail_with_both_names() {
        let vars = vec![MeasuredValue::scalar("d", 1.0).with_unit("meter")];
        assert_eq!(
            eval_with("$d.kg", vars, vec![]),
            Err(ValidationError::UnitConversion {
                name: "d".into(),
                from: "meter".into(),
                to: "kg".into(),
            })
        );
    }

    #[test]
    fn repeated_suffixes_are_rejected() {
        let vars = vec![MeasuredValue::vector("v", vec![1.0, 2.0]).with_unit("m")];
        assert_eq!(
            eval_with("$v[0][1]", vars.clone(), vec![]),
            Err(ValidationError::MultipleIndices { name: "v".into() })
        );
        assert_eq!(
            eval_with("$v[0].km.mm", vars, vec![]),
            Err(ValidationError::MultipleUnits { name: "v".into() })
        );
    }

    #[test]
    fn constants_resolve_case_insensitively() {
        assert_eq!(
            eval_with("#Factor * 2", vec![], vec![("factor", 1.5)]),
            Ok(3.0)
        );
    }

    #[test]
    fn function_arguments_evaluate_eagerly() {
        assert_eq!(eval("if(1, 2, 3)"), Ok(2.0));
        assert_eq!(eval("if(0, 2, 3)"), Ok(3.0));
        // NaN is a value, not an error, until the final check; the chosen
        // branch wins even when the other is NaN
        assert_eq!(eval("if(1, 2, 0 / 0)"), Ok(2.0));
        // An evaluation *error* in the untaken branch still fails, because
        // arguments evaluate eagerly
        let vars = vec![MeasuredValue::vector("v", vec![1.0])];
        assert_eq!(
            eval_with("if(1, 2, $v[5])", vars, vec![]),
            Err(ValidationError::IndexOutOfRange {
                index: 5,
                name: "v".into()
            })
        );
    }

    #[test]
    fn epsilon_equality() {
        // Machine-epsilon tolerance absorbs the classic decimal drift
        assert_eq!(eval("0.1 + 0.2 == 0.3"), Ok(1.0));
        assert_eq!(eval("1 == 1.001"), Ok(0.0));
        assert_eq!(eval("1 / 3 == 1 / 3"), Ok(1.0));
    }
}
