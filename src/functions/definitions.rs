//! Definitions of the built-in functions
//!
//! All kernels operate on IEEE-754 doubles; angles are radians. Domain
//! violations that IEEE arithmetic can express (e.g. `ln(-1)`) are left to
//! produce NaN and get caught by the final-result policy; violations with a
//! better story for the user (factorial of a negative) return a message.

use std::ops::RangeInclusive;

use super::registry::FunctionDefinition;

/// Marker for "any number of further arguments".
const VARIADIC: usize = usize::MAX;

fn def(
    name: &'static str,
    arity: RangeInclusive<usize>,
    eval: fn(&[f64]) -> Result<f64, String>,
) -> FunctionDefinition {
    FunctionDefinition { name, arity, eval }
}

/// The canonical built-in set.
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric (radians)
        def("sin", 1..=1, |a| Ok(a[0].sin())),
        def("cos", 1..=1, |a| Ok(a[0].cos())),
        def("tan", 1..=1, |a| Ok(a[0].tan())),
        def("asin", 1..=1, |a| Ok(a[0].asin())),
        def("acos", 1..=1, |a| Ok(a[0].acos())),
        def("atan", 1..=1, |a| Ok(a[0].atan())),
        def("sinh", 1..=1, |a| Ok(a[0].sinh())),
        def("cosh", 1..=1, |a| Ok(a[0].cosh())),
        def("tanh", 1..=1, |a| Ok(a[0].tanh())),
        // Exponential / logarithmic / elementary
        def("ln", 1..=1, |a| Ok(a[0].ln())),
        def("log10", 1..=1, |a| Ok(a[0].log10())),
        def("log2", 1..=1, |a| Ok(a[0].log2())),
        def("exp", 1..=1, |a| Ok(a[0].exp())),
        def("sqrt", 1..=1, |a| Ok(a[0].sqrt())),
        def("abs", 1..=1, |a| Ok(a[0].abs())),
        def("sign", 1..=1, |a| Ok(sign(a[0]))),
        def("sgn", 1..=1, |a| Ok(sign(a[0]))),
        def("floor", 1..=1, |a| Ok(a[0].floor())),
        def("ceil", 1..=1, |a| Ok(a[0].ceil())),
        // Rounding: nearest integer half-away-from-zero, or to n digits
        def("round", 1..=2, |a| {
            if a.len() == 1 {
                Ok(a[0].round())
            } else {
                let factor = 10f64.powi(a[1].round() as i32);
                Ok((a[0] * factor).round() / factor)
            }
        }),
        def("pow", 2..=2, |a| Ok(a[0].powf(a[1]))),
        // Remainder of division, sign of the dividend
        def("mod", 2..=2, |a| Ok(a[0] % a[1])),
        // Variadic aggregates
        def("min", 1..=VARIADIC, |a| {
            Ok(a.iter().copied().fold(f64::INFINITY, f64::min))
        }),
        def("max", 1..=VARIADIC, |a| {
            Ok(a.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        }),
        def("sum", 1..=VARIADIC, |a| Ok(a.iter().sum())),
        def("prod", 1..=VARIADIC, |a| Ok(a.iter().product())),
        def("mean", 1..=VARIADIC, |a| Ok(mean(a))),
        def("avg", 1..=VARIADIC, |a| Ok(mean(a))),
        // Population statistics
        def("var", 2..=VARIADIC, |a| Ok(population_variance(a))),
        def("std", 2..=VARIADIC, |a| Ok(population_variance(a).sqrt())),
        // Branch select; both branches are already evaluated eagerly
        def("if", 3..=3, |a| {
            Ok(if a[0].abs() >= f64::EPSILON { a[1] } else { a[2] })
        }),
        def("fact", 1..=1, |a| factorial(a[0])),
        def("gcd", 2..=2, |a| {
            Ok(int_gcd(a[0].trunc() as i64, a[1].trunc() as i64) as f64)
        }),
        def("lcm", 2..=2, |a| Ok(int_lcm(a[0].trunc() as i64, a[1].trunc() as i64))),
    ]
}

fn sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else if x.is_nan() {
        f64::NAN
    } else {
        x.signum()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / values.len() as f64
}

fn factorial(x: f64) -> Result<f64, String> {
    let n = x.round();
    if n.is_nan() {
        return Ok(f64::NAN);
    }
    if n < 0.0 {
        return Err("Factorial is not defined for negative numbers".to_string());
    }
    // 171! overflows f64
    if n > 170.0 {
        return Ok(f64::INFINITY);
    }
    let mut acc = 1.0;
    let mut i = 2.0;
    while i <= n {
        acc *= i;
        i += 1.0;
    }
    Ok(acc)
}

fn int_gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn int_lcm(a: i64, b: i64) -> f64 {
    let g = int_gcd(a, b);
    if g == 0 {
        return 0.0;
    }
    let lcm = (i128::from(a / g) * i128::from(b)).unsigned_abs();
    lcm as f64
}
