#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::cast_precision_loss,
    reason = "testing and fuzzing utilities require direct panic assertions"
)]

use quickcheck::{TestResult, quickcheck};
use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::units::UnitResolver;
use crate::{ConstantInput, MeasuredValueInput, ParseOptions, parse, validate};

quickcheck! {
    /// `try_convert(v, a, a)` is the exact identity, known alias or not.
    fn self_conversion_is_exact(value: f64, pick: usize) -> TestResult {
        if !value.is_finite() {
            return TestResult::discard();
        }
        let aliases = ["km", "KM", "celsius", "kwh", "furlong", "no_such_unit"];
        let alias = aliases[pick % aliases.len()];
        let converted = UnitResolver::global()
            .try_convert(value, alias, alias)
            .unwrap();
        TestResult::from_bool(converted.to_bits() == value.to_bits())
    }

    /// Ratio-unit round trips stay within 1e-9 relative error.
    fn length_round_trip_is_stable(value: f64, pick: usize) -> TestResult {
        if !value.is_finite() || !(value == 0.0 || value.is_normal()) || value.abs() > 1e300 {
            return TestResult::discard();
        }
        let pairs = [("m", "km"), ("mi", "in"), ("ft", "yd"), ("mm", "nmi")];
        let (a, b) = pairs[pick % pairs.len()];
        let resolver = UnitResolver::global();
        let forth = resolver.try_convert(value, a, b).unwrap();
        let back = resolver.try_convert(forth, b, a).unwrap();
        TestResult::from_bool((back - value).abs() <= 1e-9 * value.abs())
    }
}

/// Grammar-driven random formula generator for determinism fuzzing.
fn random_formula(rng: &mut StdRng, depth: usize) -> String {
    if depth == 0 || rng.random_range(0..4) == 0 {
        return match rng.random_range(0..4) {
            0 => format!("{}", rng.random_range(0..100)),
            1 => format!("{}.{}", rng.random_range(0..10), rng.random_range(0..100)),
            2 => "#pi".to_string(),
            _ => "$x".to_string(),
        };
    }
    match rng.random_range(0..8) {
        0 => format!(
            "({} + {})",
            random_formula(rng, depth - 1),
            random_formula(rng, depth - 1)
        ),
        1 => format!(
            "({} - {})",
            random_formula(rng, depth - 1),
            random_formula(rng, depth - 1)
        ),
        2 => format!(
            "{} * {}",
            random_formula(rng, depth - 1),
            random_formula(rng, depth - 1)
        ),
        3 => format!(
            "{} / {}",
            random_formula(rng, depth - 1),
            random_formula(rng, depth - 1)
        ),
        4 => format!("-{}", random_formula(rng, depth - 1)),
        5 => format!(
            "min({}, {})",
            random_formula(rng, depth - 1),
            random_formula(rng, depth - 1)
        ),
        6 => format!("abs({})", random_formula(rng, depth - 1)),
        _ => format!(
            "{} < {}",
            random_formula(rng, depth - 1),
            random_formula(rng, depth - 1)
        ),
    }
}

#[test]
fn parsing_is_a_function() {
    let seed: u64 = rand::random();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..500 {
        let formula = random_formula(&mut rng, 4);
        let first = parse(&formula, &ParseOptions::default());
        let second = parse(&formula, &ParseOptions::default());
        assert_eq!(first, second, "seed {seed}, formula {formula}");
    }
}

#[test]
fn evaluation_is_deterministic() {
    let seed: u64 = rand::random();
    let mut rng = StdRng::seed_from_u64(seed);
    let inputs = [MeasuredValueInput::scalar("$x", 3.25)];
    for _ in 0..500 {
        let formula = random_formula(&mut rng, 4);
        let first = validate(&formula, &inputs, &[]);
        let second = validate(&formula, &inputs, &[]);
        assert_eq!(first, second, "seed {seed}, formula {formula}");
    }
}

#[test]
fn responses_are_valid_xor_error() {
    let seed: u64 = rand::random();
    let mut rng = StdRng::seed_from_u64(seed);
    let inputs = [MeasuredValueInput::scalar("$x", 0.5)];
    for _ in 0..500 {
        let formula = random_formula(&mut rng, 4);
        let response = validate(&formula, &inputs, &[]);
        if response.is_valid {
            assert!(response.result.is_some(), "seed {seed}, formula {formula}");
            assert!(response.error.is_none(), "seed {seed}, formula {formula}");
            assert!(
                response.result.unwrap().is_finite(),
                "seed {seed}, formula {formula}"
            );
        } else {
            assert!(response.result.is_none(), "seed {seed}, formula {formula}");
            assert!(response.error.is_some(), "seed {seed}, formula {formula}");
        }
    }
}

fn shuffle<T>(rng: &mut StdRng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[test]
fn input_order_does_not_matter() {
    let seed: u64 = rand::random();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut measured: Vec<MeasuredValueInput> = (0..6)
        .map(|i| MeasuredValueInput::scalar(format!("$x{i}"), f64::from(i) + 0.5))
        .collect();
    measured.push(MeasuredValueInput::vector("$v", vec![1.0, 2.0, 3.0]).with_unit("m"));
    let mut constants: Vec<ConstantInput> = (0..4)
        .map(|i| ConstantInput::new(format!("#k{i}"), f64::from(i) * 2.0))
        .collect();

    let formula = "$x0 + $x3 * #k2 - $v[1].km + if($x5 > #k1, $x1, $x2)";
    let baseline = validate(formula, &measured, &constants);
    assert!(baseline.is_valid, "baseline failed: {:?}", baseline.error);

    for _ in 0..50 {
        shuffle(&mut rng, &mut measured);
        shuffle(&mut rng, &mut constants);
        let shuffled = validate(formula, &measured, &constants);
        assert_eq!(baseline, shuffled, "seed {seed}");
    }
}
