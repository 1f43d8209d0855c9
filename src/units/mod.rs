//! Unit conversion resolver
//!
//! Holds an immutable catalog mapping case-insensitive unit aliases to a
//! canonical unit within one quantity category, and exposes a single
//! conversion operation. Most categories convert by ratio through the
//! category pivot; temperature is affine (Celsius/Fahrenheit/Kelvin).
//!
//! A textually identical `from`/`to` pair converts as the identity even
//! when the alias is unknown to the catalog. The surface DSL relies on
//! this no-op self-conversion for unitless passthrough, but it does not
//! legitimize typos: differing unknown aliases still fail.

mod catalog;

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

/// A group of unit aliases among which conversion is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Quantity {
    /// Meters, miles, inches, ...
    Length,
    /// Kilograms, pounds, ...
    Mass,
    /// Seconds, hours, days, ...
    Duration,
    /// Kelvin, Celsius, Fahrenheit (affine).
    Temperature,
    /// Amperes and scaled variants.
    ElectricCurrent,
    /// Volts and scaled variants.
    ElectricPotential,
    /// Ohms and scaled variants.
    ElectricResistance,
    /// Liters, gallons, cubic meters, ...
    Volume,
    /// Pascals, bar, psi, ...
    Pressure,
    /// Newtons, pound-force, ...
    Force,
    /// Joules, calories, kilowatt-hours, ...
    Energy,
    /// Watts, horsepower, ...
    Power,
}

/// Why a conversion was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConversionError {
    /// The alias has no catalog entry.
    UnknownAlias {
        /// The rejected alias.
        alias: String,
    },
    /// The aliases belong to different quantity categories.
    QuantityMismatch {
        /// Category of the source alias.
        from: Quantity,
        /// Category of the target alias.
        to: Quantity,
    },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::UnknownAlias { alias } => {
                write!(f, "unknown unit alias '{}'", alias)
            }
            ConversionError::QuantityMismatch { from, to } => {
                write!(f, "cannot convert between {:?} and {:?}", from, to)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

#[derive(Clone, Copy)]
struct UnitDef {
    canonical: &'static str,
    quantity: Quantity,
    factor: f64,
    offset: f64,
}

/// Immutable catalog of unit aliases with one conversion operation.
pub struct UnitResolver {
    aliases: FxHashMap<&'static str, UnitDef>,
}

static RESOLVER: OnceLock<UnitResolver> = OnceLock::new();

impl UnitResolver {
    /// Build a resolver holding the built-in catalog
    #[must_use]
    pub fn builtin() -> Self {
        let mut aliases = FxHashMap::default();
        for spec in catalog::CATALOG {
            let def = UnitDef {
                canonical: spec.canonical,
                quantity: spec.quantity,
                factor: spec.factor,
                offset: spec.offset,
            };
            for alias in spec.aliases {
                aliases.insert(*alias, def);
            }
        }
        UnitResolver { aliases }
    }

    /// The shared process-wide resolver, built on first use
    #[must_use]
    pub fn global() -> &'static Self {
        RESOLVER.get_or_init(Self::builtin)
    }

    /// Whether an alias has a catalog entry (case-insensitive)
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.lookup(alias).is_some()
    }

    /// The quantity category of an alias, if known
    #[must_use]
    pub fn quantity_of(&self, alias: &str) -> Option<Quantity> {
        self.lookup(alias).map(|def| def.quantity)
    }

    fn lookup(&self, alias: &str) -> Option<UnitDef> {
        self.aliases
            .get(alias.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// Convert `value` from one alias to another.
    ///
    /// Identical aliases (case-insensitive) convert as the exact identity,
    /// even when unknown to the catalog. Otherwise both aliases must
    /// resolve within the same quantity category.
    pub fn try_convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        if from.trim().eq_ignore_ascii_case(to.trim()) {
            return Ok(value);
        }
        let from_def = self.lookup(from).ok_or_else(|| ConversionError::UnknownAlias {
            alias: from.to_string(),
        })?;
        let to_def = self.lookup(to).ok_or_else(|| ConversionError::UnknownAlias {
            alias: to.to_string(),
        })?;
        if from_def.quantity != to_def.quantity {
            return Err(ConversionError::QuantityMismatch {
                from: from_def.quantity,
                to: to_def.quantity,
            });
        }
        if from_def.canonical == to_def.canonical {
            return Ok(value);
        }
        Ok((value * from_def.factor + from_def.offset - to_def.offset) / to_def.factor)
    }
}
