//! Built-in function registry
//!
//! An immutable, case-insensitive table of function definitions. A
//! process-wide instance is built once behind a `OnceLock` and shared
//! read-only across requests; the evaluator receives it by reference so it
//! stays trivially testable with a locally-built registry.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::core::error::ValidationError;

/// Definition of a built-in numeric function.
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical lowercase name (e.g. "sin", "round").
    pub name: &'static str,

    /// Acceptable argument count (arity).
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation; rejections carry a user-facing message.
    pub eval: fn(&[f64]) -> Result<f64, String>,
}

impl FunctionDefinition {
    #[inline]
    pub(crate) fn accepts_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }

    /// The arity bound nearest to a rejected argument count, used in the
    /// `Function expects N argument(s).` message.
    pub(crate) fn nearest_arity(&self, got: usize) -> usize {
        if got < *self.arity.start() {
            *self.arity.start()
        } else {
            *self.arity.end()
        }
    }
}

/// Immutable name-keyed table of built-in functions.
pub struct FunctionRegistry {
    by_name: FxHashMap<&'static str, FunctionDefinition>,
}

static REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

impl FunctionRegistry {
    /// Build a registry holding the canonical built-in set
    #[must_use]
    pub fn builtin() -> Self {
        let mut by_name = FxHashMap::default();
        for def in crate::functions::definitions::all_definitions() {
            by_name.insert(def.name, def);
        }
        FunctionRegistry { by_name }
    }

    /// The shared process-wide registry, built on first use
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::builtin)
    }

    /// Whether a function of this name exists (case-insensitive)
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&FunctionDefinition> {
        self.by_name.get(name.to_ascii_lowercase().as_str())
    }

    /// Resolve and invoke a function over already-evaluated arguments.
    pub(crate) fn call(&self, name: &str, args: &[f64]) -> Result<f64, ValidationError> {
        let Some(def) = self.lookup(name) else {
            return Err(ValidationError::UnknownFunction {
                name: name.to_string(),
            });
        };
        if !def.accepts_arity(args.len()) {
            return Err(ValidationError::ArityMismatch {
                expected: def.nearest_arity(args.len()),
            });
        }
        (def.eval)(args).map_err(|message| ValidationError::InvalidOperation { message })
    }
}
