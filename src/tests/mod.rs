//! Crate-level integration and property tests

mod properties;
