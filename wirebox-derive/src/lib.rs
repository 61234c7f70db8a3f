//! Derive macros for Wirebox, re-exported for the facade crate.

pub use wirebox_macros::{Injectable, Provider};
