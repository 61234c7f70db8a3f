//! # Wirebox Support
//!
//! Shared utilities for the Wirebox crates.
//!
//! This crate provides:
//! - Type-name shortening for error messages
//! - Plan tables and declaring-level chains for diagnostics
//! - "Did you mean?" suggestions

pub mod rendering;
