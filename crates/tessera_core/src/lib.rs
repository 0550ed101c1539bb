//! Core - shared utilities for the Tessera pipeline.
//!
//! This crate holds the small foundation the pipeline crates build on:
//! stable content hashing for scope and document identifiers, and the
//! JavaScript-side helpers used when synthesizing glue code.

pub mod hash;
pub mod js;

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};
