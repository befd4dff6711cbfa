// Path: crates/crypto/src/algorithms/mod.rs
//! Hash and MAC primitives.

pub mod hash;
