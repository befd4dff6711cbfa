// Path: crates/crypto/src/error.rs
//! Local error types for the `gauntlet-crypto` crate.

// Re-export the canonical error type from the types crate.
pub use gauntlet_types::error::CodecError;
