// Path: crates/execution/src/validation.rs
//! Account address checks shared by instruction validations.

use bech32::Variant;

/// Whether `address` is a well-formed bech32 account or contract address.
///
/// Only classic bech32 is accepted, not bech32m.
pub fn is_valid_address(address: &str) -> bool {
    matches!(bech32::decode(address), Ok((_, _, Variant::Bech32)))
}
