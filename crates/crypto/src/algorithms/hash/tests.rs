//! Tests for hash function implementations

use super::{hmac_sha256, keccak256};

#[test]
fn keccak_of_empty_input() {
    // Keccak-256, not SHA3-256: the padding differs.
    assert_eq!(
        hex::encode(keccak256(b"")),
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
}

#[test]
fn hmac_concatenates_parts() {
    let joined = hmac_sha256(b"key", &[b"hello world"]).unwrap();
    let split = hmac_sha256(b"key", &[b"hello ", b"world"]).unwrap();
    assert_eq!(joined, split);
    assert_ne!(joined, hmac_sha256(b"other", &[b"hello world"]).unwrap());
}
