// Path: crates/crypto/src/secret/mod.rs
//! Secret words and the derivation of proposal key material.
//!
//! A proposal is seeded by two values: the operator secret (`SECRET`, shared
//! out-of-band between proposer and accepter) and a random 12-word phrase
//! generated per proposal. Both feed an HMAC-SHA256 derivation that yields:
//!
//! - a 32-byte X25519 ephemeral secret key, whose public half is published as
//!   the Diffie-Hellman point of the config, and
//! - a 16-byte shared secret, encrypted to every operator's config public key.

use crate::algorithms::hash::hmac_sha256;
use crate::error::CodecError;
use bip39::{Language, Mnemonic};
use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Entropy behind a generated phrase: 128 bits, i.e. 12 words.
pub const SECRET_WORDS_ENTROPY_LEN: usize = 16;
/// The length of the shared secret handed to operators.
pub const SHARED_SECRET_LEN: usize = 16;

const EPHEMERAL_KEY_LABEL: &[u8] = b"gauntlet-ocr2/ephemeral-secret-key";
const SHARED_SECRET_LABEL: &[u8] = b"gauntlet-ocr2/shared-secret";

/// Generates a fresh 12-word BIP-39 English phrase.
pub fn generate_secret_words() -> Result<String, CodecError> {
    let mut entropy = [0u8; SECRET_WORDS_ENTROPY_LEN];
    rand::thread_rng().fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| CodecError::Secret(format!("mnemonic generation failed: {}", e)))?;
    entropy.zeroize();
    Ok(mnemonic.to_string())
}

/// Checks that `words` is a valid BIP-39 English phrase.
pub fn validate_secret_words(words: &str) -> Result<(), CodecError> {
    Mnemonic::parse_in_normalized(Language::English, &normalize(words))
        .map(|_| ())
        .map_err(|e| CodecError::Secret(format!("invalid secret words: {}", e)))
}

fn normalize(words: &str) -> String {
    words.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key material derived from a secret and a phrase. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedSecrets {
    ephemeral_secret_key: [u8; 32],
    shared_secret: [u8; SHARED_SECRET_LEN],
}

impl DerivedSecrets {
    /// The X25519 public key matching the ephemeral secret key.
    pub fn ephemeral_public_key(&self) -> [u8; 32] {
        PublicKey::from(&self.ephemeral_secret()).to_bytes()
    }

    /// The shared secret encrypted to each operator.
    pub fn shared_secret(&self) -> &[u8; SHARED_SECRET_LEN] {
        &self.shared_secret
    }

    pub(crate) fn ephemeral_secret(&self) -> StaticSecret {
        StaticSecret::from(self.ephemeral_secret_key)
    }
}

impl std::fmt::Debug for DerivedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedSecrets")
            .field("ephemeral_public_key", &hex::encode(self.ephemeral_public_key()))
            .finish_non_exhaustive()
    }
}

/// Derives the ephemeral key and shared secret from `secret` and `words`.
///
/// Whitespace in `words` is normalized, so a phrase pasted with line breaks
/// derives the same material.
pub fn derive_secrets(secret: &str, words: &str) -> Result<DerivedSecrets, CodecError> {
    if secret.is_empty() {
        return Err(CodecError::Secret("secret must not be empty".into()));
    }
    let words = normalize(words);
    if words.is_empty() {
        return Err(CodecError::Secret("secret words must not be empty".into()));
    }

    let ephemeral_secret_key =
        hmac_sha256(secret.as_bytes(), &[EPHEMERAL_KEY_LABEL, words.as_bytes()])?;
    let mut shared = hmac_sha256(secret.as_bytes(), &[SHARED_SECRET_LABEL, words.as_bytes()])?;
    let mut shared_secret = [0u8; SHARED_SECRET_LEN];
    for (dst, src) in shared_secret.iter_mut().zip(shared.iter()) {
        *dst = *src;
    }
    shared.zeroize();

    Ok(DerivedSecrets {
        ephemeral_secret_key,
        shared_secret,
    })
}
