// Path: crates/crypto/src/encryption/mod.rs
//! Per-operator encryption of the proposal's shared secret.
//!
//! For each operator `i` with config public key `P_i`:
//!
//! ```text
//! k_i   = keccak256(X25519(ephemeral_secret, P_i))[..16]
//! enc_i = AES-128(k_i, shared_secret)            // one block, no mode
//! ```
//!
//! The blob also carries the ephemeral public key and `keccak256(shared_secret)`
//! so an operator can check it recovered the right value.

use crate::algorithms::hash::keccak256;
use crate::error::CodecError;
use crate::secret::{DerivedSecrets, SHARED_SECRET_LEN};
use aes_gcm::aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes_gcm::aes::{Aes128, Block};
use x25519_dalek::{PublicKey, StaticSecret};

/// The length of an X25519 config public key.
pub const CONFIG_PUBLIC_KEY_LEN: usize = 32;

/// The encryptions of the shared secret carried inside an offchain config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedSecretEncryptions {
    /// The ephemeral X25519 public key.
    pub diffie_hellman_point: Vec<u8>,
    /// Keccak-256 of the shared secret.
    pub shared_secret_hash: Vec<u8>,
    /// One 16-byte ciphertext per operator, in oracle order.
    pub encryptions: Vec<Vec<u8>>,
}

/// Parses a hex config public key (prefix already stripped).
pub fn config_public_key_from_hex(key: &str) -> Result<[u8; CONFIG_PUBLIC_KEY_LEN], CodecError> {
    let raw = hex::decode(key.trim_start_matches("0x")).map_err(|e| CodecError::InvalidPublicKey {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    <[u8; CONFIG_PUBLIC_KEY_LEN]>::try_from(raw.as_slice()).map_err(|_| CodecError::InvalidPublicKey {
        key: key.to_string(),
        reason: format!("expected {} bytes, got {}", CONFIG_PUBLIC_KEY_LEN, raw.len()),
    })
}

fn operator_key(ephemeral: &StaticSecret, peer: [u8; 32]) -> [u8; 16] {
    let agreement = ephemeral.diffie_hellman(&PublicKey::from(peer));
    let digest = keccak256(agreement.as_bytes());
    let mut key = [0u8; 16];
    for (dst, src) in key.iter_mut().zip(digest.iter()) {
        *dst = *src;
    }
    key
}

/// Encrypts the shared secret to every operator's config public key.
pub fn encrypt_shared_secret(
    config_public_keys: &[[u8; CONFIG_PUBLIC_KEY_LEN]],
    secrets: &DerivedSecrets,
) -> SharedSecretEncryptions {
    let ephemeral = secrets.ephemeral_secret();
    let encryptions = config_public_keys
        .iter()
        .map(|pk| {
            let cipher = Aes128::new(&operator_key(&ephemeral, *pk).into());
            let mut block: Block = (*secrets.shared_secret()).into();
            cipher.encrypt_block(&mut block);
            block.to_vec()
        })
        .collect();

    SharedSecretEncryptions {
        diffie_hellman_point: secrets.ephemeral_public_key().to_vec(),
        shared_secret_hash: keccak256(secrets.shared_secret()).to_vec(),
        encryptions,
    }
}

/// Recovers the shared secret as operator `index`, holding `config_secret_key`.
///
/// Fails if the recovered value does not hash to `shared_secret_hash`.
pub fn decrypt_shared_secret(
    config_secret_key: [u8; 32],
    encryptions: &SharedSecretEncryptions,
    index: usize,
) -> Result<[u8; SHARED_SECRET_LEN], CodecError> {
    let point = <[u8; 32]>::try_from(encryptions.diffie_hellman_point.as_slice())
        .map_err(|_| CodecError::Secret("diffie-hellman point must be 32 bytes".into()))?;
    let ciphertext = encryptions
        .encryptions
        .get(index)
        .ok_or_else(|| CodecError::Secret(format!("no encryption for oracle {}", index)))?;
    let ciphertext = <[u8; SHARED_SECRET_LEN]>::try_from(ciphertext.as_slice())
        .map_err(|_| CodecError::Secret("encryption must be one AES block".into()))?;

    let own = StaticSecret::from(config_secret_key);
    let cipher = Aes128::new(&operator_key(&own, point).into());
    let mut block: Block = ciphertext.into();
    cipher.decrypt_block(&mut block);
    let mut shared = [0u8; SHARED_SECRET_LEN];
    shared.copy_from_slice(&block);

    if keccak256(&shared).as_slice() != encryptions.shared_secret_hash.as_slice() {
        return Err(CodecError::Secret("shared secret hash mismatch".into()));
    }
    Ok(shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::derive_secrets;

    fn operator(seed: u8) -> ([u8; 32], [u8; 32]) {
        let sk = [seed; 32];
        let pk = PublicKey::from(&StaticSecret::from(sk)).to_bytes();
        (sk, pk)
    }

    #[test]
    fn every_operator_recovers_the_secret() {
        let secrets = derive_secrets("s3cr3t", "one two three").unwrap();
        let ops: Vec<_> = (1..=4).map(operator).collect();
        let pks: Vec<_> = ops.iter().map(|(_, pk)| *pk).collect();
        let sse = encrypt_shared_secret(&pks, &secrets);

        assert_eq!(sse.encryptions.len(), 4);
        assert!(sse.encryptions.iter().all(|e| e.len() == 16));
        for (i, (sk, _)) in ops.iter().enumerate() {
            assert_eq!(&decrypt_shared_secret(*sk, &sse, i).unwrap(), secrets.shared_secret());
        }
    }

    #[test]
    fn wrong_operator_key_fails_hash_check() {
        let secrets = derive_secrets("s3cr3t", "one two three").unwrap();
        let (_, pk) = operator(1);
        let (other_sk, _) = operator(9);
        let sse = encrypt_shared_secret(&[pk], &secrets);
        assert!(decrypt_shared_secret(other_sk, &sse, 0).is_err());
        assert!(decrypt_shared_secret(other_sk, &sse, 3).is_err());
    }

    #[test]
    fn encryption_is_deterministic() {
        let pks = [operator(1).1, operator(2).1];
        let a = encrypt_shared_secret(&pks, &derive_secrets("s", "w").unwrap());
        let b = encrypt_shared_secret(&pks, &derive_secrets("s", "w").unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn parses_hex_keys() {
        let (_, pk) = operator(3);
        assert_eq!(config_public_key_from_hex(&hex::encode(pk)).unwrap(), pk);
        assert!(matches!(
            config_public_key_from_hex("abcd"),
            Err(CodecError::InvalidPublicKey { .. })
        ));
        assert!(config_public_key_from_hex("zz").is_err());
    }
}
