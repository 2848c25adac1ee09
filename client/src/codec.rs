//! Balance masking into fixed 32-byte ciphertexts
//!
//! Wire form: `[8-byte masked amount][24-byte nonce]` where
//! `mask = SHA-512(nonce || secret_key)[0..8]` and the amount is u64 LE.
//! The all-zero value is reserved and always decodes to 0.
//!
//! This is a placeholder scheme: it keeps the field width and the zero
//! sentinel a homomorphic or MPC-friendly replacement must preserve, but it
//! offers no comparison over ciphertexts.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};
use shadow_lend::state::{ENCRYPTED_VALUE_LEN, ZERO_CIPHERTEXT};
use zeroize::Zeroize;

use crate::keys::EncryptionKeyPair;

pub const AMOUNT_LEN: usize = 8;
pub const NONCE_LEN: usize = 24;

/// Opaque 32-byte encrypted balance as stored on chain
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncryptedValue(pub [u8; ENCRYPTED_VALUE_LEN]);

impl EncryptedValue {
    /// Uninitialized balance, reads as 0 under any key
    pub const ZERO: EncryptedValue = EncryptedValue(ZERO_CIPHERTEXT);

    pub fn is_zero_sentinel(&self) -> bool {
        self.0 == ZERO_CIPHERTEXT
    }

    pub fn as_bytes(&self) -> &[u8; ENCRYPTED_VALUE_LEN] {
        &self.0
    }

    pub fn nonce(&self) -> &[u8] {
        &self.0[AMOUNT_LEN..]
    }

    pub fn to_base64(&self) -> String {
        to_base64(&self.0)
    }

    /// None unless the input decodes to exactly 32 bytes
    pub fn from_base64(encoded: &str) -> Option<Self> {
        let bytes = STANDARD.decode(encoded.trim()).ok()?;
        let array: [u8; ENCRYPTED_VALUE_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }
}

impl From<[u8; ENCRYPTED_VALUE_LEN]> for EncryptedValue {
    fn from(bytes: [u8; ENCRYPTED_VALUE_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<EncryptedValue> for [u8; ENCRYPTED_VALUE_LEN] {
    fn from(value: EncryptedValue) -> Self {
        value.0
    }
}

impl core::fmt::Debug for EncryptedValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_zero_sentinel() {
            f.write_str("EncryptedValue(ZERO)")
        } else {
            write!(f, "EncryptedValue({})", self.to_base64())
        }
    }
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Encrypt/decrypt balances under a session keypair
pub struct AmountCodec;

impl AmountCodec {
    /// Encrypt with a fresh random nonce
    pub fn encrypt(amount: u64, key: &EncryptionKeyPair) -> EncryptedValue {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        Self::encrypt_with_nonce(amount, key, &nonce)
    }

    /// Deterministic form of `encrypt`; the caller owns nonce uniqueness
    pub fn encrypt_with_nonce(
        amount: u64,
        key: &EncryptionKeyPair,
        nonce: &[u8; NONCE_LEN],
    ) -> EncryptedValue {
        let mut mask = keyed_mask(nonce, key);
        let mut out = [0u8; ENCRYPTED_VALUE_LEN];
        for (i, byte) in amount.to_le_bytes().iter().enumerate() {
            out[i] = byte ^ mask[i];
        }
        out[AMOUNT_LEN..].copy_from_slice(nonce);
        mask.zeroize();

        tracing::debug!("encrypted balance");
        EncryptedValue(out)
    }

    /// Recover the amount; None for anything other than 32 bytes
    ///
    /// A wrong key yields an arbitrary amount rather than an error, so
    /// callers that care compare against a known balance.
    pub fn decrypt(value: &[u8], key: &EncryptionKeyPair) -> Option<u64> {
        if value.len() != ENCRYPTED_VALUE_LEN {
            tracing::warn!(len = value.len(), "ciphertext has wrong length");
            return None;
        }
        if value == ZERO_CIPHERTEXT {
            return Some(0);
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&value[AMOUNT_LEN..]);
        let mut mask = keyed_mask(&nonce, key);

        let mut plain = [0u8; AMOUNT_LEN];
        for i in 0..AMOUNT_LEN {
            plain[i] = value[i] ^ mask[i];
        }
        mask.zeroize();

        Some(u64::from_le_bytes(plain))
    }
}

fn keyed_mask(nonce: &[u8; NONCE_LEN], key: &EncryptionKeyPair) -> [u8; AMOUNT_LEN] {
    let mut hasher = Sha512::new();
    hasher.update(nonce);
    hasher.update(key.secret_key());
    let digest = hasher.finalize();

    let mut mask = [0u8; AMOUNT_LEN];
    mask.copy_from_slice(&digest[..AMOUNT_LEN]);
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed_byte: u8) -> EncryptionKeyPair {
        EncryptionKeyPair::from_seed([seed_byte; 32])
    }

    #[test]
    fn golden_vector() {
        let key = EncryptionKeyPair::from_seed(core::array::from_fn(|i| i as u8 + 1));
        let value = AmountCodec::encrypt_with_nonce(1_500_000_000, &key, &[0xab; NONCE_LEN]);

        assert_eq!(
            &value.0[..AMOUNT_LEN],
            &[0x0f, 0x5b, 0x44, 0xaf, 0x7d, 0xc9, 0xc3, 0x7b]
        );
        assert_eq!(value.nonce(), &[0xab; NONCE_LEN][..]);
        assert_eq!(AmountCodec::decrypt(&value.0, &key), Some(1_500_000_000));
    }

    #[test]
    fn round_trip_edge_amounts() {
        let key = key(3);
        for amount in [0, 1, 255, 256, 10_000_000_000, u64::MAX - 1, u64::MAX] {
            let value = AmountCodec::encrypt(amount, &key);
            assert_eq!(AmountCodec::decrypt(&value.0, &key), Some(amount), "{}", amount);
        }
    }

    #[test]
    fn fresh_nonce_each_time() {
        let key = key(3);
        let a = AmountCodec::encrypt(42, &key);
        let b = AmountCodec::encrypt(42, &key);
        assert_ne!(a, b);
        assert_ne!(a.nonce(), b.nonce());
    }

    #[test]
    fn zero_sentinel_under_any_key() {
        assert_eq!(AmountCodec::decrypt(&ZERO_CIPHERTEXT, &key(1)), Some(0));
        assert_eq!(AmountCodec::decrypt(&ZERO_CIPHERTEXT, &key(2)), Some(0));
        assert!(EncryptedValue::ZERO.is_zero_sentinel());
    }

    #[test]
    fn encrypted_zero_is_not_the_sentinel() {
        let value = AmountCodec::encrypt(0, &key(1));
        assert!(!value.is_zero_sentinel());
        assert_eq!(AmountCodec::decrypt(&value.0, &key(1)), Some(0));
    }

    #[test]
    fn other_key_does_not_recover_amount() {
        let value = AmountCodec::encrypt(5_000_000_000, &key(1));
        assert_ne!(AmountCodec::decrypt(&value.0, &key(2)), Some(5_000_000_000));
    }

    #[test]
    fn wrong_length_is_none() {
        let key = key(1);
        assert_eq!(AmountCodec::decrypt(&[], &key), None);
        assert_eq!(AmountCodec::decrypt(&[0u8; 31], &key), None);
        assert_eq!(AmountCodec::decrypt(&[0u8; 33], &key), None);
    }

    #[test]
    fn base64_round_trip_and_rejects_bad_width() {
        let value = AmountCodec::encrypt(7, &key(1));
        assert_eq!(EncryptedValue::from_base64(&value.to_base64()), Some(value));
        assert_eq!(EncryptedValue::from_base64(&to_base64(&[1u8; 16])), None);
        assert_eq!(EncryptedValue::from_base64("not base64!"), None);
    }
}
