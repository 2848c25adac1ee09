//! Encryption identity derived from a wallet signature
//!
//! The wallet signs a fixed domain message; the first 32 bytes of the
//! signature seed an X25519 keypair. The same wallet and domain always yield
//! the same keypair, so nothing is persisted and re-derivation is always safe.

use std::fmt;
use std::future::Future;

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::DEFAULT_ENCRYPTION_DOMAIN;
use crate::error::{ClientError, ClientResult, SigningError};

/// Seed length taken from the front of the signature
pub const KEY_SEED_LEN: usize = 32;

/// Session encryption keypair
///
/// Lives only in process memory; the secret is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKeyPair {
    public_key: [u8; 32],
    secret_key: [u8; 32],
}

impl EncryptionKeyPair {
    /// Build the keypair for a 32-byte seed
    pub fn from_seed(seed: [u8; KEY_SEED_LEN]) -> Self {
        let secret = StaticSecret::from(seed);
        let public = PublicKey::from(&secret);
        Self {
            public_key: public.to_bytes(),
            secret_key: seed,
        }
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub(crate) fn secret_key(&self) -> &[u8; 32] {
        &self.secret_key
    }
}

/// Equality by public key, which is derived from the secret
impl PartialEq for EncryptionKeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for EncryptionKeyPair {}

impl fmt::Debug for EncryptionKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKeyPair")
            .field("public_key", &crate::codec::to_base64(&self.public_key))
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Capability that signs an opaque message with the user's wallet
pub trait MessageSigner {
    fn sign_message(
        &self,
        message: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, SigningError>> + Send;
}

/// Adapter for synchronous signing closures
pub struct FnSigner<F>(pub F);

impl<F> MessageSigner for FnSigner<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>, SigningError>,
{
    fn sign_message(
        &self,
        message: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, SigningError>> + Send {
        let result = (self.0)(message);
        async move { result }
    }
}

/// Derives the encryption keypair for a domain message
#[derive(Clone, Debug)]
pub struct KeyDeriver {
    domain: String,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_ENCRYPTION_DOMAIN)
    }
}

impl KeyDeriver {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Ask the signer for a signature over the domain message and seed the keypair with it
    pub async fn derive<S: MessageSigner>(&self, signer: &S) -> ClientResult<EncryptionKeyPair> {
        tracing::debug!(domain = %self.domain, "requesting key derivation signature");

        let mut signature = signer.sign_message(self.domain.as_bytes()).await?;
        let keypair = keypair_from_signature(&signature);
        signature.zeroize();

        let keypair = keypair?;
        tracing::info!(
            public_key = %crate::codec::to_base64(keypair.public_key()),
            "encryption key derived"
        );
        Ok(keypair)
    }
}

fn keypair_from_signature(signature: &[u8]) -> ClientResult<EncryptionKeyPair> {
    if signature.len() < KEY_SEED_LEN {
        return Err(ClientError::KeyDerivation {
            expected: KEY_SEED_LEN,
            actual: signature.len(),
        });
    }

    let mut seed = [0u8; KEY_SEED_LEN];
    seed.copy_from_slice(&signature[..KEY_SEED_LEN]);
    let keypair = EncryptionKeyPair::from_seed(seed);
    seed.zeroize();
    Ok(keypair)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_signature(len: usize) -> FnSigner<impl Fn(&[u8]) -> Result<Vec<u8>, SigningError>> {
        FnSigner(move |_msg: &[u8]| -> Result<Vec<u8>, SigningError> {
            Ok((1..=len as u8).collect())
        })
    }

    #[test]
    fn known_public_key_for_seed() {
        let seed: [u8; 32] = core::array::from_fn(|i| i as u8 + 1);
        let keypair = EncryptionKeyPair::from_seed(seed);
        assert_eq!(
            keypair.public_key(),
            &[
                0x07, 0xa3, 0x7c, 0xbc, 0x14, 0x20, 0x93, 0xc8, 0xb7, 0x55, 0xdc, 0x1b, 0x10, 0xe8,
                0x6c, 0xb4, 0x26, 0x37, 0x4a, 0xd1, 0x6a, 0xa8, 0x53, 0xed, 0x0b, 0xdf, 0xc0, 0xb2,
                0xb8, 0x6d, 0x1c, 0x7c,
            ]
        );
        assert_eq!(keypair.secret_key(), &seed);
    }

    #[tokio::test]
    async fn derivation_is_deterministic() {
        let deriver = KeyDeriver::default();
        let first = deriver.derive(&fixed_signature(64)).await.unwrap();
        let second = deriver.derive(&fixed_signature(64)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn only_first_32_bytes_matter() {
        let deriver = KeyDeriver::default();
        let short = deriver.derive(&fixed_signature(32)).await.unwrap();
        let long = deriver.derive(&fixed_signature(64)).await.unwrap();
        assert_eq!(short, long);
    }

    #[tokio::test]
    async fn signs_the_domain_message() {
        let signer = FnSigner(|msg: &[u8]| -> Result<Vec<u8>, SigningError> {
            assert_eq!(msg, b"ShadowLend:v1:encryption");
            Ok(vec![7u8; 64])
        });
        KeyDeriver::default().derive(&signer).await.unwrap();
    }

    #[tokio::test]
    async fn short_signature_is_rejected() {
        let err = KeyDeriver::default()
            .derive(&fixed_signature(31))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::KeyDerivation {
                expected: 32,
                actual: 31
            }
        );
    }

    #[tokio::test]
    async fn rejection_propagates() {
        let signer = FnSigner(|_: &[u8]| -> Result<Vec<u8>, SigningError> {
            Err(SigningError::Rejected)
        });
        let err = KeyDeriver::default().derive(&signer).await.unwrap_err();
        assert_eq!(err, ClientError::Signing(SigningError::Rejected));
    }

    #[test]
    fn equality_follows_public_key() {
        let a = EncryptionKeyPair::from_seed([4u8; 32]);
        let b = EncryptionKeyPair::from_seed([4u8; 32]);
        let c = EncryptionKeyPair::from_seed([5u8; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a.public_key(), c.public_key());
    }

    #[test]
    fn debug_redacts_secret() {
        let keypair = EncryptionKeyPair::from_seed([9u8; 32]);
        let rendered = format!("{:?}", keypair);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret_key: ["));
    }
}
