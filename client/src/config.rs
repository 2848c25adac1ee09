//! Client configuration

use std::str::FromStr;

use anchor_lang::prelude::Pubkey;

use crate::error::{ClientError, ClientResult};

/// Domain-separation message signed to derive the encryption key
/// Changing it changes every user's key, so it is versioned
pub const DEFAULT_ENCRYPTION_DOMAIN: &str = "ShadowLend:v1:encryption";

pub const PROGRAM_ID_ENV: &str = "SHADOW_LEND_PROGRAM_ID";
pub const ENCRYPTION_DOMAIN_ENV: &str = "SHADOW_LEND_ENCRYPTION_DOMAIN";

/// Settings shared by a client session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Deployed lending program
    pub program_id: Pubkey,
    /// Message the wallet signs for key derivation
    pub encryption_domain: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: shadow_lend::ID,
            encryption_domain: DEFAULT_ENCRYPTION_DOMAIN.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `SHADOW_LEND_PROGRAM_ID` / `SHADOW_LEND_ENCRYPTION_DOMAIN`
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(PROGRAM_ID_ENV) {
            config.program_id = Pubkey::from_str(raw.trim()).map_err(|e| {
                ClientError::InvalidConfig(format!("{}={:?}: {}", PROGRAM_ID_ENV, raw, e))
            })?;
        }

        if let Some(domain) = lookup(ENCRYPTION_DOMAIN_ENV) {
            if domain.is_empty() {
                return Err(ClientError::InvalidConfig(format!(
                    "{} must not be empty",
                    ENCRYPTION_DOMAIN_ENV
                )));
            }
            config.encryption_domain = domain;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_declared_program() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.program_id, shadow_lend::ID);
        assert_eq!(config.encryption_domain, "ShadowLend:v1:encryption");
    }

    #[test]
    fn overrides_from_lookup() {
        let other = Pubkey::new_unique();
        let config = ClientConfig::from_lookup(|key| match key {
            PROGRAM_ID_ENV => Some(other.to_string()),
            ENCRYPTION_DOMAIN_ENV => Some("ShadowLend:v2:encryption".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.program_id, other);
        assert_eq!(config.encryption_domain, "ShadowLend:v2:encryption");
    }

    #[test]
    fn rejects_bad_program_id() {
        let err = ClientConfig::from_lookup(|key| {
            (key == PROGRAM_ID_ENV).then(|| "not-a-pubkey".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }
}
