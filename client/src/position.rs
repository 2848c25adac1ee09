//! Decrypted view of a position

use shadow_lend::health::{
    health_factor, max_borrowable, projected_health, HealthFactor, HealthStatus, PositionAction,
};
use shadow_lend::state::{Pool, Position};

use crate::codec::AmountCodec;
use crate::keys::EncryptionKeyPair;

/// Plaintext balances and solvency metrics; recomputed on every refresh, never stored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedPosition {
    pub collateral: u64,
    pub debt: u64,
    pub health_factor: HealthFactor,
    pub max_borrow: u64,
}

impl DecodedPosition {
    /// None if either balance fails to decrypt
    pub fn decrypt(pool: &Pool, position: &Position, key: &EncryptionKeyPair) -> Option<Self> {
        let collateral = AmountCodec::decrypt(&position.encrypted_collateral, key);
        let debt = AmountCodec::decrypt(&position.encrypted_debt, key);
        let (Some(collateral), Some(debt)) = (collateral, debt) else {
            tracing::warn!(owner = %position.owner, "position could not be decrypted");
            return None;
        };
        Some(Self::from_balances(pool, collateral, debt))
    }

    pub fn from_balances(pool: &Pool, collateral: u64, debt: u64) -> Self {
        Self {
            collateral,
            debt,
            health_factor: health_factor(collateral, debt, pool.liquidation_threshold),
            max_borrow: max_borrowable(collateral, debt, pool.ltv_ratio),
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.health_factor.status()
    }

    /// Both balances are zero
    pub fn is_empty(&self) -> bool {
        self.collateral == 0 && self.debt == 0
    }

    /// Health preview for a prospective action
    pub fn preview(&self, pool: &Pool, action: PositionAction, amount: u64) -> HealthFactor {
        projected_health(
            self.collateral,
            self.debt,
            pool.liquidation_threshold,
            action,
            amount,
        )
    }
}
