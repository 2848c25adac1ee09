//! Session-scoped handle tying the key, codec, oracle and builder together
//!
//! Each mutating call decrypts the current on-chain position, validates the
//! request against it, encrypts the new balance and assembles the
//! instruction. Nothing is submitted here. Calls that touch the same position
//! must be serialized by the caller, since each one reads the stored
//! ciphertexts the previous one replaces.

use std::sync::OnceLock;

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use shadow_lend::health::{borrow_capacity, max_borrowable};
use shadow_lend::proof::ProofKind;
use shadow_lend::state::{Pool, Position};

use crate::codec::{AmountCodec, EncryptedValue};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::instructions::InstructionBuilder;
use crate::keys::{EncryptionKeyPair, KeyDeriver, MessageSigner};
use crate::oracle::{LocalProofOracle, ProofOracle, ProofRequest};
use crate::position::DecodedPosition;

pub struct LendingSession<O = LocalProofOracle> {
    config: ClientConfig,
    deriver: KeyDeriver,
    builder: InstructionBuilder,
    oracle: O,
    key: OnceLock<EncryptionKeyPair>,
}

impl LendingSession<LocalProofOracle> {
    pub fn local(config: ClientConfig) -> Self {
        Self::new(config, LocalProofOracle)
    }
}

impl<O: ProofOracle> LendingSession<O> {
    pub fn new(config: ClientConfig, oracle: O) -> Self {
        Self {
            deriver: KeyDeriver::new(config.encryption_domain.clone()),
            builder: InstructionBuilder::new(config.program_id),
            config,
            oracle,
            key: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn builder(&self) -> &InstructionBuilder {
        &self.builder
    }

    pub fn is_unlocked(&self) -> bool {
        self.key.get().is_some()
    }

    pub fn public_key(&self) -> Option<&[u8; 32]> {
        self.key.get().map(EncryptionKeyPair::public_key)
    }

    /// Derive the encryption key on first use; later calls reuse it
    pub async fn unlock<S: MessageSigner>(&self, signer: &S) -> ClientResult<&EncryptionKeyPair> {
        if let Some(key) = self.key.get() {
            return Ok(key);
        }
        let derived = self.deriver.derive(signer).await?;
        // A concurrent unlock with the same wallet derives the same key
        Ok(self.key.get_or_init(|| derived))
    }

    /// None when locked or when the ciphertexts do not belong to this key
    pub fn decode_position(&self, pool: &Pool, position: &Position) -> Option<DecodedPosition> {
        let key = self.key.get()?;
        DecodedPosition::decrypt(pool, position, key)
    }

    pub fn open_position(&self, owner: &Pubkey) -> Instruction {
        self.builder.open_position(owner)
    }

    pub fn deposit_collateral(
        &self,
        owner: &Pubkey,
        pool: &Pool,
        position: &Position,
        amount: u64,
    ) -> ClientResult<Instruction> {
        require_amount(amount)?;
        let (key, current) = self.current(pool, position)?;

        let new_collateral = current
            .collateral
            .checked_add(amount)
            .ok_or(ClientError::InvalidOperand("collateral would overflow"))?;
        let value = seal(new_collateral, key);

        tracing::info!(%owner, "deposit prepared");
        self.builder.deposit_collateral(owner, amount, &value)
    }

    pub async fn borrow(
        &self,
        owner: &Pubkey,
        pool: &Pool,
        position: &Position,
        amount: u64,
    ) -> ClientResult<Instruction> {
        require_amount(amount)?;
        let (key, current) = self.current(pool, position)?;

        let available = max_borrowable(current.collateral, current.debt, pool.ltv_ratio);
        if amount > available {
            return Err(ClientError::Undercollateralized {
                debt: current.debt.saturating_add(amount),
                capacity: borrow_capacity(current.collateral, pool.ltv_ratio),
            });
        }

        let request = ProofRequest::for_position(ProofKind::Borrow, position, amount, pool.ltv_ratio);
        let proof = self.oracle.prove(&request).await?;
        let value = seal(current.debt + amount, key);

        tracing::info!(%owner, "borrow prepared");
        self.builder.borrow(owner, amount, &value, &proof)
    }

    pub fn repay(
        &self,
        owner: &Pubkey,
        pool: &Pool,
        position: &Position,
        amount: u64,
    ) -> ClientResult<Instruction> {
        require_amount(amount)?;
        let (key, current) = self.current(pool, position)?;

        if amount > current.debt {
            return Err(ClientError::InsufficientBalance {
                requested: amount,
                available: current.debt,
            });
        }
        let value = seal(current.debt - amount, key);

        tracing::info!(%owner, "repay prepared");
        self.builder.repay(owner, amount, &value)
    }

    pub async fn withdraw_collateral(
        &self,
        owner: &Pubkey,
        pool: &Pool,
        position: &Position,
        amount: u64,
    ) -> ClientResult<Instruction> {
        require_amount(amount)?;
        let (key, current) = self.current(pool, position)?;

        if amount > current.collateral {
            return Err(ClientError::InsufficientBalance {
                requested: amount,
                available: current.collateral,
            });
        }
        let remaining = current.collateral - amount;
        let capacity = borrow_capacity(remaining, pool.ltv_ratio);
        if current.debt > capacity {
            return Err(ClientError::Undercollateralized {
                debt: current.debt,
                capacity,
            });
        }

        let request =
            ProofRequest::for_position(ProofKind::Withdraw, position, amount, pool.ltv_ratio);
        let proof = self.oracle.prove(&request).await?;
        let value = seal(remaining, key);

        tracing::info!(%owner, "withdrawal prepared");
        self.builder.withdraw_collateral(owner, amount, &value, &proof)
    }

    /// Liquidate someone else's position; `seize` is the collateral the oracle attests to
    ///
    /// Needs no key: the liquidator cannot decrypt the position.
    pub async fn liquidate(
        &self,
        liquidator: &Pubkey,
        pool: &Pool,
        position: &Position,
        seize: u64,
    ) -> ClientResult<Instruction> {
        if !position.is_active {
            return Err(ClientError::InvalidOperand("position is not active"));
        }
        let request = ProofRequest::for_position(
            ProofKind::Liquidation,
            position,
            seize,
            pool.liquidation_threshold,
        );
        let proof = self.oracle.prove(&request).await?;

        tracing::info!(%liquidator, owner = %position.owner, "liquidation prepared");
        self.builder.liquidate(liquidator, &position.owner, seize, &proof)
    }

    /// Only a position whose stored balances are both the zero sentinel can close
    pub fn close_position(&self, owner: &Pubkey, position: &Position) -> ClientResult<Instruction> {
        if !position.is_empty() {
            return Err(ClientError::PositionNotEmpty);
        }
        Ok(self.builder.close_position(owner))
    }

    fn current(
        &self,
        pool: &Pool,
        position: &Position,
    ) -> ClientResult<(&EncryptionKeyPair, DecodedPosition)> {
        let key = self.key.get().ok_or(ClientError::Locked)?;
        let decoded =
            DecodedPosition::decrypt(pool, position, key).ok_or(ClientError::Undecryptable)?;
        Ok((key, decoded))
    }
}

fn require_amount(amount: u64) -> ClientResult<()> {
    if amount == 0 {
        return Err(ClientError::InvalidOperand("amount must be greater than zero"));
    }
    Ok(())
}

/// Zero balances are written as the sentinel so an emptied position can close
fn seal(amount: u64, key: &EncryptionKeyPair) -> EncryptedValue {
    if amount == 0 {
        EncryptedValue::ZERO
    } else {
        AmountCodec::encrypt(amount, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SigningError;
    use crate::keys::FnSigner;

    const SOL: u64 = 1_000_000_000;

    fn signer() -> FnSigner<fn(&[u8]) -> Result<Vec<u8>, SigningError>> {
        fn sign(msg: &[u8]) -> Result<Vec<u8>, SigningError> {
            let mut sig = msg.to_vec();
            sig.resize(64, 0x5c);
            Ok(sig)
        }
        FnSigner(sign)
    }

    fn pool() -> Pool {
        Pool {
            ltv_ratio: 7500,
            liquidation_threshold: 8000,
            is_active: true,
            ..Pool::default()
        }
    }

    fn position_with(key: &EncryptionKeyPair, collateral: u64, debt: u64) -> Position {
        Position {
            encrypted_collateral: seal(collateral, key).0,
            encrypted_debt: seal(debt, key).0,
            is_active: true,
            ..Position::default()
        }
    }

    async fn unlocked() -> LendingSession {
        let session = LendingSession::local(ClientConfig::default());
        session.unlock(&signer()).await.unwrap();
        session
    }

    #[tokio::test]
    async fn locked_session_refuses_balance_updates() {
        let session = LendingSession::local(ClientConfig::default());
        let owner = Pubkey::new_unique();
        let err = session
            .deposit_collateral(&owner, &pool(), &Position::default(), 1)
            .unwrap_err();
        assert_eq!(err, ClientError::Locked);
        assert!(session.decode_position(&pool(), &Position::default()).is_none());
    }

    #[tokio::test]
    async fn unlock_is_write_once() {
        let session = LendingSession::local(ClientConfig::default());
        let first = *session.unlock(&signer()).await.unwrap().public_key();
        let other = FnSigner(|_: &[u8]| -> Result<Vec<u8>, SigningError> { Ok(vec![1; 64]) });
        let second = *session.unlock(&other).await.unwrap().public_key();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn borrow_beyond_capacity_rejected() {
        let session = unlocked().await;
        let key = session.key.get().unwrap();
        let position = position_with(key, 10 * SOL, 5 * SOL);
        let owner = Pubkey::new_unique();

        let err = session
            .borrow(&owner, &pool(), &position, 2_500_000_001)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Undercollateralized {
                debt: 7_500_000_001,
                capacity: 7_500_000_000
            }
        );
        assert!(session
            .borrow(&owner, &pool(), &position, 2_500_000_000)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn withdraw_checks_balance_and_remaining_capacity() {
        let session = unlocked().await;
        let key = session.key.get().unwrap();
        let position = position_with(key, 10 * SOL, 6 * SOL);
        let owner = Pubkey::new_unique();

        let err = session
            .withdraw_collateral(&owner, &pool(), &position, 11 * SOL)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InsufficientBalance { .. }));

        // 8 SOL left supports exactly 6 SOL of debt at 75%
        assert!(session
            .withdraw_collateral(&owner, &pool(), &position, 2 * SOL)
            .await
            .is_ok());
        let err = session
            .withdraw_collateral(&owner, &pool(), &position, 2 * SOL + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Undercollateralized { .. }));
    }

    #[tokio::test]
    async fn full_repay_writes_sentinel() {
        let session = unlocked().await;
        let key = session.key.get().unwrap();
        let position = position_with(key, SOL, SOL / 2);
        let owner = Pubkey::new_unique();

        let ix = session.repay(&owner, &pool(), &position, SOL / 2).unwrap();
        assert_eq!(&ix.data[16..48], &[0u8; 32]);

        let err = session.repay(&owner, &pool(), &position, SOL).unwrap_err();
        assert_eq!(
            err,
            ClientError::InsufficientBalance {
                requested: SOL,
                available: SOL / 2
            }
        );
    }

    #[tokio::test]
    async fn close_requires_sentinel_balances() {
        let session = unlocked().await;
        let key = session.key.get().unwrap();
        let owner = Pubkey::new_unique();

        let funded = position_with(key, SOL, 0);
        assert_eq!(
            session.close_position(&owner, &funded).unwrap_err(),
            ClientError::PositionNotEmpty
        );
        let empty = position_with(key, 0, 0);
        assert!(session.close_position(&owner, &empty).is_ok());
    }

    #[tokio::test]
    async fn zero_amount_checked_before_key() {
        let session = LendingSession::local(ClientConfig::default());
        let owner = Pubkey::new_unique();
        assert_eq!(
            session
                .repay(&owner, &pool(), &Position::default(), 0)
                .unwrap_err(),
            ClientError::InvalidOperand("amount must be greater than zero")
        );
    }

    #[tokio::test]
    async fn liquidation_needs_no_key() {
        let session = LendingSession::local(ClientConfig::default());
        let keyless = EncryptionKeyPair::from_seed([2; 32]);
        let mut position = position_with(&keyless, 10 * SOL, 9 * SOL);
        position.owner = Pubkey::new_unique();

        let liquidator = Pubkey::new_unique();
        let ix = session
            .liquidate(&liquidator, &pool(), &position, SOL)
            .await
            .unwrap();
        assert_eq!(ix.accounts[3].pubkey, liquidator);

        position.is_active = false;
        assert!(session
            .liquidate(&liquidator, &pool(), &position, SOL)
            .await
            .is_err());
    }
}
