//! Instruction data and account lists for the lending program
//!
//! Data layout: `discriminator (8) || operands`, operands little-endian.
//! Proof blobs carry a u32 LE length prefix. The encoders are pure: the same
//! inputs always produce the same bytes, and they never adjust an amount.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::system_program;

use crate::codec::EncryptedValue;
use crate::error::{ClientError, ClientResult};
use crate::pda::{pool_address, position_address, vault_address};

/// Instruction discriminators for the shadow_lend program
/// Computed as sha256("global:<instruction_name>")[0..8]
pub mod discriminators {
    pub const INITIALIZE_POOL: [u8; 8] = [0x5f, 0xb4, 0x0a, 0xac, 0x54, 0xae, 0xe8, 0x28];
    pub const OPEN_POSITION: [u8; 8] = [0x87, 0x80, 0x2f, 0x4d, 0x0f, 0x98, 0xf0, 0x31];
    pub const DEPOSIT_COLLATERAL: [u8; 8] = [0x9c, 0x83, 0x8e, 0x74, 0x92, 0xf7, 0xa2, 0x78];
    pub const BORROW: [u8; 8] = [0xe4, 0xfd, 0x83, 0xca, 0xcf, 0x74, 0x59, 0x12];
    pub const REPAY: [u8; 8] = [0xea, 0x67, 0x43, 0x52, 0xd0, 0xea, 0xdb, 0xa6];
    pub const WITHDRAW_COLLATERAL: [u8; 8] = [0x73, 0x87, 0xa8, 0x6a, 0x8b, 0xd6, 0x8a, 0x96];
    pub const LIQUIDATE: [u8; 8] = [0xdf, 0xb3, 0xe2, 0x7d, 0x30, 0x2e, 0x27, 0x4a];
    pub const CLOSE_POSITION: [u8; 8] = [0x7b, 0x86, 0x51, 0x00, 0x31, 0x44, 0x62, 0x62];
}

/// Risk parameters for `initialize_pool`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolParams {
    pub collateral_mint: Pubkey,
    pub borrow_mint: Pubkey,
    pub ltv_ratio: u16,
    pub interest_rate: u16,
    pub liquidation_threshold: u16,
}

pub fn initialize_pool_data(params: &PoolParams) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + 32 + 32 + 2 * 3);
    data.extend_from_slice(&discriminators::INITIALIZE_POOL);
    data.extend_from_slice(params.collateral_mint.as_ref());
    data.extend_from_slice(params.borrow_mint.as_ref());
    data.extend_from_slice(&params.ltv_ratio.to_le_bytes());
    data.extend_from_slice(&params.interest_rate.to_le_bytes());
    data.extend_from_slice(&params.liquidation_threshold.to_le_bytes());
    data
}

pub fn open_position_data() -> Vec<u8> {
    discriminators::OPEN_POSITION.to_vec()
}

pub fn close_position_data() -> Vec<u8> {
    discriminators::CLOSE_POSITION.to_vec()
}

/// `amount || new encrypted collateral`
pub fn deposit_collateral_data(amount: u64, new_collateral: &EncryptedValue) -> ClientResult<Vec<u8>> {
    amount_with_value(discriminators::DEPOSIT_COLLATERAL, amount, new_collateral)
}

/// `amount || new encrypted debt`
pub fn repay_data(amount: u64, new_debt: &EncryptedValue) -> ClientResult<Vec<u8>> {
    amount_with_value(discriminators::REPAY, amount, new_debt)
}

/// `amount || new encrypted debt || proof_len || proof`
pub fn borrow_data(amount: u64, new_debt: &EncryptedValue, proof: &[u8]) -> ClientResult<Vec<u8>> {
    let mut data = amount_with_value(discriminators::BORROW, amount, new_debt)?;
    append_proof(&mut data, proof)?;
    Ok(data)
}

/// `amount || new encrypted collateral || proof_len || proof`
pub fn withdraw_collateral_data(
    amount: u64,
    new_collateral: &EncryptedValue,
    proof: &[u8],
) -> ClientResult<Vec<u8>> {
    let mut data = amount_with_value(discriminators::WITHDRAW_COLLATERAL, amount, new_collateral)?;
    append_proof(&mut data, proof)?;
    Ok(data)
}

/// `seized amount || proof_len || proof`
///
/// A zero amount is allowed: the position is still deactivated.
pub fn liquidate_data(amount: u64, proof: &[u8]) -> ClientResult<Vec<u8>> {
    let mut data = Vec::with_capacity(8 + 8 + 4 + proof.len());
    data.extend_from_slice(&discriminators::LIQUIDATE);
    data.extend_from_slice(&amount.to_le_bytes());
    append_proof(&mut data, proof)?;
    Ok(data)
}

fn amount_with_value(
    discriminator: [u8; 8],
    amount: u64,
    value: &EncryptedValue,
) -> ClientResult<Vec<u8>> {
    if amount == 0 {
        return Err(ClientError::InvalidOperand("amount must be greater than zero"));
    }

    let mut data = Vec::with_capacity(8 + 8 + 32);
    data.extend_from_slice(&discriminator);
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(value.as_bytes());
    Ok(data)
}

fn append_proof(data: &mut Vec<u8>, proof: &[u8]) -> ClientResult<()> {
    if proof.is_empty() {
        return Err(ClientError::InvalidOperand("proof is required"));
    }
    let len = u32::try_from(proof.len())
        .map_err(|_| ClientError::InvalidOperand("proof exceeds u32 length"))?;

    data.reserve(4 + proof.len());
    data.extend_from_slice(&len.to_le_bytes());
    data.extend_from_slice(proof);
    Ok(())
}

/// Builds full instructions (program id, account metas, data)
///
/// Account order mirrors the program's `#[derive(Accounts)]` structs.
#[derive(Clone, Copy, Debug)]
pub struct InstructionBuilder {
    program_id: Pubkey,
}

impl InstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn initialize_pool(&self, authority: &Pubkey, params: &PoolParams) -> Instruction {
        let (pool, _) = pool_address(&self.program_id);
        let (vault, _) = vault_address(&self.program_id, &pool);
        tracing::info!(%authority, ltv = params.ltv_ratio, "building initialize_pool");
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pool, false),
                AccountMeta::new(vault, false),
                AccountMeta::new(*authority, true),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: initialize_pool_data(params),
        }
    }

    pub fn open_position(&self, owner: &Pubkey) -> Instruction {
        let (pool, _) = pool_address(&self.program_id);
        let (position, _) = position_address(&self.program_id, owner);
        tracing::info!(%owner, "building open_position");
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pool, false),
                AccountMeta::new(position, false),
                AccountMeta::new(*owner, true),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: open_position_data(),
        }
    }

    pub fn deposit_collateral(
        &self,
        owner: &Pubkey,
        amount: u64,
        new_collateral: &EncryptedValue,
    ) -> ClientResult<Instruction> {
        let data = deposit_collateral_data(amount, new_collateral)?;
        tracing::info!(%owner, "building deposit_collateral");
        Ok(self.owner_vault_instruction(owner, data))
    }

    pub fn borrow(
        &self,
        owner: &Pubkey,
        amount: u64,
        new_debt: &EncryptedValue,
        proof: &[u8],
    ) -> ClientResult<Instruction> {
        let data = borrow_data(amount, new_debt, proof)?;
        tracing::info!(%owner, proof_len = proof.len(), "building borrow");
        Ok(self.owner_vault_instruction(owner, data))
    }

    pub fn repay(
        &self,
        owner: &Pubkey,
        amount: u64,
        new_debt: &EncryptedValue,
    ) -> ClientResult<Instruction> {
        let data = repay_data(amount, new_debt)?;
        tracing::info!(%owner, "building repay");
        Ok(self.owner_vault_instruction(owner, data))
    }

    pub fn withdraw_collateral(
        &self,
        owner: &Pubkey,
        amount: u64,
        new_collateral: &EncryptedValue,
        proof: &[u8],
    ) -> ClientResult<Instruction> {
        let data = withdraw_collateral_data(amount, new_collateral, proof)?;
        tracing::info!(%owner, proof_len = proof.len(), "building withdraw_collateral");
        Ok(self.owner_vault_instruction(owner, data))
    }

    /// `position_owner` locates the position; `liquidator` signs and receives the seized lamports
    pub fn liquidate(
        &self,
        liquidator: &Pubkey,
        position_owner: &Pubkey,
        amount: u64,
        proof: &[u8],
    ) -> ClientResult<Instruction> {
        let data = liquidate_data(amount, proof)?;
        let (pool, _) = pool_address(&self.program_id);
        let (position, _) = position_address(&self.program_id, position_owner);
        let (vault, _) = vault_address(&self.program_id, &pool);
        tracing::info!(%liquidator, %position, "building liquidate");
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pool, false),
                AccountMeta::new(position, false),
                AccountMeta::new(vault, false),
                AccountMeta::new(*liquidator, true),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data,
        })
    }

    pub fn close_position(&self, owner: &Pubkey) -> Instruction {
        let (pool, _) = pool_address(&self.program_id);
        let (position, _) = position_address(&self.program_id, owner);
        tracing::info!(%owner, "building close_position");
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pool, false),
                AccountMeta::new(position, false),
                AccountMeta::new(*owner, true),
            ],
            data: close_position_data(),
        }
    }

    /// pool, position, vault, owner, system_program
    fn owner_vault_instruction(&self, owner: &Pubkey, data: Vec<u8>) -> Instruction {
        let (pool, _) = pool_address(&self.program_id);
        let (position, _) = position_address(&self.program_id, owner);
        let (vault, _) = vault_address(&self.program_id, &pool);
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pool, false),
                AccountMeta::new(position, false),
                AccountMeta::new(vault, false),
                AccountMeta::new(*owner, true),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data,
        }
    }
}
