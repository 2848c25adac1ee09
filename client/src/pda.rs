//! Program-derived addresses for pool, positions and the lamport vault

use anchor_lang::prelude::Pubkey;
use shadow_lend::state::{Pool, Position, VAULT_SEED};

/// `[b"pool"]`
pub fn pool_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[Pool::SEED], program_id)
}

/// `[b"position", owner]`
pub fn position_address(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[Position::SEED, owner.as_ref()], program_id)
}

/// `[b"vault", pool]`
pub fn vault_address(program_id: &Pubkey, pool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, pool.as_ref()], program_id)
}
