use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::error::ShadowLendError;
use crate::proof::{verify_proof, ProofKind};
use crate::state::{Pool, Position, ENCRYPTED_VALUE_LEN, VAULT_SEED};

#[derive(Accounts)]
pub struct WithdrawCollateral<'info> {
    #[account(
        mut,
        seeds = [Pool::SEED],
        bump = pool.bump,
        constraint = pool.is_active @ ShadowLendError::PoolInactive
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [Position::SEED, owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ ShadowLendError::Unauthorized,
        constraint = position.is_active @ ShadowLendError::PositionInactive
    )]
    pub position: Account<'info, Position>,

    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Withdraw collateral
/// Requires an oracle proof that (collateral - amount) * LTV >= debt
pub fn handler(
    ctx: Context<WithdrawCollateral>,
    amount: u64,
    encrypted_new_collateral: [u8; ENCRYPTED_VALUE_LEN],
    proof: Vec<u8>,
) -> Result<()> {
    require!(amount > 0, ShadowLendError::InvalidAmount);

    require!(
        verify_proof(
            ProofKind::Withdraw,
            &proof,
            &ctx.accounts.position,
            amount,
            ctx.accounts.pool.ltv_ratio,
        ),
        ShadowLendError::InvalidProof
    );

    let available = super::vault_available_lamports(&ctx.accounts.vault)?;
    require!(available >= amount, ShadowLendError::InsufficientLiquidity);

    let pool_key = ctx.accounts.pool.key();
    let vault_seeds: &[&[u8]] = &[VAULT_SEED, pool_key.as_ref(), &[ctx.bumps.vault]];
    system_program::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.owner.to_account_info(),
            },
            &[vault_seeds],
        ),
        amount,
    )?;

    let clock = Clock::get()?;
    let position = &mut ctx.accounts.position;
    position.encrypted_collateral = encrypted_new_collateral;
    position.last_update = clock.unix_timestamp;

    let pool = &mut ctx.accounts.pool;
    pool.total_deposits = pool.total_deposits.saturating_sub(amount);

    emit!(CollateralWithdrawn {
        position: position.key(),
        owner: position.owner,
        amount,
        timestamp: position.last_update,
    });

    Ok(())
}

#[event]
pub struct CollateralWithdrawn {
    pub position: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
