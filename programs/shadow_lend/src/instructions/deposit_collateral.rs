use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::error::ShadowLendError;
use crate::state::{Pool, Position, ENCRYPTED_VALUE_LEN, VAULT_SEED};

#[derive(Accounts)]
pub struct DepositCollateral<'info> {
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

    /// Vault PDA holding pooled lamports
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

/// Deposit collateral; the client supplies the new encrypted collateral total
pub fn handler(
    ctx: Context<DepositCollateral>,
    amount: u64,
    encrypted_amount: [u8; ENCRYPTED_VALUE_LEN],
) -> Result<()> {
    require!(amount > 0, ShadowLendError::InvalidAmount);

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.owner.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    let clock = Clock::get()?;
    let position = &mut ctx.accounts.position;
    position.encrypted_collateral = encrypted_amount;
    position.last_update = clock.unix_timestamp;

    // Public aggregate only; per-position amount stays encrypted
    let pool = &mut ctx.accounts.pool;
    pool.total_deposits = pool
        .total_deposits
        .checked_add(amount)
        .ok_or(ShadowLendError::ArithmeticOverflow)?;

    emit!(CollateralDeposited {
        position: position.key(),
        owner: position.owner,
        amount,
        timestamp: position.last_update,
    });

    Ok(())
}

#[event]
pub struct CollateralDeposited {
    pub position: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
