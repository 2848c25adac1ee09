use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::error::ShadowLendError;
use crate::state::{Pool, Position, ENCRYPTED_VALUE_LEN, VAULT_SEED};

#[derive(Accounts)]
pub struct Repay<'info> {
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

pub fn handler(
    ctx: Context<Repay>,
    amount: u64,
    encrypted_new_debt: [u8; ENCRYPTED_VALUE_LEN],
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
    position.encrypted_debt = encrypted_new_debt;
    position.last_update = clock.unix_timestamp;

    let pool = &mut ctx.accounts.pool;
    pool.total_borrows = pool.total_borrows.saturating_sub(amount);

    emit!(Repaid {
        position: position.key(),
        owner: position.owner,
        amount,
        timestamp: position.last_update,
    });

    Ok(())
}

#[event]
pub struct Repaid {
    pub position: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
