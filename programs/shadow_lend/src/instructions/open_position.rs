use anchor_lang::prelude::*;

use crate::error::ShadowLendError;
use crate::state::{Pool, Position, ZERO_CIPHERTEXT};

#[derive(Accounts)]
pub struct OpenPosition<'info> {
    #[account(
        mut,
        seeds = [Pool::SEED],
        bump = pool.bump,
        constraint = pool.is_active @ ShadowLendError::PoolInactive
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init,
        payer = owner,
        space = Position::SIZE,
        seeds = [Position::SEED, owner.key().as_ref()],
        bump
    )]
    pub position: Account<'info, Position>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Create an empty position; both balances start as the zero sentinel
pub fn handler(ctx: Context<OpenPosition>) -> Result<()> {
    let clock = Clock::get()?;
    let pool = &mut ctx.accounts.pool;
    let position = &mut ctx.accounts.position;

    position.owner = ctx.accounts.owner.key();
    position.pool = pool.key();
    position.encrypted_collateral = ZERO_CIPHERTEXT;
    position.encrypted_debt = ZERO_CIPHERTEXT;
    position.last_update = clock.unix_timestamp;
    position.is_active = true;
    position.bump = ctx.bumps.position;

    pool.active_positions = pool
        .active_positions
        .checked_add(1)
        .ok_or(ShadowLendError::ArithmeticOverflow)?;

    emit!(PositionOpened {
        position: position.key(),
        owner: position.owner,
        pool: pool.key(),
    });

    msg!("Position opened for {}", position.owner);

    Ok(())
}

#[event]
pub struct PositionOpened {
    pub position: Pubkey,
    pub owner: Pubkey,
    pub pool: Pubkey,
}
