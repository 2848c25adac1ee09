use anchor_lang::prelude::*;

use crate::error::ShadowLendError;
use crate::state::{Pool, Position};

#[derive(Accounts)]
pub struct ClosePosition<'info> {
    #[account(
        mut,
        seeds = [Pool::SEED],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [Position::SEED, owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ ShadowLendError::Unauthorized,
        constraint = position.is_empty() @ ShadowLendError::PositionNotEmpty,
        close = owner
    )]
    pub position: Account<'info, Position>,

    #[account(mut)]
    pub owner: Signer<'info>,
}

/// Close an empty position and return its rent to the owner
/// Liquidated positions (inactive) were already removed from the active count
pub fn handler(ctx: Context<ClosePosition>) -> Result<()> {
    let position = &ctx.accounts.position;

    if position.is_active {
        let pool = &mut ctx.accounts.pool;
        pool.active_positions = pool.active_positions.saturating_sub(1);
    }

    emit!(PositionClosed {
        position: position.key(),
        owner: position.owner,
    });

    Ok(())
}

#[event]
pub struct PositionClosed {
    pub position: Pubkey,
    pub owner: Pubkey,
}
