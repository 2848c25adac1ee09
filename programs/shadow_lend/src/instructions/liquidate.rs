use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::error::ShadowLendError;
use crate::proof::{verify_proof, ProofKind};
use crate::state::{Pool, Position, VAULT_SEED};

#[derive(Accounts)]
pub struct Liquidate<'info> {
    #[account(
        mut,
        seeds = [Pool::SEED],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [Position::SEED, position.owner.as_ref()],
        bump = position.bump,
        constraint = position.pool == pool.key() @ ShadowLendError::Unauthorized,
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
    pub liquidator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Liquidate an unhealthy position
/// The oracle proof attests health < liquidation threshold and binds the
/// collateral amount handed to the liquidator
pub fn handler(ctx: Context<Liquidate>, amount: u64, proof: Vec<u8>) -> Result<()> {
    require!(
        verify_proof(
            ProofKind::Liquidation,
            &proof,
            &ctx.accounts.position,
            amount,
            ctx.accounts.pool.liquidation_threshold,
        ),
        ShadowLendError::PositionHealthy
    );

    let seized = amount.min(super::vault_available_lamports(&ctx.accounts.vault)?);
    if seized > 0 {
        let pool_key = ctx.accounts.pool.key();
        let vault_seeds: &[&[u8]] = &[VAULT_SEED, pool_key.as_ref(), &[ctx.bumps.vault]];
        system_program::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vault.to_account_info(),
                    to: ctx.accounts.liquidator.to_account_info(),
                },
                &[vault_seeds],
            ),
            seized,
        )?;
    }

    let clock = Clock::get()?;
    let position = &mut ctx.accounts.position;
    // `total_borrows` keeps the unrecovered debt: its plaintext never reaches the program
    position.write_off();
    position.last_update = clock.unix_timestamp;

    let pool = &mut ctx.accounts.pool;
    pool.total_deposits = pool.total_deposits.saturating_sub(seized);
    pool.active_positions = pool.active_positions.saturating_sub(1);

    emit!(PositionLiquidated {
        position: position.key(),
        owner: position.owner,
        liquidator: ctx.accounts.liquidator.key(),
        seized,
        timestamp: clock.unix_timestamp,
    });

    msg!("Position {} liquidated", position.key());

    Ok(())
}

#[event]
pub struct PositionLiquidated {
    pub position: Pubkey,
    pub owner: Pubkey,
    pub liquidator: Pubkey,
    pub seized: u64,
    pub timestamp: i64,
}
