use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::error::ShadowLendError;
use crate::state::{Pool, VAULT_SEED};

#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = authority,
        space = Pool::SIZE,
        seeds = [Pool::SEED],
        bump
    )]
    pub pool: Account<'info, Pool>,

    /// Vault PDA; its rent-exempt floor is paid by the authority, never by depositors
    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializePool>,
    collateral_mint: Pubkey,
    borrow_mint: Pubkey,
    ltv_ratio: u16,
    interest_rate: u16,
    liquidation_threshold: u16,
) -> Result<()> {
    require!(
        Pool::validate_risk_params(ltv_ratio, interest_rate, liquidation_threshold),
        ShadowLendError::InvalidRiskParams
    );

    let rent_floor = Rent::get()?.minimum_balance(0);
    let shortfall = rent_floor.saturating_sub(ctx.accounts.vault.lamports());
    if shortfall > 0 {
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.authority.to_account_info(),
                    to: ctx.accounts.vault.to_account_info(),
                },
            ),
            shortfall,
        )?;
    }

    let pool = &mut ctx.accounts.pool;
    pool.authority = ctx.accounts.authority.key();
    pool.collateral_mint = collateral_mint;
    pool.borrow_mint = borrow_mint;
    pool.ltv_ratio = ltv_ratio;
    pool.interest_rate = interest_rate;
    pool.liquidation_threshold = liquidation_threshold;
    pool.total_deposits = 0;
    pool.total_borrows = 0;
    pool.active_positions = 0;
    pool.bump = ctx.bumps.pool;
    pool.is_active = true;

    emit!(PoolInitialized {
        pool: pool.key(),
        collateral_mint,
        borrow_mint,
        ltv_ratio,
        interest_rate,
        liquidation_threshold,
    });

    msg!(
        "Pool initialized: ltv={} bps, interest={} bps, liquidation threshold={} bps",
        ltv_ratio,
        interest_rate,
        liquidation_threshold
    );

    Ok(())
}

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub collateral_mint: Pubkey,
    pub borrow_mint: Pubkey,
    pub ltv_ratio: u16,
    pub interest_rate: u16,
    pub liquidation_threshold: u16,
}
