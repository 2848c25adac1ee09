use anchor_lang::prelude::*;

use crate::health::BPS_DENOMINATOR;

/// Seed for the vault PDA holding pooled lamports: [VAULT_SEED, pool]
pub const VAULT_SEED: &[u8] = b"vault";

/// Public lending pool state
/// Risk parameters and aggregate counters are visible to everyone;
/// per-user amounts live encrypted in `Position`.
/// Size: 8 (discriminator) + 128 = 136 bytes
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct Pool {
    /// Authority that initialized the pool
    pub authority: Pubkey,

    /// Mint accepted as collateral
    pub collateral_mint: Pubkey,

    /// Mint lent out to borrowers
    pub borrow_mint: Pubkey,

    /// Loan-to-value ratio in basis points (e.g., 7500 = 75%)
    pub ltv_ratio: u16,

    /// Annual interest rate in basis points
    pub interest_rate: u16,

    /// Liquidation threshold in basis points (e.g., 8000 = 80%)
    pub liquidation_threshold: u16,

    /// Total lamports deposited as collateral (public aggregate)
    pub total_deposits: u64,

    /// Total lamports borrowed (public aggregate)
    pub total_borrows: u64,

    /// Number of open positions
    pub active_positions: u64,

    /// PDA bump seed
    pub bump: u8,

    /// Whether the pool accepts new operations
    pub is_active: bool,
}

impl Pool {
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // collateral_mint
        32 + // borrow_mint
        2 +  // ltv_ratio
        2 +  // interest_rate
        2 +  // liquidation_threshold
        8 +  // total_deposits
        8 +  // total_borrows
        8 +  // active_positions
        1 +  // bump
        1;   // is_active
    // Total: 136 bytes

    pub const SEED: &'static [u8] = b"pool";

    /// Risk parameters must be valid basis points and the LTV may not exceed
    /// the liquidation threshold, otherwise a fresh max borrow is liquidatable
    pub fn validate_risk_params(
        ltv_ratio: u16,
        interest_rate: u16,
        liquidation_threshold: u16,
    ) -> bool {
        let max = BPS_DENOMINATOR as u16;
        ltv_ratio <= max
            && interest_rate <= max
            && liquidation_threshold <= max
            && ltv_ratio <= liquidation_threshold
    }
}
