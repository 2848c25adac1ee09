use anchor_lang::prelude::*;

#[error_code]
pub enum ShadowLendError {
    #[msg("Invalid amount: must be greater than 0")]
    InvalidAmount,

    #[msg("Invalid solvency proof")]
    InvalidProof,

    #[msg("Insufficient liquidity in pool")]
    InsufficientLiquidity,

    #[msg("Position is healthy, cannot liquidate")]
    PositionHealthy,

    #[msg("Position still holds collateral or debt")]
    PositionNotEmpty,

    #[msg("Position is not active")]
    PositionInactive,

    #[msg("Pool is not active")]
    PoolInactive,

    #[msg("Invalid risk parameters (bps must be <= 10000 and ltv <= liquidation threshold)")]
    InvalidRiskParams,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Unauthorized access")]
    Unauthorized,
}
