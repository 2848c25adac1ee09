//! Solvency arithmetic over decrypted balances
//!
//! Pure integer math shared by the program and the client so both sides
//! agree bit-for-bit on rounding. Every intermediate is widened to u128;
//! the only rounding step is the final (floor) division.

/// 10000 bps = 100%
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Health factor is expressed as a percentage: 100 = exactly at the liquidation boundary
pub const HEALTH_FACTOR_SCALE: u64 = 100;

/// Health factor of a position
///
/// Variant order matters: `Infinite` compares greater than every finite value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealthFactor {
    /// Percentage, floor-rounded
    Percent(u128),
    /// Position has no debt and cannot be liquidated
    Infinite,
}

impl HealthFactor {
    /// Finite health strictly below the boundary
    pub fn is_liquidatable(&self) -> bool {
        matches!(self, HealthFactor::Percent(p) if *p < HEALTH_FACTOR_SCALE as u128)
    }

    pub fn as_percent(&self) -> Option<u128> {
        match self {
            HealthFactor::Percent(p) => Some(*p),
            HealthFactor::Infinite => None,
        }
    }

    pub fn status(&self) -> HealthStatus {
        match self {
            HealthFactor::Infinite => HealthStatus::Safe,
            HealthFactor::Percent(p) if *p > 200 => HealthStatus::Safe,
            HealthFactor::Percent(p) if *p >= 150 => HealthStatus::Healthy,
            HealthFactor::Percent(p) if *p >= 120 => HealthStatus::Moderate,
            HealthFactor::Percent(p) if *p >= 100 => HealthStatus::AtRisk,
            HealthFactor::Percent(_) => HealthStatus::Critical,
        }
    }
}

impl core::fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HealthFactor::Percent(p) => write!(f, "{}%", p),
            HealthFactor::Infinite => f.write_str("---"),
        }
    }
}

/// Coarse solvency band used for display
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Safe,
    Healthy,
    Moderate,
    AtRisk,
    Critical,
}

/// Operation applied to a position when projecting its health
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionAction {
    Deposit,
    Borrow,
    Repay,
    Withdraw,
}

/// health = (collateral * liquidation_threshold_bps * 100) / (debt * 10000)
pub fn health_factor(collateral: u64, debt: u64, liquidation_threshold_bps: u16) -> HealthFactor {
    if debt == 0 {
        return HealthFactor::Infinite;
    }

    // u64 * u16 * 100 and u64 * 10000 both fit in u128 without overflow
    let numerator = collateral as u128
        * liquidation_threshold_bps as u128
        * HEALTH_FACTOR_SCALE as u128;
    let denominator = debt as u128 * BPS_DENOMINATOR as u128;

    HealthFactor::Percent(numerator / denominator)
}

/// Remaining borrow capacity: collateral * ltv / 10000 - debt, clamped at zero
pub fn max_borrowable(collateral: u64, debt: u64, ltv_bps: u16) -> u64 {
    let capacity = borrow_capacity(collateral, ltv_bps);
    capacity.saturating_sub(debt)
}

/// Total debt a given collateral supports at the pool LTV
pub fn borrow_capacity(collateral: u64, ltv_bps: u16) -> u64 {
    let capacity = collateral as u128 * ltv_bps as u128 / BPS_DENOMINATOR as u128;
    // Only exceeds u64 when ltv_bps > 10000, which pools reject
    u64::try_from(capacity).unwrap_or(u64::MAX)
}

/// Health after applying `action` with `amount`
///
/// Repay and withdraw clamp at zero; the result is a preview, callers still
/// reject amounts above the current balance before building instructions.
pub fn projected_health(
    collateral: u64,
    debt: u64,
    liquidation_threshold_bps: u16,
    action: PositionAction,
    amount: u64,
) -> HealthFactor {
    let (collateral, debt) = match action {
        PositionAction::Deposit => (collateral.saturating_add(amount), debt),
        PositionAction::Borrow => (collateral, debt.saturating_add(amount)),
        PositionAction::Repay => (collateral, debt.saturating_sub(amount)),
        PositionAction::Withdraw => (collateral.saturating_sub(amount), debt),
    };
    health_factor(collateral, debt, liquidation_threshold_bps)
}

/// Basis points to a percentage for display (7500 -> 75.0)
pub fn bps_to_percent(bps: u16) -> f64 {
    bps as f64 / 100.0
}
