pub mod borrow;
pub mod close_position;
pub mod deposit_collateral;
pub mod initialize_pool;
pub mod liquidate;
pub mod open_position;
pub mod repay;
pub mod withdraw_collateral;

pub use borrow::*;
pub use close_position::*;
pub use deposit_collateral::*;
pub use initialize_pool::*;
pub use liquidate::*;
pub use open_position::*;
pub use repay::*;
pub use withdraw_collateral::*;

use anchor_lang::prelude::*;

/// Vault lamports that can leave without dropping below rent exemption
/// The floor itself is funded by the pool authority in `initialize_pool`
pub(crate) fn vault_available_lamports(vault: &SystemAccount) -> Result<u64> {
    let rent_floor = Rent::get()?.minimum_balance(0);
    Ok(vault.lamports().saturating_sub(rent_floor))
}
