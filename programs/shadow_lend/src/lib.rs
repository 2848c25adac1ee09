use anchor_lang::prelude::*;

pub mod error;
pub mod health;
pub mod instructions;
pub mod proof;
pub mod state;

use instructions::*;

declare_id!("8dBNWFxxdvHmoZWKuS1rGzGGmBxdXxHXauYAiTPM4Zan");

/// Confidential lending protocol
///
/// - Pool: public state (risk parameters, aggregate deposits/borrows, position count)
/// - Position: collateral and debt stored only as 32-byte ciphertexts
/// - Health factor is computed client-side after decryption; the program
///   relies on oracle proofs bound to the stored ciphertexts
#[program]
pub mod shadow_lend {
    use super::*;

    /// Initialize the lending pool with its risk parameters
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        collateral_mint: Pubkey,
        borrow_mint: Pubkey,
        ltv_ratio: u16,
        interest_rate: u16,
        liquidation_threshold: u16,
    ) -> Result<()> {
        instructions::initialize_pool::handler(
            ctx,
            collateral_mint,
            borrow_mint,
            ltv_ratio,
            interest_rate,
            liquidation_threshold,
        )
    }

    /// Open an empty position for the signer
    pub fn open_position(ctx: Context<OpenPosition>) -> Result<()> {
        instructions::open_position::handler(ctx)
    }

    /// Deposit collateral; `encrypted_amount` is the new encrypted collateral total
    pub fn deposit_collateral(
        ctx: Context<DepositCollateral>,
        amount: u64,
        encrypted_amount: [u8; 32],
    ) -> Result<()> {
        instructions::deposit_collateral::handler(ctx, amount, encrypted_amount)
    }

    /// Borrow against collateral with an oracle solvency proof
    pub fn borrow(
        ctx: Context<Borrow>,
        amount: u64,
        encrypted_new_debt: [u8; 32],
        proof: Vec<u8>,
    ) -> Result<()> {
        instructions::borrow::handler(ctx, amount, encrypted_new_debt, proof)
    }

    /// Repay borrowed lamports
    pub fn repay(ctx: Context<Repay>, amount: u64, encrypted_new_debt: [u8; 32]) -> Result<()> {
        instructions::repay::handler(ctx, amount, encrypted_new_debt)
    }

    /// Withdraw collateral with an oracle proof that the position stays healthy
    pub fn withdraw_collateral(
        ctx: Context<WithdrawCollateral>,
        amount: u64,
        encrypted_new_collateral: [u8; 32],
        proof: Vec<u8>,
    ) -> Result<()> {
        instructions::withdraw_collateral::handler(ctx, amount, encrypted_new_collateral, proof)
    }

    /// Liquidate an unhealthy position (anyone can call with a valid proof)
    pub fn liquidate(ctx: Context<Liquidate>, amount: u64, proof: Vec<u8>) -> Result<()> {
        instructions::liquidate::handler(ctx, amount, proof)
    }

    /// Close an empty position
    pub fn close_position(ctx: Context<ClosePosition>) -> Result<()> {
        instructions::close_position::handler(ctx)
    }
}

// =============================================================================
// CONSTANT VERIFICATION TESTS
// =============================================================================
// Clients hardcode these discriminators; if a handler is renamed these fail.

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::Discriminator;

    #[test]
    fn verify_program_id() {
        assert_eq!(
            ID.to_string(),
            "8dBNWFxxdvHmoZWKuS1rGzGGmBxdXxHXauYAiTPM4Zan",
            "program id bytes do not match expected Base58"
        );
    }

    /// sha256("global:<name>")[0..8]
    #[test]
    fn verify_instruction_discriminators() {
        assert_eq!(
            instruction::InitializePool::DISCRIMINATOR,
            &[0x5f, 0xb4, 0x0a, 0xac, 0x54, 0xae, 0xe8, 0x28]
        );
        assert_eq!(
            instruction::OpenPosition::DISCRIMINATOR,
            &[0x87, 0x80, 0x2f, 0x4d, 0x0f, 0x98, 0xf0, 0x31]
        );
        assert_eq!(
            instruction::DepositCollateral::DISCRIMINATOR,
            &[0x9c, 0x83, 0x8e, 0x74, 0x92, 0xf7, 0xa2, 0x78]
        );
        assert_eq!(
            instruction::Borrow::DISCRIMINATOR,
            &[0xe4, 0xfd, 0x83, 0xca, 0xcf, 0x74, 0x59, 0x12]
        );
        assert_eq!(
            instruction::Repay::DISCRIMINATOR,
            &[0xea, 0x67, 0x43, 0x52, 0xd0, 0xea, 0xdb, 0xa6]
        );
        assert_eq!(
            instruction::WithdrawCollateral::DISCRIMINATOR,
            &[0x73, 0x87, 0xa8, 0x6a, 0x8b, 0xd6, 0x8a, 0x96]
        );
        assert_eq!(
            instruction::Liquidate::DISCRIMINATOR,
            &[0xdf, 0xb3, 0xe2, 0x7d, 0x30, 0x2e, 0x27, 0x4a]
        );
        assert_eq!(
            instruction::ClosePosition::DISCRIMINATOR,
            &[0x7b, 0x86, 0x51, 0x00, 0x31, 0x44, 0x62, 0x62]
        );
    }

    /// sha256("account:<Name>")[0..8]
    #[test]
    fn verify_account_discriminators() {
        assert_eq!(
            state::Pool::DISCRIMINATOR,
            &[0xf1, 0x9a, 0x6d, 0x04, 0x11, 0xb1, 0x6d, 0xbc]
        );
        assert_eq!(
            state::Position::DISCRIMINATOR,
            &[0xaa, 0xbc, 0x8f, 0xe4, 0x7a, 0x40, 0xf7, 0xd0]
        );
    }
}
