use anchor_lang::prelude::*;

/// Width of every encrypted balance field: [8-byte masked amount][24-byte nonce]
pub const ENCRYPTED_VALUE_LEN: usize = 32;

/// Reserved ciphertext meaning "uninitialized, treat as zero"
pub const ZERO_CIPHERTEXT: [u8; ENCRYPTED_VALUE_LEN] = [0u8; ENCRYPTED_VALUE_LEN];

/// User's confidential lending position
/// Collateral and debt are stored only as ciphertexts produced client-side;
/// the program never sees the plaintext amounts it guards.
/// Size: 8 (discriminator) + 138 = 146 bytes
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct Position {
    /// Position owner's public key
    pub owner: Pubkey,

    /// Pool this position borrows from
    pub pool: Pubkey,

    /// Encrypted collateral amount (32 bytes, opaque to the program)
    pub encrypted_collateral: [u8; ENCRYPTED_VALUE_LEN],

    /// Encrypted debt amount (32 bytes, opaque to the program)
    pub encrypted_debt: [u8; ENCRYPTED_VALUE_LEN],

    /// Unix timestamp of the last balance update
    pub last_update: i64,

    /// Cleared once the position has been liquidated
    pub is_active: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Position {
    pub const SIZE: usize = 8 + // discriminator
        32 + // owner
        32 + // pool
        32 + // encrypted_collateral
        32 + // encrypted_debt
        8 +  // last_update
        1 +  // is_active
        1;   // bump
    // Total: 146 bytes

    pub const SEED: &'static [u8] = b"position";

    /// Both balances hold the zero sentinel, the only state that may be closed
    pub fn is_empty(&self) -> bool {
        self.encrypted_collateral == ZERO_CIPHERTEXT && self.encrypted_debt == ZERO_CIPHERTEXT
    }

    /// Terminal state after liquidation: inactive with both balances reset,
    /// so the owner can still close the account and open a new one
    pub fn write_off(&mut self) {
        self.encrypted_collateral = ZERO_CIPHERTEXT;
        self.encrypted_debt = ZERO_CIPHERTEXT;
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_size_matches_serialized_length() {
        let position = Position::default();
        let mut data = Vec::new();
        position.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), Position::SIZE);
        assert_eq!(Position::SIZE, 8 + 32 * 4 + 8 + 1 * 2);
    }

    #[test]
    fn empty_only_when_both_sentinels() {
        let mut position = Position::default();
        assert!(position.is_empty());

        position.encrypted_debt[31] = 1;
        assert!(!position.is_empty(), "non-zero debt ciphertext");

        position.encrypted_debt = ZERO_CIPHERTEXT;
        position.encrypted_collateral[0] = 0xff;
        assert!(!position.is_empty(), "non-zero collateral ciphertext");
    }

    #[test]
    fn written_off_position_can_close() {
        let mut position = Position {
            encrypted_collateral: [0x11; ENCRYPTED_VALUE_LEN],
            encrypted_debt: [0x22; ENCRYPTED_VALUE_LEN],
            is_active: true,
            ..Position::default()
        };
        assert!(!position.is_empty());

        position.write_off();
        assert!(position.is_empty());
        assert!(!position.is_active);
    }
}
