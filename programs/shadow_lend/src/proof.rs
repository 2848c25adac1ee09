//! Solvency proof layout and verification
//!
//! Proofs are produced off-chain by the confidential-compute oracle and only
//! transported by the client. The program checks that a proof is bound to the
//! position's current ciphertexts, the requested amount and the pool's risk
//! parameter before accepting a borrow, withdrawal or liquidation.
//!
//! Proof format (64 bytes):
//! - Bytes 0-15:  First 16 bytes of encrypted_collateral (binding)
//! - Bytes 16-31: First 16 bytes of encrypted_debt (binding)
//! - Bytes 32-39: Amount (u64 little-endian, seized collateral for liquidation)
//! - Bytes 40-41: Risk parameter in bps (u16 little-endian)
//! - Bytes 42-57: Binding hash
//! - Bytes 58-63: Reserved

use anchor_lang::prelude::*;
use solana_sha256_hasher::hashv;

use crate::state::Position;

pub const PROOF_LEN: usize = 64;

pub const COLLATERAL_BINDING_OFFSET: usize = 0;
pub const DEBT_BINDING_OFFSET: usize = 16;
pub const BINDING_PREFIX_LEN: usize = 16;
pub const AMOUNT_OFFSET: usize = 32;
pub const PARAM_OFFSET: usize = 40;
pub const HASH_OFFSET: usize = 42;
pub const HASH_LEN: usize = 16;

/// Operation a proof attests to
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProofKind {
    /// collateral * ltv >= debt + amount
    Borrow,
    /// (collateral - amount) * ltv >= debt
    Withdraw,
    /// health factor < liquidation threshold
    Liquidation,
}

impl ProofKind {
    /// Domain tag mixed into the binding hash so a proof cannot be replayed
    /// for a different operation
    pub fn tag(&self) -> u8 {
        match self {
            ProofKind::Borrow => 1,
            ProofKind::Withdraw => 2,
            ProofKind::Liquidation => 3,
        }
    }
}

/// Fields carried by a proof, parsed out of the raw blob
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ProofFields {
    pub collateral_binding: [u8; BINDING_PREFIX_LEN],
    pub debt_binding: [u8; BINDING_PREFIX_LEN],
    pub amount: u64,
    pub risk_param_bps: u16,
    pub binding_hash: [u8; HASH_LEN],
}

impl ProofFields {
    /// Parse a proof blob; None if shorter than `PROOF_LEN`
    pub fn parse(proof: &[u8]) -> Option<Self> {
        if proof.len() < PROOF_LEN {
            return None;
        }

        let mut collateral_binding = [0u8; BINDING_PREFIX_LEN];
        collateral_binding.copy_from_slice(
            &proof[COLLATERAL_BINDING_OFFSET..COLLATERAL_BINDING_OFFSET + BINDING_PREFIX_LEN],
        );
        let mut debt_binding = [0u8; BINDING_PREFIX_LEN];
        debt_binding
            .copy_from_slice(&proof[DEBT_BINDING_OFFSET..DEBT_BINDING_OFFSET + BINDING_PREFIX_LEN]);
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&proof[AMOUNT_OFFSET..AMOUNT_OFFSET + 8]);
        let mut param = [0u8; 2];
        param.copy_from_slice(&proof[PARAM_OFFSET..PARAM_OFFSET + 2]);
        let mut binding_hash = [0u8; HASH_LEN];
        binding_hash.copy_from_slice(&proof[HASH_OFFSET..HASH_OFFSET + HASH_LEN]);

        Some(Self {
            collateral_binding,
            debt_binding,
            amount: u64::from_le_bytes(amount),
            risk_param_bps: u16::from_le_bytes(param),
            binding_hash,
        })
    }
}

/// sha256(tag || collateral || debt || amount || param)[0..16]
pub fn compute_proof_binding(
    kind: ProofKind,
    encrypted_collateral: &[u8; 32],
    encrypted_debt: &[u8; 32],
    amount: u64,
    risk_param_bps: u16,
) -> [u8; HASH_LEN] {
    let hash_result = hashv(&[
        &[kind.tag()][..],
        &encrypted_collateral[..],
        &encrypted_debt[..],
        &amount.to_le_bytes()[..],
        &risk_param_bps.to_le_bytes()[..],
    ]);
    let mut result = [0u8; HASH_LEN];
    result.copy_from_slice(&hash_result.to_bytes()[..HASH_LEN]);
    result
}

/// Pack a proof in the layout above (used by the placeholder oracle)
pub fn encode_proof(
    kind: ProofKind,
    encrypted_collateral: &[u8; 32],
    encrypted_debt: &[u8; 32],
    amount: u64,
    risk_param_bps: u16,
) -> [u8; PROOF_LEN] {
    let mut proof = [0u8; PROOF_LEN];
    proof[COLLATERAL_BINDING_OFFSET..COLLATERAL_BINDING_OFFSET + BINDING_PREFIX_LEN]
        .copy_from_slice(&encrypted_collateral[..BINDING_PREFIX_LEN]);
    proof[DEBT_BINDING_OFFSET..DEBT_BINDING_OFFSET + BINDING_PREFIX_LEN]
        .copy_from_slice(&encrypted_debt[..BINDING_PREFIX_LEN]);
    proof[AMOUNT_OFFSET..AMOUNT_OFFSET + 8].copy_from_slice(&amount.to_le_bytes());
    proof[PARAM_OFFSET..PARAM_OFFSET + 2].copy_from_slice(&risk_param_bps.to_le_bytes());
    let binding = compute_proof_binding(
        kind,
        encrypted_collateral,
        encrypted_debt,
        amount,
        risk_param_bps,
    );
    proof[HASH_OFFSET..HASH_OFFSET + HASH_LEN].copy_from_slice(&binding);
    proof
}

/// Verify a proof against the position's stored ciphertexts
///
/// # Arguments
/// * `kind` - Operation being authorized
/// * `proof` - Raw proof blob from the instruction
/// * `position` - Position whose current ciphertexts the proof must bind to
/// * `amount` - Requested amount, or collateral seized by a liquidation
/// * `expected_param_bps` - Pool LTV (borrow/withdraw) or liquidation threshold
///
/// # Returns
/// * `true` if every binding matches
pub fn verify_proof(
    kind: ProofKind,
    proof: &[u8],
    position: &Position,
    amount: u64,
    expected_param_bps: u16,
) -> bool {
    let Some(fields) = ProofFields::parse(proof) else {
        msg!("Proof too short: {} < {}", proof.len(), PROOF_LEN);
        return false;
    };

    if fields.collateral_binding[..] != position.encrypted_collateral[..BINDING_PREFIX_LEN] {
        msg!("Collateral binding mismatch");
        return false;
    }

    if fields.debt_binding[..] != position.encrypted_debt[..BINDING_PREFIX_LEN] {
        msg!("Debt binding mismatch");
        return false;
    }

    if fields.amount != amount {
        #[cfg(feature = "debug")]
        msg!("Amount mismatch: proof={} vs requested={}", fields.amount, amount);
        #[cfg(not(feature = "debug"))]
        msg!("Amount mismatch");
        return false;
    }

    if fields.risk_param_bps != expected_param_bps {
        msg!(
            "Risk parameter mismatch: proof={} vs pool={}",
            fields.risk_param_bps,
            expected_param_bps
        );
        return false;
    }

    // Zero hash = placeholder oracle running without an MPC signature
    #[cfg(feature = "devnet")]
    if fields.binding_hash == [0u8; HASH_LEN] {
        msg!("Demo mode: accepting structurally valid {:?} proof", kind);
        return true;
    }

    let expected_hash = compute_proof_binding(
        kind,
        &position.encrypted_collateral,
        &position.encrypted_debt,
        amount,
        expected_param_bps,
    );
    if fields.binding_hash != expected_hash {
        msg!("Proof hash mismatch");
        return false;
    }

    msg!("{:?} proof verified: param={}", kind, expected_param_bps);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_with(collateral_byte: u8, debt_byte: u8) -> Position {
        Position {
            encrypted_collateral: [collateral_byte; 32],
            encrypted_debt: [debt_byte; 32],
            is_active: true,
            ..Position::default()
        }
    }

    #[test]
    fn encoded_proof_verifies() {
        let position = position_with(0x11, 0x22);
        let proof = encode_proof(
            ProofKind::Borrow,
            &position.encrypted_collateral,
            &position.encrypted_debt,
            5_000,
            7500,
        );
        assert!(verify_proof(ProofKind::Borrow, &proof, &position, 5_000, 7500));
    }

    #[test]
    fn proof_fields_roundtrip_layout() {
        let proof = encode_proof(ProofKind::Withdraw, &[0xaa; 32], &[0xbb; 32], 42, 7500);
        let fields = ProofFields::parse(&proof).unwrap();
        assert_eq!(fields.collateral_binding, [0xaa; 16]);
        assert_eq!(fields.debt_binding, [0xbb; 16]);
        assert_eq!(fields.amount, 42);
        assert_eq!(fields.risk_param_bps, 7500);
        assert_eq!(&proof[58..], &[0u8; 6], "reserved bytes stay zero");
    }

    #[test]
    fn short_proof_rejected() {
        let position = position_with(0, 0);
        assert!(ProofFields::parse(&[0u8; PROOF_LEN - 1]).is_none());
        assert!(!verify_proof(ProofKind::Borrow, &[0u8; 10], &position, 1, 7500));
    }

    #[test]
    fn stale_ciphertext_rejected() {
        let position = position_with(0x11, 0x22);
        let proof = encode_proof(ProofKind::Borrow, &[0x33; 32], &position.encrypted_debt, 1, 7500);
        assert!(!verify_proof(ProofKind::Borrow, &proof, &position, 1, 7500));

        let proof = encode_proof(ProofKind::Borrow, &position.encrypted_collateral, &[0x33; 32], 1, 7500);
        assert!(!verify_proof(ProofKind::Borrow, &proof, &position, 1, 7500));
    }

    #[test]
    fn amount_and_param_must_match() {
        let position = position_with(0x11, 0x22);
        let proof = encode_proof(
            ProofKind::Borrow,
            &position.encrypted_collateral,
            &position.encrypted_debt,
            100,
            7500,
        );
        assert!(!verify_proof(ProofKind::Borrow, &proof, &position, 101, 7500));
        assert!(!verify_proof(ProofKind::Borrow, &proof, &position, 100, 8000));
    }

    #[test]
    fn proof_not_replayable_across_operations() {
        let position = position_with(0x11, 0x22);
        let proof = encode_proof(
            ProofKind::Borrow,
            &position.encrypted_collateral,
            &position.encrypted_debt,
            100,
            7500,
        );
        assert!(!verify_proof(ProofKind::Withdraw, &proof, &position, 100, 7500));
    }

    #[cfg(feature = "devnet")]
    #[test]
    fn zero_hash_accepted_in_demo_mode() {
        let position = position_with(0x11, 0x22);
        let mut proof = encode_proof(
            ProofKind::Liquidation,
            &position.encrypted_collateral,
            &position.encrypted_debt,
            0,
            8000,
        );
        proof[HASH_OFFSET..HASH_OFFSET + HASH_LEN].fill(0);
        assert!(verify_proof(ProofKind::Liquidation, &proof, &position, 0, 8000));
    }
}
