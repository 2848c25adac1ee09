//! Boundary to the confidential-compute proof oracle
//!
//! The oracle sees only ciphertexts and public parameters and answers with an
//! opaque proof blob that the program checks against the stored position.

use std::future::Future;

use shadow_lend::proof::{encode_proof, ProofKind};
use shadow_lend::state::Position;

use crate::codec::EncryptedValue;
use crate::error::OracleError;

/// Operation parameters sent to the oracle
///
/// `ciphertext_a`/`ciphertext_b` are the position's current collateral and
/// debt ciphertexts, i.e. the values stored on chain before the update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofRequest {
    pub kind: ProofKind,
    pub ciphertext_a: EncryptedValue,
    pub ciphertext_b: EncryptedValue,
    pub amount: u64,
    pub risk_param_bps: u16,
}

impl ProofRequest {
    pub fn for_position(
        kind: ProofKind,
        position: &Position,
        amount: u64,
        risk_param_bps: u16,
    ) -> Self {
        Self {
            kind,
            ciphertext_a: EncryptedValue(position.encrypted_collateral),
            ciphertext_b: EncryptedValue(position.encrypted_debt),
            amount,
            risk_param_bps,
        }
    }
}

/// Produces solvency proofs
pub trait ProofOracle {
    fn prove(
        &self,
        request: &ProofRequest,
    ) -> impl Future<Output = Result<Vec<u8>, OracleError>> + Send;
}

/// In-process stand-in for the MPC network
///
/// Packs the 64-byte proof layout without evaluating the predicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalProofOracle;

impl ProofOracle for LocalProofOracle {
    fn prove(
        &self,
        request: &ProofRequest,
    ) -> impl Future<Output = Result<Vec<u8>, OracleError>> + Send {
        let proof = encode_proof(
            request.kind,
            request.ciphertext_a.as_bytes(),
            request.ciphertext_b.as_bytes(),
            request.amount,
            request.risk_param_bps,
        );
        tracing::debug!(kind = ?request.kind, "local oracle produced proof");
        async move { Ok(proof.to_vec()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadow_lend::proof::{verify_proof, PROOF_LEN};

    #[tokio::test]
    async fn local_proof_verifies_against_position() {
        let position = Position {
            encrypted_collateral: [0x31; 32],
            encrypted_debt: [0x42; 32],
            is_active: true,
            ..Position::default()
        };
        let request = ProofRequest::for_position(ProofKind::Borrow, &position, 1_000, 7500);
        let proof = LocalProofOracle.prove(&request).await.unwrap();

        assert_eq!(proof.len(), PROOF_LEN);
        assert!(verify_proof(ProofKind::Borrow, &proof, &position, 1_000, 7500));
        assert!(!verify_proof(ProofKind::Withdraw, &proof, &position, 1_000, 7500));
    }
}
