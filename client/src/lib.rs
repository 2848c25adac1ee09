//! Client-side codec for ShadowLend confidential positions
//!
//! - `keys`: encryption keypair derived from a wallet signature
//! - `codec`: 32-byte balance ciphertexts with the all-zero sentinel
//! - `accounts`: Pool/Position account bytes
//! - `oracle`: proof oracle boundary
//! - `instructions`: instruction data and account lists
//! - `session`: caller-side validation over a single derived key
//!
//! Layouts, discriminators, seeds and solvency math are shared with the
//! `shadow_lend` program crate.

pub mod accounts;
pub mod codec;
pub mod config;
pub mod error;
pub mod instructions;
pub mod keys;
pub mod logging;
pub mod oracle;
pub mod pda;
pub mod position;
pub mod session;
pub mod units;

pub use accounts::{decode_pool, decode_position, encode_pool, encode_position, ProtocolStats};
pub use codec::{AmountCodec, EncryptedValue};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, OracleError, SigningError};
pub use instructions::{InstructionBuilder, PoolParams};
pub use keys::{EncryptionKeyPair, FnSigner, KeyDeriver, MessageSigner};
pub use oracle::{LocalProofOracle, ProofOracle, ProofRequest};
pub use position::DecodedPosition;
pub use session::LendingSession;

pub use shadow_lend::health::{health_factor, max_borrowable, HealthFactor, HealthStatus};
pub use shadow_lend::proof::ProofKind;
pub use shadow_lend::state::{Pool, Position};
