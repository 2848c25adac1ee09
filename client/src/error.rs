//! Error types for the client codec

use thiserror::Error;

/// Errors returned by key derivation, account decoding and instruction assembly
///
/// Decryption failure is deliberately absent: `AmountCodec::decrypt` returns
/// `None` so callers can fall back to a hidden/locked display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("Key derivation failed: signature is {actual} bytes, need at least {expected}")]
    KeyDerivation { expected: usize, actual: usize },

    #[error("Malformed {account} account: {reason}")]
    MalformedAccount {
        account: &'static str,
        reason: String,
    },

    #[error("Invalid operand: {0}")]
    InvalidOperand(&'static str),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("Undercollateralized: debt {debt} would exceed borrow capacity {capacity}")]
    Undercollateralized { debt: u64, capacity: u64 },

    #[error("Position still holds collateral or debt")]
    PositionNotEmpty,

    #[error("Encryption key not derived for this session")]
    Locked,

    #[error("Position ciphertext could not be decrypted with the session key")]
    Undecryptable,

    #[error("Proof oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure reported by the external message signer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("User rejected the signature request")]
    Rejected,

    #[error("Signer does not support message signing")]
    Unsupported,

    #[error("{0}")]
    Other(String),
}

/// Failure reported by the proof oracle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle refused the request: {0}")]
    Refused(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
