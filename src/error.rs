//! Error types for codec and key-derivation failures
//!
//! Every failure in this crate is recoverable and reported to the immediate
//! caller; nothing here panics or unwinds across module boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeywireError {
    #[error("destination too small: {0}")]
    Capacity(String),

    #[error("invalid format: {0}")]
    Format(String),

    #[error("checksum mismatch: {0}")]
    Integrity(String),

    #[error("value out of range: {0}")]
    Range(String),

    #[error("length mismatch: {0}")]
    ProtocolMismatch(String),

    #[error("secp256k1 error: {0}")]
    Secp(#[from] secp256k1::Error),
}

pub type Result<T> = std::result::Result<T, KeywireError>;
