//! Core error taxonomy for the envelope protocol.
//!
//! Every variant here is stable and distinguishable — callers match on kind,
//! never on the `Display` text. The consuming `gateway-client` crate wraps
//! these into its own top-level error alongside transport- and ticket-level
//! failures.

use thiserror::Error;

/// Errors surfaced by the size-class table, padding codec, envelope
/// cryptography, and gateway-key handling.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid token class: {0:?}")]
    InvalidTokenClass(String),

    #[error("invalid gateway public key: expected 32 bytes, found {0}")]
    InvalidGatewayPublicKey(usize),

    #[error("base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("invalid padding")]
    InvalidPadding,

    #[error("payload too large: {actual} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { actual: usize, limit: usize },

    #[error("crypto error: {0}")]
    CryptoError(&'static str),
}

pub type Result<T> = core::result::Result<T, EnvelopeError>;
