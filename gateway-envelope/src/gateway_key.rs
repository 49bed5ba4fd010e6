//! Gateway static public key.
//!
//! Stored internally as the raw 32-byte X25519 point. The SPKI wrapping only
//! exists at the edges — for interop with peers that exchange the key in
//! that DER encoding (e.g. a PEM file) — and is never the form bound into
//! the X25519 operation itself.

use x25519_dalek::PublicKey as X25519PublicKey;

use crate::error::{EnvelopeError, Result};

/// Fixed X25519 SubjectPublicKeyInfo DER prefix (RFC 8410), followed by the
/// raw 32-byte key.
const SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x6e, 0x03, 0x21, 0x00,
];

#[derive(Clone, Copy)]
pub struct GatewayPublicKey(X25519PublicKey);

impl GatewayPublicKey {
    /// Build from exactly 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| EnvelopeError::InvalidGatewayPublicKey(bytes.len()))?;
        Ok(Self(X25519PublicKey::from(arr)))
    }

    /// Decode from base64 of the raw 32-byte key.
    pub fn from_base64(b64: &str) -> Result<Self> {
        let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, b64)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_raw(&self) -> &X25519PublicKey {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        *self.0.as_bytes()
    }

    /// Wrap into X25519 SPKI DER form.
    pub fn to_spki(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SPKI_PREFIX.len() + 32);
        out.extend_from_slice(&SPKI_PREFIX);
        out.extend_from_slice(self.0.as_bytes());
        out
    }

    /// Unwrap from X25519 SPKI DER form, verifying the fixed prefix.
    pub fn from_spki(der: &[u8]) -> Result<Self> {
        if der.len() != SPKI_PREFIX.len() + 32 || der[..SPKI_PREFIX.len()] != SPKI_PREFIX {
            return Err(EnvelopeError::InvalidGatewayPublicKey(der.len()));
        }
        Self::from_bytes(&der[SPKI_PREFIX.len()..])
    }
}
