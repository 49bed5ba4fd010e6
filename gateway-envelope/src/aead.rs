//! AEAD: ChaCha20-Poly1305 with a fresh 12-byte nonce per message.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use getrandom::getrandom;

use crate::error::{EnvelopeError, Result};

/// Draw a fresh random 12-byte nonce. AEAD keys here are single-use
/// (freshly derived per seal), so a per-session counter is unnecessary.
pub fn random_nonce() -> Result<[u8; 12]> {
    let mut nonce = [0u8; 12];
    getrandom(&mut nonce).map_err(|_| EnvelopeError::CryptoError("failed to draw random nonce"))?;
    Ok(nonce)
}

/// Seal `plaintext` under `key`, binding `aad`. Returns ciphertext || tag.
pub fn seal(key: &[u8; 32], nonce: &[u8; 12], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|_| EnvelopeError::CryptoError("invalid AEAD key length"))?;
    let n = Nonce::from_slice(nonce);
    cipher
        .encrypt(n, Payload { msg: plaintext, aad })
        .map_err(|_| EnvelopeError::CryptoError("AEAD seal failed"))
}

/// Open a ciphertext produced by [`seal`]. Uniform error on any failure —
/// wrong key, wrong AAD, or a tampered ciphertext all look the same from the
/// outside.
pub fn open(key: &[u8; 32], nonce: &[u8; 12], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|_| EnvelopeError::CryptoError("invalid AEAD key length"))?;
    let n = Nonce::from_slice(nonce);
    cipher
        .decrypt(n, Payload { msg: ciphertext, aad })
        .map_err(|_| EnvelopeError::CryptoError("AEAD open failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let key = [1u8; 32];
        let nonce = random_nonce().unwrap();
        let ct = seal(&key, &nonce, b"secret", b"aad").unwrap();
        let pt = open(&key, &nonce, &ct, b"aad").unwrap();
        assert_eq!(pt, b"secret");
    }

    #[test]
    fn wrong_aad_fails() {
        let key = [1u8; 32];
        let nonce = random_nonce().unwrap();
        let ct = seal(&key, &nonce, b"secret", b"good").unwrap();
        assert!(open(&key, &nonce, &ct, b"bad").is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = [1u8; 32];
        let nonce = random_nonce().unwrap();
        let mut ct = seal(&key, &nonce, b"secret", b"aad").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xff;
        assert!(open(&key, &nonce, &ct, b"aad").is_err());
    }

    #[test]
    fn nonces_are_not_constant() {
        let a = random_nonce().unwrap();
        let b = random_nonce().unwrap();
        assert_ne!(a, b);
    }
}
