//! Key schedule: HKDF-SHA-256 deriving direction-separated symmetric keys.
//!
//! ```text
//! salt = 32 zero bytes
//! IKM  = X25519 shared secret
//! info = b"zk-llm-gateway-envelope-v1" || b"/req" | b"/resp" || size_class_id
//! ```
//!
//! Direction separation matters because the same ephemeral key is reused for
//! both the request and the response: without domain-separated `info`, a
//! party could replay a ciphertext from one direction as if it were the
//! other. Binding the size-class id into `info` additionally prevents key
//! confusion if a shared secret were ever (incorrectly) reused across
//! classes.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{EnvelopeError, Result};

const PROTOCOL_INFO: &[u8] = b"zk-llm-gateway-envelope-v1";
const ZERO_SALT: [u8; 32] = [0u8; 32];

fn info_bytes(direction: &[u8], class_id: u8) -> Vec<u8> {
    let mut info = Vec::with_capacity(PROTOCOL_INFO.len() + direction.len() + 1);
    info.extend_from_slice(PROTOCOL_INFO);
    info.extend_from_slice(direction);
    info.push(class_id);
    info
}

fn expand(shared_secret: &[u8], direction: &[u8], class_id: u8) -> Result<Zeroizing<[u8; 32]>> {
    let info = info_bytes(direction, class_id);
    let hk = Hkdf::<Sha256>::new(Some(&ZERO_SALT), shared_secret);
    let mut out = Zeroizing::new([0u8; 32]);
    hk.expand(&info, out.as_mut())
        .map_err(|_| EnvelopeError::CryptoError("HKDF expand failed"))?;
    Ok(out)
}

/// Derive `(K_req, K_resp)` from a 32-byte X25519 shared secret and the
/// size-class id.
pub fn derive_direction_keys(shared_secret: &[u8], class_id: u8) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    if shared_secret.len() != 32 {
        return Err(EnvelopeError::CryptoError("shared secret must be 32 bytes"));
    }
    let k_req = expand(shared_secret, b"/req", class_id)?;
    let k_resp = expand(shared_secret, b"/resp", class_id)?;
    Ok((k_req, k_resp))
}
