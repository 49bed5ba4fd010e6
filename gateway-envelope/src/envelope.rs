//! Envelope wire format and the top-level seal/open operations.
//!
//! Step order on seal: generate an ephemeral X25519 keypair, agree a shared
//! secret with the gateway's static public key, derive direction-separated
//! AEAD keys bound to the size class, pad the plaintext to the class's fixed
//! length, then seal it with AAD `[version, class_id, direction]`.
//!
//! Step order on open is the mirror image, plus one extra check the seal
//! side cannot perform: the opener recomputes the shared secret from its own
//! static secret and the envelope's *echoed* ephemeral public key, which
//! binds the response to the exact request that produced it.

use base64::Engine;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::aead;
use crate::error::{EnvelopeError, Result};
use crate::gateway_key::GatewayPublicKey;
use crate::kdf;
use crate::padding;
use crate::size_class::SizeClass;

const WIRE_VERSION: u8 = 1;

/// Which direction a ciphertext was sealed for — drives both the AAD and
/// the HKDF `info` used to derive its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    fn tag(self) -> u8 {
        match self {
            Direction::Request => 1,
            Direction::Response => 2,
        }
    }
}

/// Envelope as carried on the wire. Field names are aliased to tolerate
/// peers that emit the legacy `kem_pub_b64` / `version` spellings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(alias = "version")]
    pub v: u8,
    #[serde(alias = "kem_pub_b64")]
    pub eph_pubkey_b64: String,
    pub token_class: SizeClass,
    pub nonce_b64: String,
    pub ciphertext_b64: String,
}

impl Envelope {
    pub fn eph_pubkey(&self) -> Result<X25519PublicKey> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(&self.eph_pubkey_b64)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| EnvelopeError::CryptoError("ephemeral public key must be 32 bytes"))?;
        Ok(X25519PublicKey::from(arr))
    }

    fn nonce(&self) -> Result<[u8; 12]> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(&self.nonce_b64)?;
        bytes
            .try_into()
            .map_err(|_| EnvelopeError::CryptoError("nonce must be 12 bytes"))
    }

    fn ciphertext(&self) -> Result<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.ciphertext_b64)?)
    }
}

fn aad_for(class: SizeClass, direction: Direction) -> [u8; 3] {
    [WIRE_VERSION, class.id(), direction.tag()]
}

/// Sealed request state retained by the caller between `seal` and the
/// matching `open` of the response. Holds the derived keys zeroized on drop.
pub struct SealState {
    pub class: SizeClass,
    pub ephemeral_pubkey: X25519PublicKey,
    pub k_req: Zeroizing<[u8; 32]>,
    pub k_resp: Zeroizing<[u8; 32]>,
}

/// Seal `plaintext` (already a size-class-appropriate payload, e.g. a JSON
/// request body) for `gateway_key`, returning the wire envelope plus the
/// state needed to open the eventual response.
pub fn seal(gateway_key: &GatewayPublicKey, class: SizeClass, plaintext: &[u8]) -> Result<(Envelope, SealState)> {
    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_pubkey = X25519PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(gateway_key.as_raw());

    let (k_req, k_resp) = kdf::derive_direction_keys(shared.as_bytes(), class.id())?;

    let frame = padding::pad(plaintext, class.request_padded_len())?;
    let nonce = aead::random_nonce()?;
    let aad = aad_for(class, Direction::Request);
    let ciphertext = aead::seal(&k_req, &nonce, &frame, &aad)?;

    let envelope = Envelope {
        v: WIRE_VERSION,
        eph_pubkey_b64: base64::engine::general_purpose::STANDARD.encode(ephemeral_pubkey.as_bytes()),
        token_class: class,
        nonce_b64: base64::engine::general_purpose::STANDARD.encode(nonce),
        ciphertext_b64: base64::engine::general_purpose::STANDARD.encode(&ciphertext),
    };

    Ok((
        envelope,
        SealState { class, ephemeral_pubkey, k_req, k_resp },
    ))
}

/// Open a response envelope against the state produced by the matching
/// [`seal`]. Rejects version mismatches, class mismatches, and an envelope
/// whose echoed ephemeral public key does not match the one we sent.
pub fn open(state: &SealState, envelope: &Envelope) -> Result<Vec<u8>> {
    if envelope.v != WIRE_VERSION {
        return Err(EnvelopeError::CryptoError("unsupported envelope version"));
    }
    if envelope.token_class != state.class {
        return Err(EnvelopeError::CryptoError("response size class does not match request"));
    }
    if envelope.eph_pubkey()?.as_bytes() != state.ephemeral_pubkey.as_bytes() {
        return Err(EnvelopeError::CryptoError("echoed ephemeral public key does not match request"));
    }

    let nonce = envelope.nonce()?;
    let ciphertext = envelope.ciphertext()?;
    let aad = aad_for(state.class, Direction::Response);
    let frame = aead::open(&state.k_resp, &nonce, &ciphertext, &aad)?;
    Ok(padding::unpad(&frame)?.to_vec())
}

/// Gateway-side counterpart: decrypt an incoming request envelope given the
/// gateway's static secret, returning the plaintext plus the state needed to
/// seal the matching response (echoing the same ephemeral public key).
pub fn open_request(gateway_secret: &StaticSecret, envelope: &Envelope) -> Result<(Vec<u8>, SealState)> {
    if envelope.v != WIRE_VERSION {
        return Err(EnvelopeError::CryptoError("unsupported envelope version"));
    }

    let ephemeral_pubkey = envelope.eph_pubkey()?;
    let shared = gateway_secret.diffie_hellman(&ephemeral_pubkey);
    let (k_req, k_resp) = kdf::derive_direction_keys(shared.as_bytes(), envelope.token_class.id())?;

    let nonce = envelope.nonce()?;
    let ciphertext = envelope.ciphertext()?;
    let aad = aad_for(envelope.token_class, Direction::Request);
    let frame = aead::open(&k_req, &nonce, &ciphertext, &aad)?;
    let plaintext = padding::unpad(&frame)?.to_vec();

    Ok((
        plaintext,
        SealState { class: envelope.token_class, ephemeral_pubkey, k_req, k_resp },
    ))
}

/// Gateway-side counterpart to [`open`]: seal a response plaintext, echoing
/// the ephemeral public key the request arrived with.
pub fn seal_response(state: &SealState, plaintext: &[u8]) -> Result<Envelope> {
    let frame = padding::pad(plaintext, state.class.response_padded_len())?;
    let nonce = aead::random_nonce()?;
    let aad = aad_for(state.class, Direction::Response);
    let ciphertext = aead::seal(&state.k_resp, &nonce, &frame, &aad)?;

    Ok(Envelope {
        v: WIRE_VERSION,
        eph_pubkey_b64: base64::engine::general_purpose::STANDARD.encode(state.ephemeral_pubkey.as_bytes()),
        token_class: state.class,
        nonce_b64: base64::engine::general_purpose::STANDARD.encode(nonce),
        ciphertext_b64: base64::engine::general_purpose::STANDARD.encode(&ciphertext),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_pair() -> (StaticSecret, GatewayPublicKey) {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = GatewayPublicKey::from_bytes(X25519PublicKey::from(&secret).as_bytes()).unwrap();
        (secret, public)
    }

    #[test]
    fn full_roundtrip() {
        let (gw_secret, gw_public) = gateway_pair();
        let (req_envelope, client_state) = seal(&gw_public, SizeClass::C512, b"{\"prompt\":\"hi\"}").unwrap();

        let (req_plain, gw_state) = open_request(&gw_secret, &req_envelope).unwrap();
        assert_eq!(req_plain, b"{\"prompt\":\"hi\"}");

        let resp_envelope = seal_response(&gw_state, b"{\"text\":\"hello\"}").unwrap();
        let resp_plain = open(&client_state, &resp_envelope).unwrap();
        assert_eq!(resp_plain, b"{\"text\":\"hello\"}");
    }

    #[test]
    fn rejects_mismatched_ephemeral_key_on_open() {
        let (_, gw_public) = gateway_pair();
        let (_, client_state) = seal(&gw_public, SizeClass::C256, b"payload").unwrap();

        let (_, other_client_state) = seal(&gw_public, SizeClass::C256, b"other").unwrap();
        let forged = Envelope {
            v: WIRE_VERSION,
            eph_pubkey_b64: base64::engine::general_purpose::STANDARD
                .encode(other_client_state.ephemeral_pubkey.as_bytes()),
            token_class: SizeClass::C256,
            nonce_b64: base64::engine::general_purpose::STANDARD.encode([0u8; 12]),
            ciphertext_b64: base64::engine::general_purpose::STANDARD.encode(vec![0u8; 32]),
        };

        assert!(open(&client_state, &forged).is_err());
    }

    #[test]
    fn rejects_class_mismatch_on_open() {
        let (gw_secret, gw_public) = gateway_pair();
        let (req_envelope, client_state) = seal(&gw_public, SizeClass::C256, b"payload").unwrap();
        let (_, gw_state) = open_request(&gw_secret, &req_envelope).unwrap();
        let mut resp_envelope = seal_response(&gw_state, b"reply").unwrap();
        resp_envelope.token_class = SizeClass::C512;
        assert!(open(&client_state, &resp_envelope).is_err());
    }

    #[test]
    fn rejects_unsupported_version() {
        let (gw_secret, gw_public) = gateway_pair();
        let (mut req_envelope, _) = seal(&gw_public, SizeClass::C256, b"payload").unwrap();
        req_envelope.v = 2;
        assert!(open_request(&gw_secret, &req_envelope).is_err());
    }

    #[test]
    fn legacy_field_aliases_deserialize() {
        let json = r#"{
            "version": 1,
            "kem_pub_b64": "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "token_class": "c256",
            "nonce_b64": "AAAAAAAAAAAAAAAA",
            "ciphertext_b64": "AA=="
        }"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.v, 1);
        assert_eq!(envelope.token_class, SizeClass::C256);
    }

    #[test]
    fn different_seals_use_different_nonces() {
        let (_, gw_public) = gateway_pair();
        let (a, _) = seal(&gw_public, SizeClass::C256, b"x").unwrap();
        let (b, _) = seal(&gw_public, SizeClass::C256, b"x").unwrap();
        assert_ne!(a.nonce_b64, b.nonce_b64);
        assert_ne!(a.eph_pubkey_b64, b.eph_pubkey_b64);
    }
}
