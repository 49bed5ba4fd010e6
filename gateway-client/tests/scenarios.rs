use gateway_client::{Mode, Redactor};
use gateway_envelope::{seal, GatewayPublicKey, SizeClass};
use rand_core::OsRng;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

fn gateway_key() -> GatewayPublicKey {
    let secret = StaticSecret::random_from_rng(OsRng);
    GatewayPublicKey::from_bytes(X25519PublicKey::from(&secret).as_bytes()).unwrap()
}

#[test]
fn seal_at_c1024_matches_literal_scenario_1() {
    let gw_public = gateway_key();
    let (envelope, _state) = seal(&gw_public, SizeClass::C1024, br#"{"hello":"world","n":123}"#).unwrap();

    assert_eq!(envelope.v, 1);
    assert_eq!(envelope.token_class, SizeClass::C1024);
    assert!(!envelope.eph_pubkey_b64.is_empty());
    assert!(!envelope.nonce_b64.is_empty());

    use base64::Engine;
    let ciphertext = base64::engine::general_purpose::STANDARD.decode(&envelope.ciphertext_b64).unwrap();
    assert_eq!(ciphertext.len(), SizeClass::C1024.request_padded_len() + 16);
}

#[test]
fn size_class_parsing_matches_literal_scenario_4() {
    for text in ["C2048", "c2048", "2048"] {
        assert_eq!(SizeClass::parse(text).unwrap(), SizeClass::C2048);
    }
    assert!(SizeClass::parse("c8192").is_err());
}

#[test]
fn redaction_matches_literal_scenario_5() {
    let redactor = Redactor::new(Mode::StablePerValue);
    let input = "Email me at alice@example.com and use sk-abcdef0123456789 for auth.";
    let redacted = redactor.redact(input);

    assert!(!redacted.contains("alice@example.com"));
    assert!(!redacted.contains("sk-abcdef0123456789"));
    assert_eq!(redactor.rehydrate(&redacted), input);
}
