//! Padding codec.
//!
//! Frames a plaintext blob into an exact target length so that on-wire
//! ciphertext sizes collapse onto one of the five size-class buckets instead
//! of leaking the true payload length. The frame only ever exists inside the
//! ciphertext — it is never carried on the wire by itself.
//!
//! Layout: `b"ZKLG" || len[u32 LE] || payload || filler`, where filler
//! repeats the two-byte pattern `b" \n"` out to the target length.

use crate::error::{EnvelopeError, Result};

const TAG: &[u8; 4] = b"ZKLG";
const HEADER_LEN: usize = 8; // tag[4] + len[4]
const FILLER_PATTERN: &[u8; 2] = b" \n";

/// Pad `payload` into a frame of exactly `target` bytes.
pub fn pad(payload: &[u8], target: usize) -> Result<Vec<u8>> {
    if target < HEADER_LEN {
        return Err(EnvelopeError::InvalidPadding);
    }

    let limit = target - HEADER_LEN;
    if payload.len() > limit {
        return Err(EnvelopeError::PayloadTooLarge { actual: payload.len(), limit });
    }

    let mut out = Vec::with_capacity(target);
    out.extend_from_slice(TAG);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);

    let filler_len = target - out.len();
    out.extend(FILLER_PATTERN.iter().cycle().take(filler_len));

    Ok(out)
}

/// Reverse a padding frame, returning the original payload slice.
pub fn unpad(frame: &[u8]) -> Result<&[u8]> {
    if frame.len() < HEADER_LEN || &frame[..4] != TAG {
        return Err(EnvelopeError::InvalidPadding);
    }

    let len = u32::from_le_bytes(frame[4..8].try_into().expect("slice is 4 bytes")) as usize;
    let limit = frame.len() - HEADER_LEN;
    if len > limit {
        return Err(EnvelopeError::InvalidPadding);
    }

    Ok(&frame[HEADER_LEN..HEADER_LEN + len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size_class::SizeClass;

    #[test]
    fn roundtrip_basic() {
        let payload = b"hello gateway";
        let frame = pad(payload, 64).unwrap();
        assert_eq!(frame.len(), 64);
        assert_eq!(unpad(&frame).unwrap(), payload);
    }

    #[test]
    fn roundtrip_empty_payload() {
        let frame = pad(b"", 16).unwrap();
        assert_eq!(frame.len(), 16);
        assert_eq!(unpad(&frame).unwrap(), b"");
    }

    #[test]
    fn rejects_target_below_header() {
        assert!(matches!(pad(b"", 7), Err(EnvelopeError::InvalidPadding)));
    }

    #[test]
    fn rejects_oversized_payload() {
        let err = pad(&vec![0u8; 10], 16).unwrap_err();
        match err {
            EnvelopeError::PayloadTooLarge { actual, limit } => {
                assert_eq!(actual, 10);
                assert_eq!(limit, 8);
            }
            _ => panic!("expected PayloadTooLarge"),
        }
    }

    #[test]
    fn unpad_rejects_wrong_tag() {
        let mut frame = pad(b"x", 16).unwrap();
        frame[0] = b'Q';
        assert!(unpad(&frame).is_err());
    }

    #[test]
    fn unpad_rejects_truncated_frame() {
        assert!(unpad(b"short").is_err());
        assert!(unpad(b"").is_err());
    }

    #[test]
    fn unpad_rejects_length_exceeding_buffer() {
        let mut frame = pad(b"abc", 16).unwrap();
        frame[4..8].copy_from_slice(&(100u32).to_le_bytes());
        assert!(unpad(&frame).is_err());
    }

    #[test]
    fn every_size_class_round_trips_at_its_own_length() {
        for class in SizeClass::all() {
            let target = class.request_padded_len();
            let payload = vec![0xABu8; class.max_prompt_bytes()];
            let frame = pad(&payload, target).unwrap();
            assert_eq!(frame.len(), target);
            assert_eq!(unpad(&frame).unwrap(), payload.as_slice());
        }
    }

    proptest::proptest! {
        #[test]
        fn roundtrip_law(len in 0usize..2048, target_extra in 0usize..4096) {
            let target = len + 8 + target_extra;
            let payload = vec![0x42u8; len];
            let frame = pad(&payload, target).unwrap();
            proptest::prop_assert_eq!(frame.len(), target);
            proptest::prop_assert_eq!(unpad(&frame).unwrap(), payload.as_slice());
        }

        #[test]
        fn refusal_law(len in 1usize..4096, shortfall in 1usize..100) {
            let target = len + 8 - shortfall.min(len + 7);
            let payload = vec![0x11u8; len];
            if target < 8 {
                proptest::prop_assert!(pad(&payload, target).is_err());
            } else {
                let limit = target - 8;
                if len > limit {
                    let err = pad(&payload, target).unwrap_err();
                    match err {
                        EnvelopeError::PayloadTooLarge { actual, limit: got_limit } => {
                            proptest::prop_assert_eq!(actual, len);
                            proptest::prop_assert_eq!(got_limit, limit);
                        }
                        _ => proptest::prop_assert!(false, "expected PayloadTooLarge"),
                    }
                }
            }
        }
    }
}
