//! Size-class table.
//!
//! A closed enumeration of coarse buckets, each selecting the padded length
//! used on the wire in both directions plus a hint for how much output the
//! gateway should budget. The table is the single source of truth peer
//! implementations must agree on byte-for-byte.

use crate::error::{EnvelopeError, Result};

/// Coarse bucket selecting padded plaintext length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    C256,
    C512,
    C1024,
    C2048,
    C4096,
}

struct ClassRow {
    class: SizeClass,
    name: &'static str,
    id: u8,
    req_padded: usize,
    resp_padded: usize,
    max_out_hint: u32,
}

const TABLE: &[ClassRow] = &[
    ClassRow { class: SizeClass::C256, name: "c256", id: 1, req_padded: 8_192, resp_padded: 8_192, max_out_hint: 256 },
    ClassRow { class: SizeClass::C512, name: "c512", id: 2, req_padded: 12_288, resp_padded: 16_384, max_out_hint: 512 },
    ClassRow { class: SizeClass::C1024, name: "c1024", id: 3, req_padded: 20_480, resp_padded: 32_768, max_out_hint: 1_024 },
    ClassRow { class: SizeClass::C2048, name: "c2048", id: 4, req_padded: 36_864, resp_padded: 65_536, max_out_hint: 2_048 },
    ClassRow { class: SizeClass::C4096, name: "c4096", id: 5, req_padded: 69_632, resp_padded: 131_072, max_out_hint: 4_096 },
];

fn row(class: SizeClass) -> &'static ClassRow {
    TABLE.iter().find(|r| r.class == class).expect("SizeClass table is exhaustive")
}

impl SizeClass {
    /// Parse either the symbolic name (`"c512"`, case-insensitive) or the
    /// bare numeric suffix (`"512"`), trimming surrounding whitespace.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let lower = trimmed.to_ascii_lowercase();
        let bare = lower.strip_prefix('c').unwrap_or(&lower);

        TABLE
            .iter()
            .find(|r| r.name == lower || r.name.trim_start_matches('c') == bare)
            .map(|r| r.class)
            .ok_or_else(|| EnvelopeError::InvalidTokenClass(text.to_string()))
    }

    pub fn symbolic_name(self) -> &'static str {
        row(self).name
    }

    pub fn id(self) -> u8 {
        row(self).id
    }

    pub fn request_padded_len(self) -> usize {
        row(self).req_padded
    }

    pub fn response_padded_len(self) -> usize {
        row(self).resp_padded
    }

    pub fn max_output_tokens_hint(self) -> u32 {
        row(self).max_out_hint
    }

    /// Largest plaintext payload this class can carry, after the 8-byte
    /// padding-frame header is subtracted from the request padded length.
    pub fn max_prompt_bytes(self) -> usize {
        self.request_padded_len() - 8
    }

    pub fn all() -> impl Iterator<Item = SizeClass> {
        TABLE.iter().map(|r| r.class)
    }
}

impl serde::Serialize for SizeClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbolic_name())
    }
}

impl<'de> serde::Deserialize<'de> for SizeClass {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SizeClass::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_symbolic_and_numeric_forms() {
        for text in ["C2048", "c2048", "2048", "  c2048  "] {
            assert_eq!(SizeClass::parse(text).unwrap(), SizeClass::C2048);
        }
    }

    #[test]
    fn parse_rejects_unknown_class() {
        assert!(SizeClass::parse("c8192").is_err());
    }

    #[test]
    fn table_matches_spec() {
        assert_eq!(SizeClass::C256.id(), 1);
        assert_eq!(SizeClass::C256.request_padded_len(), 8_192);
        assert_eq!(SizeClass::C256.response_padded_len(), 8_192);
        assert_eq!(SizeClass::C256.max_output_tokens_hint(), 256);

        assert_eq!(SizeClass::C4096.id(), 5);
        assert_eq!(SizeClass::C4096.request_padded_len(), 69_632);
        assert_eq!(SizeClass::C4096.response_padded_len(), 131_072);
    }

    #[test]
    fn ids_are_dense_1_to_5() {
        let mut ids: Vec<u8> = SizeClass::all().map(|c| c.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
