//! String redaction utility for scrubbing secrets out of log lines before
//! they are emitted. Stateless apart from a random per-instance salt and an
//! internal placeholder table populated as [`Redactor::redact`] runs.

use std::collections::HashMap;
use std::sync::Mutex;

use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use regex::Regex;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// How repeated occurrences of the same matched substring are placeheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Identical matches within one instance produce identical placeholders.
    StablePerValue,
    /// Every match gets a fresh, uncorrelated placeholder.
    Unique,
}

pub struct Redactor {
    salt: [u8; 32],
    mode: Mode,
    email: Regex,
    api_key: Regex,
    table: Mutex<HashMap<String, String>>,
}

impl Redactor {
    pub fn new(mode: Mode) -> Self {
        let mut salt = [0u8; 32];
        OsRng.fill_bytes(&mut salt);
        Self {
            salt,
            mode,
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex"),
            api_key: Regex::new(r"sk-[A-Za-z0-9]{10,}").expect("valid regex"),
            table: Mutex::new(HashMap::new()),
        }
    }

    /// Scan `input` for email- and API-key-shaped substrings, replacing each
    /// with `[redacted:{kind}:{digest}]`.
    pub fn redact(&self, input: &str) -> String {
        let after_keys = self.replace_matches(input, &self.api_key, "key");
        self.replace_matches(&after_keys, &self.email, "email")
    }

    /// Reverse placeholders produced by this instance. Placeholders from a
    /// different instance, or arbitrary text, are left untouched.
    pub fn rehydrate(&self, input: &str) -> String {
        let table = self.table.lock().expect("redaction table poisoned");
        let mut output = input.to_string();
        for (placeholder, original) in table.iter() {
            output = output.replace(placeholder.as_str(), original);
        }
        output
    }

    fn replace_matches(&self, input: &str, pattern: &Regex, kind: &str) -> String {
        pattern
            .replace_all(input, |captures: &regex::Captures| {
                let matched = captures.get(0).expect("capture 0 always present").as_str();
                self.placeholder_for(matched, kind)
            })
            .into_owned()
    }

    fn placeholder_for(&self, matched: &str, kind: &str) -> String {
        let mut table = self.table.lock().expect("redaction table poisoned");

        if self.mode == Mode::StablePerValue {
            if let Some(existing) = table.iter().find(|(_, v)| v.as_str() == matched).map(|(k, _)| k.clone()) {
                return existing;
            }
        }

        let digest = self.digest(matched, table.len() as u64);
        let placeholder = format!("[redacted:{kind}:{digest}]");
        table.insert(placeholder.clone(), matched.to_string());
        placeholder
    }

    fn digest(&self, matched: &str, nonce: u64) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.salt).expect("HMAC accepts any key length");
        mac.update(matched.as_bytes());
        if self.mode == Mode::Unique {
            mac.update(&nonce.to_le_bytes());
        }
        let bytes = mac.finalize().into_bytes();
        hex_prefix(&bytes, 8)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(Mode::StablePerValue)
    }
}

fn hex_prefix(bytes: &[u8], len: usize) -> String {
    bytes.iter().take(len).map(|b| format!("{b:02x}")).collect()
}
