//! Ticket data model and the pluggable ticket-source contract.
//!
//! A ticket is an opaque, single-use authorization record the orchestrator
//! attaches to every request. The *contract* — one async operation handing
//! out at most one ticket per call — is core; concrete providers (a dev-only
//! random generator, a JSON-file-backed pool) live in the consuming
//! `gateway-client` crate since they are I/O, not cryptography.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::size_class::SizeClass;

/// Opaque authorization record presented with a request. Single-use: a
/// [`TicketSource`] must never hand out the same ticket twice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub nullifier: String,
    pub commitment_root: String,
    pub token_class: SizeClass,
    pub proof: String,
}

/// A raw, possibly-partial ticket entry as read from an external source
/// (e.g. a JSON ticket-pool file), before field-alias normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTicketEntry {
    #[serde(alias = "nullifier_b64")]
    pub nullifier: Option<String>,
    #[serde(alias = "commitment_root_b64")]
    pub commitment_root: Option<String>,
    pub token_class: Option<String>,
    #[serde(alias = "proof_b64")]
    pub proof: Option<String>,
}

/// 32 zero bytes, base64-encoded — the default `commitment_root` when a raw
/// entry omits one.
fn zero_commitment_root() -> String {
    base64::engine::general_purpose::STANDARD.encode([0u8; 32])
}

/// Normalize a raw ticket entry into a [`Ticket`], stamping `requested_class`
/// onto entries that declare no class of their own (wildcard entries).
///
/// Returns `Err(reason)` when the entry is unusable — missing nullifier, or
/// a declared class that does not match `requested_class` after parsing.
pub fn normalize_entry(raw: RawTicketEntry, requested_class: SizeClass) -> Result<Ticket, String> {
    let nullifier = raw.nullifier.ok_or_else(|| "ticket entry missing nullifier".to_string())?;

    let token_class = match raw.token_class {
        Some(text) => {
            let parsed = SizeClass::parse(&text).map_err(|e| e.to_string())?;
            if parsed != requested_class {
                return Err(format!(
                    "ticket declares class {:?}, requested {:?}",
                    parsed.symbolic_name(),
                    requested_class.symbolic_name()
                ));
            }
            parsed
        }
        None => requested_class,
    };

    Ok(Ticket {
        nullifier,
        commitment_root: raw.commitment_root.unwrap_or_else(zero_commitment_root),
        token_class,
        proof: raw.proof.unwrap_or_default(),
    })
}

/// Pluggable provider of single-use authorization tickets.
///
/// Implementors must ensure each call to `next_ticket` returns a ticket that
/// has never been returned before, for the lifetime of the source.
#[async_trait]
pub trait TicketSource: Send + Sync {
    async fn next_ticket(&self, class: SizeClass) -> Result<Ticket, String>;
}
