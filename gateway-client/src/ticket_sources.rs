//! Concrete [`TicketSource`] implementations.
//!
//! These are pluggable backends, not part of the envelope core: a dev-only
//! random generator and a JSON-file-backed pool, matching the storage-backend
//! split the core crate leaves for its consumers.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use gateway_envelope::{normalize_entry, RawTicketEntry, SizeClass, Ticket, TicketSource};
use rand_core::{OsRng, RngCore};
use tokio::sync::Mutex;

/// Returns a fresh random ticket for whatever class is requested. Useful for
/// local development against a gateway that does not enforce tickets.
pub struct DummyTicketSource;

#[async_trait]
impl TicketSource for DummyTicketSource {
    async fn next_ticket(&self, class: SizeClass) -> Result<Ticket, String> {
        let mut nullifier = [0u8; 32];
        OsRng.fill_bytes(&mut nullifier);
        Ok(Ticket {
            nullifier: base64::engine::general_purpose::STANDARD.encode(nullifier),
            commitment_root: base64::engine::general_purpose::STANDARD.encode([0u8; 32]),
            token_class: class,
            proof: String::new(),
        })
    }
}

/// Ticket pool loaded eagerly from a JSON array on disk. Entries are
/// consumed single-use: a successful `next_ticket` removes the entry from
/// the in-memory pool. Consumption is never written back to the file.
pub struct FileTicketPool {
    entries: Mutex<Vec<RawTicketEntry>>,
}

impl FileTicketPool {
    /// Load the pool from `path`. Non-object array entries are dropped
    /// during load; the rest become [`RawTicketEntry`] records (still
    /// possibly missing fields, resolved later at selection time).
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let entries = values
            .into_iter()
            .filter(|v| v.is_object())
            .filter_map(|v| serde_json::from_value::<RawTicketEntry>(v).ok())
            .collect();

        Ok(Self { entries: Mutex::new(entries) })
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl TicketSource for FileTicketPool {
    async fn next_ticket(&self, class: SizeClass) -> Result<Ticket, String> {
        let mut entries = self.entries.lock().await;

        let matching = entries.iter().position(|e| {
            e.token_class
                .as_deref()
                .and_then(|text| SizeClass::parse(text).ok())
                .map(|parsed| parsed == class)
                .unwrap_or(false)
        });

        let index = matching.or_else(|| entries.iter().position(|e| e.token_class.is_none()));

        let Some(index) = index else {
            return Err("no remaining ticket for the requested class".to_string());
        };

        let raw = entries.remove(index);
        normalize_entry(raw, class)
    }
}
