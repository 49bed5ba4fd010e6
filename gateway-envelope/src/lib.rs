//! Hybrid X25519 + HKDF-SHA256 + ChaCha20-Poly1305 envelope protocol for the
//! zk-llm-gateway wire format: size classes, fixed-length padding, the
//! envelope seal/open operations, and the ticket contract that authorizes a
//! request.

pub mod aead;
pub mod envelope;
pub mod error;
pub mod gateway_key;
pub mod kdf;
pub mod padding;
pub mod size_class;
pub mod ticket;

pub use envelope::{open, open_request, seal, seal_response, Direction, Envelope, SealState};
pub use error::{EnvelopeError, Result};
pub use gateway_key::GatewayPublicKey;
pub use size_class::SizeClass;
pub use ticket::{normalize_entry, RawTicketEntry, Ticket, TicketSource};
