//! Async client, HTTP transport, chat convenience, and redaction utility
//! that consume the `gateway-envelope` protocol core.

pub mod chat;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod redact;
pub mod ticket_sources;
pub mod transport;

pub use config::{init_logging, Config, LogFormat};
pub use error::{GatewayClientError, Result};
pub use orchestrator::GatewayClient;
pub use redact::{Mode as RedactMode, Redactor};
pub use ticket_sources::{DummyTicketSource, FileTicketPool};
pub use transport::HttpTransport;
