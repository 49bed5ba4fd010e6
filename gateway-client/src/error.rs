use thiserror::Error;

/// Stable, distinguishable failure kinds surfaced to a caller. Callers
/// match on variant, never on text.
#[derive(Debug, Error)]
pub enum GatewayClientError {
    #[error(transparent)]
    Envelope(#[from] gateway_envelope::EnvelopeError),

    #[error("protocol error: {0}")]
    ProtocolError(String),

    #[error("ticket exhausted: {0}")]
    TicketExhausted(String),

    #[error("gateway returned HTTP status {0}")]
    HttpError(u16),

    #[error("gateway error {code}: {message}")]
    GatewayError { code: String, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = core::result::Result<T, GatewayClientError>;
