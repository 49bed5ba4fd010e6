//! Environment-variable-driven configuration for the CLI entry points.
//! The core library takes all configuration as explicit constructor
//! arguments; only the binaries read the environment.

use std::time::Duration;

use gateway_envelope::GatewayPublicKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

pub struct Config {
    pub gateway_url: String,
    pub gateway_public_key: GatewayPublicKey,
    pub model: String,
    pub infer_path: String,
    pub timeout: Duration,
    pub log_format: LogFormat,
    pub ticket_file: Option<String>,
}

impl Config {
    /// Load from the environment, per the variables documented at the crate
    /// root: `GATEWAY_URL`, `GATEWAY_PUBLIC_KEY_B64`, `MODEL`,
    /// `GATEWAY_INFER_PATH`, `GATEWAY_TIMEOUT_SECS`, `GATEWAY_LOG_FORMAT`,
    /// `GATEWAY_TICKET_FILE`.
    pub fn from_env() -> Result<Self, String> {
        let gateway_url = std::env::var("GATEWAY_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        let public_key_b64 = std::env::var("GATEWAY_PUBLIC_KEY_B64")
            .map_err(|_| "GATEWAY_PUBLIC_KEY_B64 is required".to_string())?;
        let gateway_public_key = GatewayPublicKey::from_base64(&public_key_b64)
            .map_err(|e| format!("invalid GATEWAY_PUBLIC_KEY_B64: {e}"))?;

        let model = std::env::var("MODEL").unwrap_or_else(|_| "default".to_string());
        let infer_path = std::env::var("GATEWAY_INFER_PATH").unwrap_or_else(|_| "/v1/infer".to_string());

        let timeout_secs: u64 = std::env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let log_format = match std::env::var("GATEWAY_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let ticket_file = std::env::var("GATEWAY_TICKET_FILE").ok();

        Ok(Self {
            gateway_url,
            gateway_public_key,
            model,
            infer_path,
            timeout: Duration::from_secs(timeout_secs),
            log_format,
            ticket_file,
        })
    }
}

/// Initialize `tracing_subscriber` per `log_format`, honoring `RUST_LOG` via
/// `EnvFilter`.
pub fn init_logging(log_format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gateway_client=info".into());

    match log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
        }
    }
}
