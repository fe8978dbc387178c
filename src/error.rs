use std::sync::Arc;
use thiserror::Error;

use crate::http::HttpMethod;
use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Shared with the gateway's `last_error` slot.
    #[error("Request failed: {0}")]
    Transport(#[source] Arc<TransportError>),

    #[error("{method} {url} returned unexpected status {status}: {message}")]
    UnexpectedStatus {
        method: HttpMethod,
        url: String,
        status: u16,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        GatewayError::Transport(Arc::new(err))
    }
}

impl GatewayError {
    /// True for failures raised before or during the network exchange.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }

    /// Status code of a rejected response, if this error is a validation failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
