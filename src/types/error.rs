use super::constants::error_codes;
use thiserror::Error;

/// Errors returned by bridge operations.
///
/// Every variant maps onto one reply code through [`BridgeError::code`], so a
/// failed request always reaches the host as a typed error instead of a fault.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Request payload was missing, malformed, or referenced an unknown binding
    #[error("{0}")]
    InvalidArguments(String),

    /// Configuration rejected or SDK construction failed
    #[error("{0}")]
    Init(String),

    /// Trigger denied by channel policy or refused by the SDK
    #[error("{0}")]
    Trigger(String),

    /// Channel is not currently subscribed
    #[error("{0}")]
    NotFound(String),

    /// Unknown method name
    #[error("Method '{0}' is not implemented")]
    NotImplemented(String),

    /// Operation issued before a successful `init`
    #[error("Client is not initialized")]
    NotInitialized,

    /// JSON decoding error for request payloads
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Reply code surfaced to the host
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) | Self::Serialization(_) => error_codes::INVALID_ARGUMENTS,
            Self::Init(_) => error_codes::INIT_ERROR,
            Self::Trigger(_) => error_codes::TRIGGER_ERROR,
            Self::NotFound(_) => error_codes::NOT_FOUND,
            Self::NotImplemented(_) => error_codes::NOT_IMPLEMENTED,
            Self::NotInitialized => error_codes::NOT_INITIALIZED,
        }
    }
}

/// Convenience type alias for `Result<T, BridgeError>`.
pub type Result<T> = std::result::Result<T, BridgeError>;
