use thiserror::Error;

/// Why a fetch produced no data. Never leaves the listing service.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
    #[error("Payload decode error: {0}")]
    Decode(String),
}
