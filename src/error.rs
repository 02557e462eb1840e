use thiserror::Error;
use tokio::sync::AcquireError;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,

    #[error("Missing 'url' query parameter")]
    MissingUrl,

    #[error("Browser pool initialization failed: {0}")]
    PoolInit(String),

    #[error("Browser pool is closed")]
    PoolClosed,

    #[error("Error loading page: {0}")]
    Fetch(String),

    #[error("Error sanitizing page: {0}")]
    Sanitize(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl GatewayError {
    /// HTTP status code this error maps to at the gateway surface.
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Unauthorized => 401,
            GatewayError::MissingUrl => 400,
            GatewayError::PoolInit(_) | GatewayError::PoolClosed => 503,
            GatewayError::Fetch(_) | GatewayError::Sanitize(_) => 500,
            GatewayError::Config(_) | GatewayError::Io(_) => 500,
        }
    }

    /// Short outcome label used in the per-request log record.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized => "unauthorized",
            GatewayError::MissingUrl => "missing_url",
            GatewayError::PoolInit(_) => "pool_init_failed",
            GatewayError::PoolClosed => "pool_closed",
            GatewayError::Fetch(_) => "fetch_failed",
            GatewayError::Sanitize(_) => "sanitize_failed",
            GatewayError::Config(_) => "config_error",
            GatewayError::Io(_) => "io_error",
        }
    }
}

impl From<AcquireError> for GatewayError {
    fn from(_: AcquireError) -> Self {
        GatewayError::PoolClosed
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Io(err.to_string())
    }
}
