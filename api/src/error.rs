// Fault types shared by the settings loader, the session provider and the health checks

/// The store could not be reached (or was never configured) when a session was requested.
///
/// The provider never retries or suppresses this; it is up to the caller to decide whether it
/// becomes a transport-level error or structured data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupFault {
    #[error("database is not configured")]
    NotConfigured,
    #[error("failed to acquire database connection: {0}")]
    Unreachable(String),
}

/// A session was acquired but the probe query against it failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProbeFault(pub String);

/// Malformed configuration detected at startup. Fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigFault {
    #[error("{key} must be a boolean, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("API_V1_STR must start with '/', got {0:?}")]
    InvalidPrefix(String),
    #[error("invalid CORS origin {0:?}")]
    InvalidCorsOrigin(String),
    #[error("invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(String),
}
