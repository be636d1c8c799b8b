use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Lookup service rejected the credentials (401)")]
    Unauthorized,
    #[error("Authentication request failed with status {status}")]
    AuthStatus {
        status: u16
    },
    #[error("Lookup for [{identifier}] failed with status {status}")]
    LookupStatus {
        identifier: String,
        status: u16
    },
    #[error("Lookup transport error: {0}")]
    Transport(#[from] reqwest::Error)
}
