use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::resolver::{ResolverError, SymbolCandidate, SymbolResolver};

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(rename = "authToken")]
    pub(crate) auth_token: String
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse {
    pub(crate) items: Vec<SymbolCandidate>
}

/// Bearer-authenticated client for the portfolio application's lookup API.
///
/// The credential is fetched exactly once, before any lookups; a 401 at any
/// point is surfaced as [`ResolverError::Unauthorized`] and ends the batch.
pub struct LookupClient {
    client: Client,
    base_url: String,
    token: String
}

impl LookupClient {
    /// Exchanges the configured secret for a bearer token and returns a
    /// ready-to-use client.
    pub async fn connect(base_url: &str, secret: &str) -> Result<Self, ResolverError> {
        let client = Client::new();
        let url = format!("{base_url}/api/v1/auth/anonymous/{secret}");
        let response = client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body: AuthResponse = response.json().await?;
                debug!("Authenticated against [{base_url}]");

                Ok(Self {
                    client,
                    base_url: base_url.to_string(),
                    token: body.auth_token
                })
            }
            StatusCode::UNAUTHORIZED => Err(ResolverError::Unauthorized),
            status => Err(ResolverError::AuthStatus { status: status.as_u16() })
        }
    }
}

#[async_trait]
impl SymbolResolver for LookupClient {
    async fn lookup(&self, identifier: &str) -> Result<Vec<SymbolCandidate>, ResolverError> {
        let url = format!("{}/api/v1/symbol/lookup?query={}", self.base_url, identifier);
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body: LookupResponse = response.json().await?;
                debug!("Lookup for [{identifier}] returned {} candidates", body.items.len());
                Ok(body.items)
            }
            StatusCode::UNAUTHORIZED => Err(ResolverError::Unauthorized),
            status => Err(ResolverError::LookupStatus {
                identifier: identifier.to_string(),
                status: status.as_u16()
            })
        }
    }
}
