mod client;
mod errors;

use async_trait::async_trait;
use serde::Deserialize;

pub use client::LookupClient;
pub use errors::ResolverError;

/// A single match returned by the symbol lookup service, best match first.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolCandidate {
    pub symbol: String
}

/// Maps an instrument identifier to trading-symbol candidates.
///
/// The engine takes the first candidate and treats an empty result as a
/// non-fatal miss. Every error return aborts the batch.
#[async_trait]
pub trait SymbolResolver {
    async fn lookup(&self, identifier: &str) -> Result<Vec<SymbolCandidate>, ResolverError>;
}
