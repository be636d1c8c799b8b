mod reconstructor;

use tracing::{info, warn};

pub use reconstructor::{Reconstruction, Reconstructor};

use crate::config::Config;
use crate::models::{ImportError, RawRecord};
use crate::resolver::SymbolResolver;

/// Drives the record sequence through the reconstructor, one record at a time.
///
/// Strictly sequential: a record may trigger a symbol lookup whose result
/// lands in the mutable tail that the very next record inspects, so there is
/// nothing to parallelize.
pub struct ImportEngine<'a, R: SymbolResolver> {
    config: &'a Config,
    resolver: &'a R
}

impl<'a, R: SymbolResolver> ImportEngine<'a, R> {
    pub fn new(config: &'a Config, resolver: &'a R) -> Self {
        Self { config, resolver }
    }

    /// Runs the full pass and reports what was produced, skipped and left
    /// unmatched. Any error discards the work in progress.
    pub async fn run(&self, records: Vec<RawRecord>) -> Result<Reconstruction, ImportError> {
        let total = records.len();

        let mut reconstructor = Reconstructor::new(
            &self.config.account_id,
            self.config.dividend_quantity,
            self.config.price_mode,
            self.resolver,
        );

        for (index, record) in records.into_iter().enumerate() {
            info!("Record {}/{} [{}]", index + 1, total, record.description);
            reconstructor.push(record).await?;
        }

        let outcome = reconstructor.finish()?;

        for record in &outcome.unmatched {
            warn!(
                "Row {} [{}] (order {}) matched no rule; review it manually",
                record.line, record.description, record.order_id
            );
        }

        info!(
            "Reconstructed {} activities ({} rows skipped, {} unmatched)",
            outcome.activities.len(),
            outcome.skipped,
            outcome.unmatched.len()
        );

        Ok(outcome)
    }
}
