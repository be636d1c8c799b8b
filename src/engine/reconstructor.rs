use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{Activity, DividendQuantity, ImportError, PriceMode, RawRecord, TailMarker, TradeSide};
use crate::resolver::SymbolResolver;

/// Description markers of rows that never carry a portfolio event: cash
/// transfers, the broker's internal banking entity, sweeps and withdrawals.
const NOISE_MARKERS: [&str; 4] = ["ideal", "flatex", "cash sweep", "terugstorting"];

const DIVIDEND_TAX_MARKER: &str = "dividendbelasting";
const DIVIDEND_MARKER: &str = "dividend";
const FEE_MARKER: &str = "transactiekosten";
const CONVERSION_MARKER: &str = "valuta";

/// Outcome of a completed reconstruction pass.
pub struct Reconstruction {
    pub activities: Vec<Activity>,
    /// Rows dropped on purpose (noise, no instrument identifier).
    pub skipped: usize,
    /// Rows with an instrument identifier that matched no rule. Surfaced for
    /// manual review instead of being dropped silently.
    pub unmatched: Vec<RawRecord>
}

/// Single-pass state machine that regroups split bookkeeping rows into
/// complete buy/sell/dividend activities.
///
/// The export spreads one economic event over adjacent rows (fee posting +
/// trade row, dividend + withholding tax) with row order as the only link.
/// Each record is cased on its lower-cased description and either skipped,
/// appended, or merged into the marked tail of the activity list. Rules that
/// expect a specific tail state fail with an explicit error when the marker
/// is absent or wrong.
pub struct Reconstructor<'a, R: SymbolResolver> {
    resolver: &'a R,
    account_id: String,
    dividend_quantity: DividendQuantity,
    price_mode: PriceMode,
    sell_pattern: Regex,
    buy_pattern: Regex,
    activities: Vec<Activity>,
    skipped: usize,
    unmatched: Vec<RawRecord>
}

impl<'a, R: SymbolResolver> Reconstructor<'a, R> {
    pub fn new(
        account_id: &str,
        dividend_quantity: DividendQuantity,
        price_mode: PriceMode,
        resolver: &'a R,
    ) -> Self {
        Self {
            resolver,
            account_id: account_id.to_string(),
            dividend_quantity,
            price_mode,
            sell_pattern: Regex::new(r"\bverkoop (\d+)\b").expect("sell pattern is valid"),
            buy_pattern: Regex::new(r"\bkoop (\d+)\b").expect("buy pattern is valid"),
            activities: Vec::new(),
            skipped: 0,
            unmatched: Vec::new()
        }
    }

    /// Applies one record to the activity tail.
    ///
    /// Records must arrive in original file order; a dividend-tax or trade
    /// row only makes sense directly after the row it amends.
    pub async fn push(&mut self, record: RawRecord) -> Result<(), ImportError> {
        let description = record.description.to_lowercase();

        if description.is_empty() || NOISE_MARKERS.iter().any(|marker| description.contains(marker)) {
            self.skip(&record, "noise posting");
            return Ok(());
        }

        // Tax first: its marker contains the dividend marker.
        if description.contains(DIVIDEND_TAX_MARKER) {
            return self.apply_dividend_tax(&record);
        }

        if description.contains(DIVIDEND_MARKER) {
            return self.append_dividend(&record).await;
        }

        // Sell first: `verkoop` contains `koop`.
        if let Some(quantity) = capture_quantity(&self.sell_pattern, &description) {
            return self.apply_trade(&record, TradeSide::Sell, quantity).await;
        }

        if let Some(quantity) = capture_quantity(&self.buy_pattern, &description) {
            return self.apply_trade(&record, TradeSide::Buy, quantity).await;
        }

        if !record.isin.is_empty() && description.contains(FEE_MARKER) {
            return self.append_pending_fee(&record, TradeSide::Buy, record.amount);
        }

        if !record.isin.is_empty() && description.contains(CONVERSION_MARKER) {
            return self.append_pending_fee(&record, TradeSide::Sell, record.fx_amount);
        }

        if record.isin.is_empty() {
            self.skip(&record, "no instrument identifier");
            return Ok(());
        }

        debug!("Row {} [{}] matched no rule", record.line, record.description);
        self.unmatched.push(record);

        Ok(())
    }

    /// Closes the pass. A provisional fee placeholder still in the list means
    /// its trade row never arrived; that is defective input, not output.
    pub fn finish(mut self) -> Result<Reconstruction, ImportError> {
        if let Some(defective) = self.activities.iter().find(|activity| activity.is_pending()) {
            return Err(ImportError::dangling_pending_fee(defective));
        }

        // A dividend without a tax row is complete as posted.
        for activity in &mut self.activities {
            activity.marker = None;
        }

        Ok(Reconstruction {
            activities: self.activities,
            skipped: self.skipped,
            unmatched: self.unmatched
        })
    }

    fn apply_dividend_tax(&mut self, record: &RawRecord) -> Result<(), ImportError> {
        let tax = record.required_amount()?;

        match self.activities.last_mut() {
            Some(last) if last.marker == Some(TailMarker::DividendPosted) => {
                last.absorb_dividend_tax(tax, &record.currency);
                debug!("Row {}: folded withholding tax into the posted dividend", record.line);
                Ok(())
            }
            _ => Err(ImportError::tax_without_dividend(record))
        }
    }

    async fn append_dividend(&mut self, record: &RawRecord) -> Result<(), ImportError> {
        let symbol = self.resolve_symbol(record).await?;
        let amount = record.required_amount()?;

        let quantity = match self.dividend_quantity {
            DividendQuantity::Zero => Decimal::ZERO,
            DividendQuantity::One => Decimal::ONE
        };

        self.activities.push(Activity::dividend(
            &self.account_id,
            symbol,
            quantity,
            amount.abs(),
            &record.currency,
            record.timestamp()?,
            record.line,
        ));

        Ok(())
    }

    async fn apply_trade(
        &mut self,
        record: &RawRecord,
        side: TradeSide,
        quantity: Decimal,
    ) -> Result<(), ImportError> {
        let symbol = self.resolve_symbol(record).await?;
        let amount = record.required_amount()?;

        let unit_price = match self.price_mode {
            PriceMode::Total => amount.abs(),
            PriceMode::PerUnit => (amount.abs() / quantity).round_dp(3)
        };

        let date = record.timestamp()?;

        match self.take_pending(side, record)? {
            Some(index) => {
                self.activities[index]
                    .complete_trade(side, symbol, quantity, unit_price, &record.currency, date, record.line);
                debug!("Row {}: completed the pending fee into a trade", record.line);
            }
            None => {
                self.activities.push(Activity::trade(
                    &self.account_id,
                    side,
                    symbol,
                    quantity,
                    unit_price,
                    &record.currency,
                    date,
                    record.line,
                ));
            }
        }

        Ok(())
    }

    /// Locates the pending placeholder this trade row completes and returns
    /// its index, with the tail already cleaned up.
    ///
    /// A lone placeholder must carry the trade's side tag. When the two tail
    /// entries are opposite-tagged placeholders (the historical double
    /// emission of a single posting), the matching one wins and the redundant
    /// twin is dropped.
    fn take_pending(&mut self, side: TradeSide, record: &RawRecord) -> Result<Option<usize>, ImportError> {
        let len = self.activities.len();

        let Some(tail_side) = self.activities.last().and_then(Activity::pending_side) else {
            return Ok(None);
        };

        let twin_side = (len >= 2)
            .then(|| self.activities[len - 2].pending_side())
            .flatten();

        match twin_side {
            Some(twin) if twin != tail_side => {
                if tail_side == side {
                    self.activities.remove(len - 2);
                } else {
                    self.activities.remove(len - 1);
                }
                Ok(Some(len - 2))
            }
            _ if tail_side == side => Ok(Some(len - 1)),
            _ => Err(ImportError::pending_side_mismatch(record))
        }
    }

    fn append_pending_fee(
        &mut self,
        record: &RawRecord,
        side: TradeSide,
        amount: Option<Decimal>,
    ) -> Result<(), ImportError> {
        let fee = amount.ok_or_else(|| ImportError::amount_missing(record))?.abs();

        self.activities.push(Activity::pending_fee(
            &self.account_id,
            side,
            fee,
            &record.currency,
            record.timestamp()?,
            record.line,
        ));

        debug!("Row {}: provisional {:?}-side fee of {}", record.line, side, fee);

        Ok(())
    }

    async fn resolve_symbol(&self, record: &RawRecord) -> Result<String, ImportError> {
        let candidates = self.resolver.lookup(&record.isin).await?;

        match candidates.into_iter().next() {
            Some(candidate) => Ok(candidate.symbol),
            None => {
                warn!("No symbol found for [{}] ({}); leaving it empty", record.isin, record.product);
                Ok(String::new())
            }
        }
    }

    fn skip(&mut self, record: &RawRecord, reason: &str) {
        self.skipped += 1;
        debug!("Row {} [{}] skipped: {}", record.line, record.description, reason);
    }
}

fn capture_quantity(pattern: &Regex, description: &str) -> Option<Decimal> {
    pattern
        .captures(description)?
        .get(1)?
        .as_str()
        .parse::<u64>()
        .ok()
        .filter(|quantity| *quantity > 0)
        .map(Decimal::from)
}
