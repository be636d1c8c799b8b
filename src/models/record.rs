use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::ImportError;

/// Column count of the account statement export.
pub const FIELDS_PER_ROW: usize = 12;

/// Represents a single row from the input CSV file.
///
/// The export is a flat bookkeeping ledger: one economic event (a trade or a
/// dividend) is spread over several adjacent rows, distinguishable only by
/// their free-text `description`. Records are immutable once parsed; all
/// regrouping happens downstream.
///
/// Amount columns are optional because pure marker rows leave them empty.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Booking date, `dd-mm-yyyy`.
    pub date: String,
    /// Booking time, `HH:MM`. Empty on some postings.
    pub time: String,
    /// Value date of the mutation (carried, not used).
    pub _value_date: String,
    /// Product name as printed by the broker.
    pub product: String,
    /// Instrument identifier; empty on cash-only rows.
    pub isin: String,
    /// Free-text posting description. The only key for regrouping.
    pub description: String,
    /// Amount in the secondary currency of a conversion posting.
    pub fx_amount: Option<Decimal>,
    /// Currency of the primary mutation.
    pub currency: String,
    /// Primary mutation amount. Negative for debits.
    pub amount: Option<Decimal>,
    /// Running balance currency (carried, not used).
    pub _balance_currency: String,
    /// Running balance amount (carried, not used).
    pub _balance: Option<Decimal>,
    /// Broker-side order reference; empty on non-order rows.
    pub order_id: String,
    /// 1-based line number in the source file, attached after parsing.
    #[serde(skip)]
    pub line: usize
}

impl RawRecord {
    /// Combines the date and time columns into a UTC timestamp.
    pub fn timestamp(&self) -> Result<DateTime<Utc>, ImportError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%d-%m-%Y")
            .map_err(|_| ImportError::timestamp(self))?;

        let time = if self.time.trim().is_empty() {
            NaiveTime::MIN
        } else {
            NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
                .map_err(|_| ImportError::timestamp(self))?
        };

        Ok(date.and_time(time).and_utc())
    }

    /// The primary amount, required to be present.
    pub fn required_amount(&self) -> Result<Decimal, ImportError> {
        self.amount.ok_or_else(|| ImportError::amount_missing(self))
    }
}
