use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ActivityType, TailMarker, TradeSide};

/// Data-source tag stamped on every exported activity.
pub const DATA_SOURCE: &str = "YAHOO";

/// A normalized buy/sell/dividend event in the import format of the target
/// portfolio application.
///
/// Activities accumulate in an ordered list whose tail is the only mutable
/// region: a provisional fee placeholder is promoted by the trade row that
/// follows it, and a posted dividend absorbs the withholding tax directly
/// after it. Once an entry is no longer at the tail it is final.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub account_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Trading symbol resolved from the ISIN; empty when the lookup had no match.
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub currency: String,
    pub date: DateTime<Utc>,
    pub data_source: &'static str,
    /// Tail-state token; cleared on finalization, never serialized.
    #[serde(skip)]
    pub marker: Option<TailMarker>,
    /// Source row of the posting that created this entry, for error reports.
    #[serde(skip)]
    pub source_line: usize
}

impl Activity {
    /// Creates a provisional fee-only placeholder awaiting its trade row.
    ///
    /// The type field holds the expected side so the entry is well-formed,
    /// but the entry must not survive unpromoted; the reconstructor rejects
    /// any pending placeholder left over at end of input.
    pub fn pending_fee(
        account_id: &str,
        side: TradeSide,
        fee: Decimal,
        currency: &str,
        date: DateTime<Utc>,
        source_line: usize,
    ) -> Self {
        Self {
            account_id: account_id.to_string(),
            activity_type: side.into(),
            symbol: String::new(),
            quantity: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            fee,
            currency: currency.to_string(),
            date,
            data_source: DATA_SOURCE,
            marker: Some(TailMarker::PendingFee(side)),
            source_line
        }
    }

    /// Creates a dividend entry, open to a tax amendment from the next row.
    pub fn dividend(
        account_id: &str,
        symbol: String,
        quantity: Decimal,
        unit_price: Decimal,
        currency: &str,
        date: DateTime<Utc>,
        source_line: usize,
    ) -> Self {
        Self {
            account_id: account_id.to_string(),
            activity_type: ActivityType::Dividend,
            symbol,
            quantity,
            unit_price,
            fee: Decimal::ZERO,
            currency: currency.to_string(),
            date,
            data_source: DATA_SOURCE,
            marker: Some(TailMarker::DividendPosted),
            source_line
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.marker, Some(TailMarker::PendingFee(_)))
    }

    pub fn pending_side(&self) -> Option<TradeSide> {
        match self.marker {
            Some(TailMarker::PendingFee(side)) => Some(side),
            _ => None
        }
    }

    /// Promotes a pending placeholder in place into a finalized trade.
    ///
    /// The fee already on the entry is kept; everything else comes from the
    /// trade row. Clears the marker.
    pub fn complete_trade(
        &mut self,
        side: TradeSide,
        symbol: String,
        quantity: Decimal,
        unit_price: Decimal,
        currency: &str,
        date: DateTime<Utc>,
        source_line: usize,
    ) {
        self.activity_type = side.into();
        self.symbol = symbol;
        self.quantity = quantity;
        self.unit_price = unit_price;
        self.currency = currency.to_string();
        self.date = date;
        self.marker = None;
        self.source_line = source_line;
    }

    /// Creates a stand-alone trade with no fee attached.
    pub fn trade(
        account_id: &str,
        side: TradeSide,
        symbol: String,
        quantity: Decimal,
        unit_price: Decimal,
        currency: &str,
        date: DateTime<Utc>,
        source_line: usize,
    ) -> Self {
        Self {
            account_id: account_id.to_string(),
            activity_type: side.into(),
            symbol,
            quantity,
            unit_price,
            fee: Decimal::ZERO,
            currency: currency.to_string(),
            date,
            data_source: DATA_SOURCE,
            marker: None,
            source_line
        }
    }

    /// Folds a withholding-tax posting into this dividend and finalizes it.
    pub fn absorb_dividend_tax(&mut self, tax: Decimal, currency: &str) {
        self.fee = tax.abs();
        self.currency = currency.to_string();
        self.marker = None;
    }
}
