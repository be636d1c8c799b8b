mod activity;
mod errors;
mod record;

use serde::Serialize;

pub use activity::{Activity, DATA_SOURCE};
pub use errors::ImportError;
pub use record::{RawRecord, FIELDS_PER_ROW};

/// The kind of economic event an activity represents.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Buy,
    Sell,
    Dividend
}

/// Which trade a provisional fee posting is waiting for.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TradeSide {
    Buy,
    Sell
}

impl From<TradeSide> for ActivityType {
    fn from(side: TradeSide) -> Self {
        match side {
            TradeSide::Buy => ActivityType::Buy,
            TradeSide::Sell => ActivityType::Sell
        }
    }
}

/// Transient state token carried by the tail of the activity list.
///
/// The source export links split postings only through row order. Instead of
/// indexing back into the list, every rule checks the marker on the last
/// appended entry and fails loudly when it is not the expected one.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TailMarker {
    /// A fee-only placeholder awaiting the trade row that completes it.
    PendingFee(TradeSide),
    /// A dividend that the directly following row may amend with withholding tax.
    DividendPosted
}

/// Quantity recorded on dividend activities. The export carries no share
/// count on dividend rows, so the value is a fixed policy choice.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum DividendQuantity {
    Zero,
    #[default]
    One
}

/// How the unit price of a trade row is derived from its cash amount.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum PriceMode {
    /// The row's absolute amount, unscaled.
    Total,
    /// Absolute amount divided by the traded quantity, rounded to 3 decimals.
    #[default]
    PerUnit
}
