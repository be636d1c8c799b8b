use std::io;
use std::path::Path;

use thiserror::Error;

use crate::models::{Activity, RawRecord, FIELDS_PER_ROW};
use crate::resolver::ResolverError;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not read input [{path}]: {source}")]
    Input {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Row {line} could not be parsed: {message}")]
    RowParse {
        line: usize,
        message: String
    },
    #[error("Row {line} has {found} fields, expected {expected}")]
    RowShape {
        line: usize,
        found: usize,
        expected: usize
    },
    #[error("Row {line} has an unreadable timestamp [{date} {time}]")]
    Timestamp {
        line: usize,
        date: String,
        time: String
    },
    #[error("Row {line} [{description}] carries no amount")]
    AmountMissing {
        line: usize,
        description: String
    },
    #[error("Dividend tax on row {line} [{description}] has no posted dividend to amend")]
    TaxWithoutDividend {
        line: usize,
        description: String
    },
    #[error("Trade on row {line} [{description}] does not match the pending fee at the tail")]
    PendingSideMismatch {
        line: usize,
        description: String
    },
    #[error("Fee posting on row {line} was never completed by a trade row")]
    DanglingPendingFee {
        line: usize
    },
    #[error("Could not write output [{path}]: {source}")]
    Output {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Could not serialize the activity list: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Resolver(#[from] ResolverError)
}

impl ImportError {
    //NOTE: Most variants carry the same row context, so constructors keep the
    //      call sites from repeating the line/description plumbing.

    pub fn input(path: &Path, source: io::Error) -> Self {
        Self::Input { path: path.display().to_string(), source }
    }

    pub fn row_parse(line: usize, error: csv::Error) -> Self {
        Self::RowParse { line, message: error.to_string() }
    }

    pub fn row_shape(line: usize, found: usize) -> Self {
        Self::RowShape { line, found, expected: FIELDS_PER_ROW }
    }

    pub fn timestamp(record: &RawRecord) -> Self {
        Self::Timestamp {
            line: record.line,
            date: record.date.clone(),
            time: record.time.clone()
        }
    }

    pub fn amount_missing(record: &RawRecord) -> Self {
        Self::AmountMissing {
            line: record.line,
            description: record.description.clone()
        }
    }

    pub fn tax_without_dividend(record: &RawRecord) -> Self {
        Self::TaxWithoutDividend {
            line: record.line,
            description: record.description.clone()
        }
    }

    pub fn pending_side_mismatch(record: &RawRecord) -> Self {
        Self::PendingSideMismatch {
            line: record.line,
            description: record.description.clone()
        }
    }

    pub fn dangling_pending_fee(activity: &Activity) -> Self {
        Self::DanglingPendingFee { line: activity.source_line }
    }

    pub fn output(path: &Path, source: io::Error) -> Self {
        Self::Output { path: path.display().to_string(), source }
    }
}
