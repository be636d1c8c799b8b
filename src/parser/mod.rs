
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::models::{ImportError, RawRecord, FIELDS_PER_ROW};

/// Reads the account statement export into typed records, preserving row
/// order exactly.
///
/// The first line is a header and is skipped. Every following row must have
/// exactly [`FIELDS_PER_ROW`] fields; a single malformed row fails the whole
/// parse, since downstream regrouping depends on an unbroken row sequence.
/// No filtering happens here.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, ImportError> {
    let file = File::open(path).map_err(|error| ImportError::input(path, error))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();

    for (index, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let row = result.map_err(|error| ImportError::row_parse(line, error))?;

        if row.len() != FIELDS_PER_ROW {
            return Err(ImportError::row_shape(line, row.len()));
        }

        let mut record: RawRecord = row
            .deserialize(None)
            .map_err(|error| ImportError::row_parse(line, error))?;
        record.line = line;

        records.push(record);
    }

    debug!("Parsed {} records from [{}]", records.len(), path.display());

    Ok(records)
}
