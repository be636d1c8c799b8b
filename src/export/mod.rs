#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::models::{Activity, ImportError};

const SCHEMA_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
struct ExportMeta {
    date: String,
    version: &'static str
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    meta: ExportMeta,
    activities: &'a [Activity]
}

/// Serializes the finalized activity list and persists it atomically.
///
/// The document reaches disk through a sibling staging file and a rename, so
/// a failure mid-write never leaves a partial artifact behind. Callers invoke
/// this only after reconstruction completed without a hard stop.
pub fn write_activities(path: &Path, activities: &[Activity]) -> Result<(), ImportError> {
    let document = ExportDocument {
        meta: ExportMeta {
            date: Utc::now().to_rfc3339(),
            version: SCHEMA_VERSION
        },
        activities
    };

    let body = serde_json::to_string_pretty(&document)?;

    let staging = path.with_extension("tmp");
    fs::write(&staging, body).map_err(|error| ImportError::output(path, error))?;
    fs::rename(&staging, path).map_err(|error| ImportError::output(path, error))?;

    Ok(())
}
