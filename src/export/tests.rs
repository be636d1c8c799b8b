use std::fs;
use std::str::FromStr;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tempfile::tempdir;

use super::write_activities;
use crate::models::{Activity, ImportError, TradeSide};

fn sample_activity() -> Result<Activity> {
    Ok(Activity::trade(
        "account-1",
        TradeSide::Buy,
        "VWRL.AS".to_string(),
        Decimal::from(10),
        Decimal::from(50),
        "EUR",
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap(),
        2,
    ))
}

#[test]
fn test_export_writes_the_documented_shape() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("activities-import.json");

    write_activities(&path, &[sample_activity()?])?;

    let document: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;

    assert!(document["meta"]["date"].is_string());
    assert_eq!(document["meta"]["version"], json!(env!("CARGO_PKG_VERSION")));

    let activities = document["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["type"], json!("BUY"));
    assert_eq!(activities[0]["accountId"], json!("account-1"));
    assert_eq!(activities[0]["unitPrice"], json!(50.0));
    assert!(activities[0].get("marker").is_none());

    Ok(())
}

#[test]
fn test_export_leaves_no_staging_file_behind() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("activities-import.json");

    write_activities(&path, &[sample_activity()?])?;

    assert!(path.exists());
    assert!(!dir.path().join("activities-import.tmp").exists());

    Ok(())
}

#[test]
fn test_export_fails_cleanly_on_a_missing_directory() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("no-such-dir").join("activities-import.json");

    let result = write_activities(&path, &[sample_activity()?]);

    assert!(matches!(result, Err(ImportError::Output { .. })));
    assert!(!path.exists());

    Ok(())
}

#[test]
fn test_export_accepts_an_empty_activity_list() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("activities-import.json");

    write_activities(&path, &[])?;

    let document: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;

    assert_eq!(document["activities"], json!([]));

    Ok(())
}

#[test]
fn test_export_fee_round_trips_as_a_number() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("activities-import.json");

    let mut activity = sample_activity()?;
    activity.fee = Decimal::from_str("2.50")?;

    write_activities(&path, &[activity])?;

    let document: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;

    assert_eq!(document["activities"][0]["fee"], json!(2.5));

    Ok(())
}
