use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::{AdjustType, Config, TimeEntry};
use crate::storage::{StorageError, Store};

const SKIPPED_SHEETS: [&str; 3] = ["Config", "Sick 2012-13", "Summary 2012-13"];
const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse import file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Deserialize)]
struct Cell {
    #[serde(default)]
    value: Value,
}

type Sheet = BTreeMap<String, Cell>;
type Workbook = BTreeMap<String, Sheet>;

#[derive(Debug)]
pub struct ImportSummary {
    pub hourly_rate: Decimal,
    pub sheets: Vec<(String, u32)>,
    pub total_entries: u32,
}

pub fn import_file(store: &Store, path: &Path) -> Result<ImportSummary, ImportError> {
    let raw = fs::read_to_string(path)?;
    let workbook: Workbook = serde_json::from_str(&raw)?;

    let hourly_rate = workbook
        .get("Config")
        .and_then(|sheet| sheet.get("B1"))
        .and_then(|cell| parse_number(&cell.value))
        .unwrap_or(dec!(97));
    let config = Config {
        hourly_rate,
        ..Config::default()
    };
    store.save_config(&config)?;

    let mut summary = ImportSummary {
        hourly_rate,
        sheets: Vec::new(),
        total_entries: 0,
    };
    for (sheet_name, cells) in &workbook {
        if SKIPPED_SHEETS.contains(&sheet_name.as_str()) {
            continue;
        }
        let imported = import_sheet(store, cells)?;
        summary.total_entries += imported;
        summary.sheets.push((sheet_name.clone(), imported));
    }

    debug!(entries = summary.total_entries, "import finished");
    Ok(summary)
}

fn import_sheet(store: &Store, cells: &Sheet) -> Result<u32, ImportError> {
    let mut rows: BTreeMap<u32, HashMap<&str, &Value>> = BTreeMap::new();
    for (cell_ref, cell) in cells {
        let Some((column, row)) = split_cell_ref(cell_ref) else {
            continue;
        };
        if row == 1 {
            continue;
        }
        rows.entry(row).or_default().insert(column, &cell.value);
    }

    let mut imported = 0;
    for row in rows.values() {
        if let Some(entry) = entry_from_row(row) {
            store.save_entry(&entry)?;
            imported += 1;
        }
    }
    Ok(imported)
}

fn entry_from_row(row: &HashMap<&str, &Value>) -> Option<TimeEntry> {
    let day_label = row.get("A").and_then(|value| value.as_str())?;
    if !WEEKDAY_LABELS.contains(&day_label) {
        return None;
    }
    let date = row.get("B").and_then(|value| parse_date(value))?;

    let mut entry = TimeEntry::blank(date);
    entry.day_of_week = day_label.to_string();
    entry.clock_in = row.get("C").and_then(|value| parse_time(value));
    entry.lunch_minutes = row.get("D").and_then(|value| parse_duration_minutes(value));
    entry.clock_out = row.get("E").and_then(|value| parse_time(value));
    entry.adjustment_minutes = row.get("H").and_then(|value| parse_duration_minutes(value));
    entry.adjust_type = row
        .get("J")
        .and_then(|value| value.as_str())
        .and_then(AdjustType::from_code);
    entry.comment = row
        .get("K")
        .and_then(|value| value.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    Some(entry)
}

fn split_cell_ref(cell_ref: &str) -> Option<(&str, u32)> {
    let digits_at = cell_ref.find(|ch: char| ch.is_ascii_digit())?;
    if digits_at == 0 {
        return None;
    }
    let (column, row) = cell_ref.split_at(digits_at);
    row.parse().ok().map(|row| (column, row))
}

fn parse_time(value: &Value) -> Option<NaiveTime> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    let normalized = raw.replace(' ', ":");
    let mut parts = normalized.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    if hour == 0 && minute == 0 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_duration_minutes(value: &Value) -> Option<i64> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut parts = raw.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let total = hours * 60 + minutes;
    (total != 0).then_some(total)
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    let date_part = raw.split(' ').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => number.to_string().parse().ok(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::domain::AdjustType;
    use crate::storage::Store;

    use super::import_file;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn import_fixture() -> (TempDir, Store, super::ImportSummary) {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let store = Store::open(dir.path().join("timecard.db")).expect("store should open");

        let workbook = json!({
            "Config": {
                "B1": { "value": 105 }
            },
            "2025-26": {
                "A1": { "value": "Day" },
                "B1": { "value": "Date" },
                "A2": { "value": "Mon" },
                "B2": { "value": "2025-09-01" },
                "C2": { "value": "09:00:00" },
                "D2": { "value": "00:30:00" },
                "E2": { "value": "17:00:00" },
                "A3": { "value": "Tue" },
                "B3": { "value": "2025-09-02" },
                "H3": { "value": "07:30:00" },
                "J3": { "value": "L" },
                "K3": { "value": "annual leave" },
                "A4": { "value": "Totals" },
                "B4": { "value": "2025-09-03" },
                "A5": { "value": "Wed" },
                "B5": { "value": "2025-09-03" },
                "C5": { "value": "00:00:00" },
                "D5": { "value": "00:00:00" }
            },
            "Sick 2012-13": {
                "A2": { "value": "Mon" },
                "B2": { "value": "2012-09-03" }
            }
        });
        let path = dir.path().join("export.json");
        std::fs::write(&path, workbook.to_string()).expect("fixture should be written");

        let summary = import_file(&store, &path).expect("import should succeed");
        (dir, store, summary)
    }

    #[test]
    fn imports_day_rows_and_skips_the_rest() {
        let (_dir, store, summary) = import_fixture();

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.sheets, vec![("2025-26".to_string(), 3)]);

        let monday = store.entry(day(2025, 9, 1)).unwrap().unwrap();
        assert_eq!(monday.clock_in, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(monday.lunch_minutes, Some(30));
        assert_eq!(monday.clock_out, NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(monday.worked_hours(), dec!(7.50));

        let tuesday = store.entry(day(2025, 9, 2)).unwrap().unwrap();
        assert_eq!(tuesday.adjustment_minutes, Some(450));
        assert_eq!(tuesday.adjust_type, Some(AdjustType::Leave));
        assert_eq!(tuesday.comment.as_deref(), Some("annual leave"));

        assert!(store.entry(day(2012, 9, 3)).unwrap().is_none());
    }

    #[test]
    fn midnight_and_zero_cells_stay_empty() {
        let (_dir, store, _summary) = import_fixture();

        let wednesday = store.entry(day(2025, 9, 3)).unwrap().unwrap();
        assert_eq!(wednesday.clock_in, None);
        assert_eq!(wednesday.lunch_minutes, None);
        assert!(wednesday.is_blank());
    }

    #[test]
    fn config_sheet_sets_the_hourly_rate() {
        let (_dir, store, summary) = import_fixture();

        assert_eq!(summary.hourly_rate, dec!(105));
        let config = store.load_config().unwrap();
        assert_eq!(config.hourly_rate, dec!(105));
        assert_eq!(config.currency, "GBP");
    }
}
