use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::domain::{AdjustType, Config, Ticket, TicketAllocation, TimeEntry};
use crate::holidays;

pub const DB_PATH_ENV: &str = "TIMECARD_DB";
const DB_FILE: &str = "timecard.db";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS time_entries (
    date TEXT PRIMARY KEY,
    day_of_week TEXT NOT NULL,
    clock_in TEXT,
    lunch_minutes INTEGER,
    clock_out TEXT,
    adjustment_minutes INTEGER,
    adjust_type TEXT,
    comment TEXT
);
CREATE TABLE IF NOT EXISTS config (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tickets (
    id TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    archived INTEGER DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS ticket_allocations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id TEXT NOT NULL,
    date TEXT NOT NULL,
    hours TEXT NOT NULL,
    entered_on_client INTEGER DEFAULT 0,
    FOREIGN KEY (ticket_id) REFERENCES tickets(id),
    UNIQUE (ticket_id, date)
);
CREATE INDEX IF NOT EXISTS idx_entries_date ON time_entries(date);
CREATE INDEX IF NOT EXISTS idx_allocations_date ON ticket_allocations(date);
CREATE INDEX IF NOT EXISTS idx_allocations_ticket ON ticket_allocations(ticket_id);
";

const ENTRY_COLUMNS: &str =
    "date, day_of_week, clock_in, lunch_minutes, clock_out, adjustment_minutes, adjust_type, comment";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid stored value: {0}")]
    BadValue(String),
}

#[derive(Debug, Clone)]
pub struct DbInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: SystemTime,
}

pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    pub fn open(path: PathBuf) -> Result<Store, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        migrate(&conn)?;
        debug!(path = %path.display(), "opened store");
        Ok(Store { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_info(&self) -> Result<DbInfo, StorageError> {
        let metadata = fs::metadata(&self.path)?;
        Ok(DbInfo {
            path: self.path.clone(),
            size_bytes: metadata.len(),
            modified: metadata.modified()?,
        })
    }

    pub fn entry(&self, date: NaiveDate) -> Result<Option<TimeEntry>, StorageError> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM time_entries WHERE date = ?1"),
                params![date],
                entry_row,
            )
            .optional()?;
        raw.map(entry_from_row).transpose()
    }

    pub fn entries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeEntry>, StorageError> {
        let mut statement = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries WHERE date >= ?1 AND date <= ?2 ORDER BY date"
        ))?;
        let rows = statement.query_map(params![start, end], entry_row)?;

        let mut entries = Vec::new();
        for raw in rows {
            entries.push(entry_from_row(raw?)?);
        }
        Ok(entries)
    }

    pub fn save_entry(&self, entry: &TimeEntry) -> Result<(), StorageError> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO time_entries ({ENTRY_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            params![
                entry.date,
                entry.day_of_week,
                entry.clock_in.map(format_clock),
                entry.lunch_minutes,
                entry.clock_out.map(format_clock),
                entry.adjustment_minutes,
                entry.adjust_type.map(AdjustType::code),
                entry.comment,
            ],
        )?;
        debug!(date = %entry.date, "saved entry");
        Ok(())
    }

    pub fn load_config(&self) -> Result<Config, StorageError> {
        let mut config = Config::default();
        let mut statement = self.conn.prepare("SELECT key, value FROM config")?;
        let rows = statement.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            match key.as_str() {
                "hourly_rate" => config.hourly_rate = parse_decimal(&value)?,
                "currency" => config.currency = value,
                "standard_day_hours" => config.standard_day_hours = parse_decimal(&value)?,
                "vat_rate" => config.vat_rate = parse_decimal(&value)?,
                _ => {}
            }
        }
        Ok(config)
    }

    pub fn save_config(&self, config: &Config) -> Result<(), StorageError> {
        let pairs = [
            ("hourly_rate", config.hourly_rate.to_string()),
            ("currency", config.currency.clone()),
            ("standard_day_hours", config.standard_day_hours.to_string()),
            ("vat_rate", config.vat_rate.to_string()),
        ];
        for (key, value) in pairs {
            self.conn.execute(
                "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        Ok(())
    }

    pub fn ticket(&self, id: &str) -> Result<Option<Ticket>, StorageError> {
        let ticket = self
            .conn
            .query_row(
                "SELECT id, description, archived, created_at FROM tickets WHERE id = ?1",
                params![id],
                ticket_row,
            )
            .optional()?;
        Ok(ticket)
    }

    pub fn tickets(&self, include_archived: bool) -> Result<Vec<Ticket>, StorageError> {
        let sql = if include_archived {
            "SELECT id, description, archived, created_at FROM tickets ORDER BY id"
        } else {
            "SELECT id, description, archived, created_at FROM tickets WHERE archived = 0 ORDER BY id"
        };
        let mut statement = self.conn.prepare(sql)?;
        let rows = statement.query_map([], ticket_row)?;
        collect_rows(rows)
    }

    pub fn search_tickets(
        &self,
        query: &str,
        include_archived: bool,
    ) -> Result<Vec<Ticket>, StorageError> {
        let pattern = format!("%{query}%");
        let sql = if include_archived {
            "SELECT id, description, archived, created_at FROM tickets
             WHERE (id LIKE ?1 OR description LIKE ?1) ORDER BY id"
        } else {
            "SELECT id, description, archived, created_at FROM tickets
             WHERE (id LIKE ?1 OR description LIKE ?1) AND archived = 0 ORDER BY id"
        };
        let mut statement = self.conn.prepare(sql)?;
        let rows = statement.query_map(params![pattern], ticket_row)?;
        collect_rows(rows)
    }

    pub fn save_ticket(&self, ticket: &Ticket) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO tickets (id, description, archived, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                ticket.id,
                ticket.description,
                ticket.archived,
                ticket.created_at,
            ],
        )?;
        debug!(ticket = %ticket.id, "saved ticket");
        Ok(())
    }

    pub fn set_ticket_archived(&self, id: &str, archived: bool) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE tickets SET archived = ?2 WHERE id = ?1",
            params![id, archived],
        )?;
        Ok(())
    }

    pub fn can_delete_ticket(&self, id: &str) -> Result<bool, StorageError> {
        let references: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM ticket_allocations WHERE ticket_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(references == 0)
    }

    pub fn delete_ticket(&self, id: &str) -> Result<bool, StorageError> {
        if !self.can_delete_ticket(id)? {
            return Ok(false);
        }
        self.conn
            .execute("DELETE FROM tickets WHERE id = ?1", params![id])?;
        debug!(ticket = %id, "deleted ticket");
        Ok(true)
    }

    pub fn allocations_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<(TicketAllocation, String)>, StorageError> {
        let mut statement = self.conn.prepare(
            "SELECT a.ticket_id, a.date, a.hours, a.entered_on_client, t.description
             FROM ticket_allocations a JOIN tickets t ON t.id = a.ticket_id
             WHERE a.date = ?1 ORDER BY a.ticket_id",
        )?;
        let rows = statement.query_map(params![date], allocation_row)?;
        collect_allocations(rows)
    }

    pub fn allocations_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(TicketAllocation, String)>, StorageError> {
        let mut statement = self.conn.prepare(
            "SELECT a.ticket_id, a.date, a.hours, a.entered_on_client, t.description
             FROM ticket_allocations a JOIN tickets t ON t.id = a.ticket_id
             WHERE a.date >= ?1 AND a.date <= ?2 ORDER BY a.date, a.ticket_id",
        )?;
        let rows = statement.query_map(params![start, end], allocation_row)?;
        collect_allocations(rows)
    }

    pub fn save_allocation(
        &self,
        ticket_id: &str,
        date: NaiveDate,
        hours: Decimal,
    ) -> Result<(), StorageError> {
        if hours.is_zero() {
            self.delete_allocation(ticket_id, date)?;
            return Ok(());
        }
        self.conn.execute(
            "INSERT INTO ticket_allocations (ticket_id, date, hours, entered_on_client)
             VALUES (?1, ?2, ?3, 0)
             ON CONFLICT (ticket_id, date) DO UPDATE SET hours = excluded.hours",
            params![ticket_id, date, hours.to_string()],
        )?;
        debug!(ticket = %ticket_id, date = %date, hours = %hours, "saved allocation");
        Ok(())
    }

    pub fn delete_allocation(&self, ticket_id: &str, date: NaiveDate) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM ticket_allocations WHERE ticket_id = ?1 AND date = ?2",
            params![ticket_id, date],
        )?;
        Ok(())
    }

    pub fn set_entered_on_client(
        &self,
        ticket_id: &str,
        date: NaiveDate,
        entered: bool,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE ticket_allocations SET entered_on_client = ?3
             WHERE ticket_id = ?1 AND date = ?2",
            params![ticket_id, date, entered],
        )?;
        Ok(())
    }

    pub fn allocated_hours(&self, date: NaiveDate) -> Result<Decimal, StorageError> {
        let mut statement = self
            .conn
            .prepare("SELECT hours FROM ticket_allocations WHERE date = ?1")?;
        let rows = statement.query_map(params![date], |row| row.get::<_, String>(0))?;

        let mut total = Decimal::ZERO;
        for raw in rows {
            total += parse_decimal(&raw?)?;
        }
        Ok(total.round_dp(2))
    }

    pub fn allocated_hours_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Decimal>, StorageError> {
        let mut statement = self.conn.prepare(
            "SELECT date, hours FROM ticket_allocations WHERE date >= ?1 AND date <= ?2",
        )?;
        let rows = statement.query_map(params![start, end], |row| {
            Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for row in rows {
            let (date, raw) = row?;
            *totals.entry(date).or_insert(Decimal::ZERO) += parse_decimal(&raw)?;
        }
        for total in totals.values_mut() {
            *total = total.round_dp(2);
        }
        Ok(totals)
    }

    pub fn populate_holidays(
        &self,
        year: i32,
        month: u32,
        standard_day_minutes: i64,
    ) -> Result<u32, StorageError> {
        let mut added = 0;
        for (date, name) in holidays::weekday_holidays(year, month) {
            if let Some(existing) = self.entry(date)? {
                if existing.clock_in.is_some() || existing.adjustment_minutes.is_some() {
                    continue;
                }
            }
            let mut entry = TimeEntry::blank(date);
            entry.adjustment_minutes = Some(standard_day_minutes);
            entry.adjust_type = Some(AdjustType::PublicHoliday);
            entry.comment = Some(name.to_string());
            self.save_entry(&entry)?;
            added += 1;
        }
        debug!(year, month, added, "populated holidays");
        Ok(added)
    }
}

pub fn resolve_db_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return absolutize(path);
    }

    if let Some(path) = env::var_os(DB_PATH_ENV) {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return absolutize(path);
        }
    }

    data_dir().join(DB_FILE)
}

pub fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(path) = env::var_os("LOCALAPPDATA") {
            return PathBuf::from(path).join("timecard");
        }
    }

    if let Some(path) = env::var_os("XDG_DATA_HOME") {
        return PathBuf::from(path).join("timecard");
    }

    if let Some(path) = env::var_os("HOME") {
        return PathBuf::from(path)
            .join(".local")
            .join("share")
            .join("timecard");
    }

    PathBuf::from(".timecard")
}

fn absolutize(path: PathBuf) -> PathBuf {
    let path = if path.is_absolute() {
        path
    } else if let Ok(cwd) = env::current_dir() {
        cwd.join(path)
    } else {
        path
    };

    if path.exists() {
        fs::canonicalize(&path).unwrap_or(path)
    } else {
        path
    }
}

fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = conn.prepare("PRAGMA table_info(ticket_allocations)")?;
    let columns = statement
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    if !columns.iter().any(|name| name == "entered_on_client") {
        conn.execute(
            "ALTER TABLE ticket_allocations ADD COLUMN entered_on_client INTEGER DEFAULT 0",
            [],
        )?;
    }
    Ok(())
}

type EntryRow = (
    NaiveDate,
    String,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<String>,
);

fn entry_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn entry_from_row(raw: EntryRow) -> Result<TimeEntry, StorageError> {
    let (date, day_of_week, clock_in, lunch, clock_out, adjustment, adjust_type, comment) = raw;
    Ok(TimeEntry {
        date,
        day_of_week,
        clock_in: parse_clock(clock_in)?,
        lunch_minutes: lunch.filter(|&minutes| minutes != 0),
        clock_out: parse_clock(clock_out)?,
        adjustment_minutes: adjustment.filter(|&minutes| minutes != 0),
        adjust_type: adjust_type.as_deref().and_then(AdjustType::from_code),
        comment,
    })
}

fn ticket_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        description: row.get(1)?,
        archived: row.get(2)?,
        created_at: row.get(3)?,
    })
}

type AllocationRow = (String, NaiveDate, String, bool, String);

fn allocation_row(row: &Row<'_>) -> rusqlite::Result<AllocationRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>, StorageError> {
    let mut collected = Vec::new();
    for row in rows {
        collected.push(row?);
    }
    Ok(collected)
}

fn collect_allocations(
    rows: impl Iterator<Item = rusqlite::Result<AllocationRow>>,
) -> Result<Vec<(TicketAllocation, String)>, StorageError> {
    let mut allocations = Vec::new();
    for row in rows {
        let (ticket_id, date, hours, entered_on_client, description) = row?;
        allocations.push((
            TicketAllocation {
                ticket_id,
                date,
                hours: parse_decimal(&hours)?,
                entered_on_client,
            },
            description,
        ));
    }
    Ok(allocations)
}

// Clock times are stored as HH:MM, not the HH:MM:SS the chrono codec expects.
fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn parse_clock(value: Option<String>) -> Result<Option<NaiveTime>, StorageError> {
    match value {
        Some(raw) => NaiveTime::parse_from_str(&raw, "%H:%M")
            .map(Some)
            .map_err(|_| StorageError::BadValue(format!("bad clock time {raw:?}"))),
        None => Ok(None),
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, StorageError> {
    raw.parse()
        .map_err(|_| StorageError::BadValue(format!("bad decimal {raw:?}")))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use crate::domain::{AdjustType, Config, Ticket, TimeEntry};

    use super::Store;

    fn open_store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let store = Store::open(dir.path().join("timecard.db")).expect("store should open");
        (dir, store)
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn ticket(id: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            description: format!("{id} work"),
            archived: false,
            created_at: day(2025, 9, 1),
        }
    }

    #[test]
    fn round_trips_entries_with_hhmm_clocks() {
        let (_dir, store) = open_store();

        let mut entry = TimeEntry::blank(day(2025, 9, 1));
        entry.clock_in = NaiveTime::from_hms_opt(9, 0, 0);
        entry.lunch_minutes = Some(30);
        entry.clock_out = NaiveTime::from_hms_opt(17, 0, 0);
        entry.comment = Some("normal day".to_string());
        store.save_entry(&entry).expect("save should succeed");

        let loaded = store
            .entry(day(2025, 9, 1))
            .expect("load should succeed")
            .expect("entry should exist");
        assert_eq!(loaded, entry);
        assert_eq!(loaded.worked_hours(), dec!(7.50));

        assert!(store.entry(day(2025, 9, 2)).unwrap().is_none());
    }

    #[test]
    fn zero_durations_load_as_empty() {
        let (_dir, store) = open_store();

        let mut entry = TimeEntry::blank(day(2025, 9, 1));
        entry.lunch_minutes = Some(0);
        entry.adjustment_minutes = Some(0);
        store.save_entry(&entry).expect("save should succeed");

        let loaded = store.entry(day(2025, 9, 1)).unwrap().unwrap();
        assert_eq!(loaded.lunch_minutes, None);
        assert_eq!(loaded.adjustment_minutes, None);
        assert!(loaded.is_blank());
    }

    #[test]
    fn range_queries_come_back_ordered() {
        let (_dir, store) = open_store();

        for date in [day(2025, 9, 3), day(2025, 9, 1), day(2025, 9, 2)] {
            let mut entry = TimeEntry::blank(date);
            entry.adjustment_minutes = Some(60);
            entry.adjust_type = Some(AdjustType::Leave);
            store.save_entry(&entry).expect("save should succeed");
        }

        let entries = store
            .entries_between(day(2025, 9, 1), day(2025, 9, 2))
            .expect("range should load");
        let dates: Vec<NaiveDate> = entries.iter().map(|entry| entry.date).collect();
        assert_eq!(dates, vec![day(2025, 9, 1), day(2025, 9, 2)]);
    }

    #[test]
    fn config_defaults_until_saved() {
        let (_dir, store) = open_store();

        assert_eq!(store.load_config().unwrap(), Config::default());

        let mut config = Config::default();
        config.hourly_rate = dec!(120);
        config.currency = "USD".to_string();
        store.save_config(&config).expect("save should succeed");

        let loaded = store.load_config().unwrap();
        assert_eq!(loaded.hourly_rate, dec!(120));
        assert_eq!(loaded.currency, "USD");
        assert_eq!(loaded.standard_day_hours, dec!(7.5));
    }

    #[test]
    fn searches_tickets_and_filters_archived() {
        let (_dir, store) = open_store();

        store.save_ticket(&ticket("ALPHA1")).unwrap();
        store.save_ticket(&ticket("BETA2")).unwrap();
        store.set_ticket_archived("BETA2", true).unwrap();

        let active = store.tickets(false).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "ALPHA1");

        let all = store.tickets(true).unwrap();
        assert_eq!(all.len(), 2);

        let hits = store.search_tickets("beta", true).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "BETA2");
        assert!(hits[0].archived);

        assert!(store.search_tickets("beta", false).unwrap().is_empty());
    }

    #[test]
    fn refuses_to_delete_referenced_tickets() {
        let (_dir, store) = open_store();

        store.save_ticket(&ticket("ALPHA1")).unwrap();
        store
            .save_allocation("ALPHA1", day(2025, 9, 1), dec!(2.5))
            .unwrap();

        assert!(!store.can_delete_ticket("ALPHA1").unwrap());
        assert!(!store.delete_ticket("ALPHA1").unwrap());
        assert!(store.ticket("ALPHA1").unwrap().is_some());

        store.delete_allocation("ALPHA1", day(2025, 9, 1)).unwrap();
        assert!(store.delete_ticket("ALPHA1").unwrap());
        assert!(store.ticket("ALPHA1").unwrap().is_none());
    }

    #[test]
    fn sums_allocations_per_date() {
        let (_dir, store) = open_store();

        store.save_ticket(&ticket("ALPHA1")).unwrap();
        store.save_ticket(&ticket("BETA2")).unwrap();
        store
            .save_allocation("ALPHA1", day(2025, 9, 1), dec!(2.5))
            .unwrap();
        store
            .save_allocation("BETA2", day(2025, 9, 1), dec!(5))
            .unwrap();
        store
            .save_allocation("ALPHA1", day(2025, 9, 2), dec!(1.25))
            .unwrap();

        assert_eq!(store.allocated_hours(day(2025, 9, 1)).unwrap(), dec!(7.5));
        assert_eq!(store.allocated_hours(day(2025, 9, 3)).unwrap(), dec!(0));

        let totals = store
            .allocated_hours_between(day(2025, 9, 1), day(2025, 9, 30))
            .unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&day(2025, 9, 2)], dec!(1.25));

        let joined = store.allocations_for_date(day(2025, 9, 1)).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].0.ticket_id, "ALPHA1");
        assert_eq!(joined[0].1, "ALPHA1 work");
    }

    #[test]
    fn upserts_preserve_the_entered_flag_and_zero_deletes() {
        let (_dir, store) = open_store();

        store.save_ticket(&ticket("ALPHA1")).unwrap();
        store
            .save_allocation("ALPHA1", day(2025, 9, 1), dec!(2.5))
            .unwrap();
        store
            .set_entered_on_client("ALPHA1", day(2025, 9, 1), true)
            .unwrap();

        store
            .save_allocation("ALPHA1", day(2025, 9, 1), dec!(4))
            .unwrap();
        let allocations = store.allocations_for_date(day(2025, 9, 1)).unwrap();
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].0.hours, dec!(4));
        assert!(allocations[0].0.entered_on_client);

        store
            .save_allocation("ALPHA1", day(2025, 9, 1), dec!(0))
            .unwrap();
        assert!(store.allocations_for_date(day(2025, 9, 1)).unwrap().is_empty());
    }

    #[test]
    fn populates_holidays_once() {
        let (_dir, store) = open_store();

        let added = store.populate_holidays(2025, 12, 450).unwrap();
        assert_eq!(added, 2);

        let christmas = store.entry(day(2025, 12, 25)).unwrap().unwrap();
        assert_eq!(christmas.adjustment_minutes, Some(450));
        assert_eq!(christmas.adjust_type, Some(AdjustType::PublicHoliday));
        assert_eq!(christmas.comment.as_deref(), Some("Christmas Day"));
        assert!(christmas.clock_in.is_none());

        assert_eq!(store.populate_holidays(2025, 12, 450).unwrap(), 0);
    }

    #[test]
    fn holiday_population_skips_worked_days() {
        let (_dir, store) = open_store();

        let mut worked = TimeEntry::blank(day(2025, 12, 25));
        worked.clock_in = NaiveTime::from_hms_opt(9, 0, 0);
        worked.clock_out = NaiveTime::from_hms_opt(12, 0, 0);
        store.save_entry(&worked).unwrap();

        let added = store.populate_holidays(2025, 12, 450).unwrap();
        assert_eq!(added, 1);

        let unchanged = store.entry(day(2025, 12, 25)).unwrap().unwrap();
        assert_eq!(unchanged.adjustment_minutes, None);
        assert_eq!(unchanged.clock_in, NaiveTime::from_hms_opt(9, 0, 0));
    }

    #[test]
    fn reports_file_metadata() {
        let (_dir, store) = open_store();

        let info = store.file_info().expect("metadata should load");
        assert_eq!(info.path, store.path());
        assert!(info.size_bytes > 0);
    }
}
