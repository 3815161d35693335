use crate::domain::{
    EntryId, NewTimetableEntry, RecordStatus, TimetableEntry, TimetableError, TimetableResult,
};
use crate::infrastructure::{RecordStore, TIMETABLE_TABLE, TimetableQuery};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use duckdb::{Connection, params, params_from_iter};
use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const ID_SEQUENCE: &str = "doctor_timetable_id_seq";

pub struct DuckDbStorage {
    conn: Mutex<Connection>,
}

impl DuckDbStorage {
    pub fn new<P: AsRef<Path>>(db_path: P) -> TimetableResult<Self> {
        let conn = Connection::open(db_path)?;

        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize()?;
        Ok(storage)
    }

    pub fn in_memory() -> TimetableResult<Self> {
        let conn = Connection::open_in_memory()?;

        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize()?;
        Ok(storage)
    }

    pub fn backend_info(&self) -> &str {
        "DuckDB timetable store"
    }

    /// Overwrite the status of a stored row. Cancellation goes through here.
    pub fn update_status(&self, id: EntryId, status: RecordStatus) -> TimetableResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            &format!("UPDATE {TIMETABLE_TABLE} SET status = ? WHERE id = ?"),
            params![status.as_str(), id],
        )?;

        if changed == 0 {
            return Err(TimetableError::NotFound(id));
        }
        info!("timetable record {id} set to {status}");
        Ok(())
    }

    pub fn count_entries(&self) -> TimetableResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {TIMETABLE_TABLE}"),
            [],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    fn initialize(&self) -> TimetableResult<()> {
        self.setup_migration_system()?;
        self.run_migrations()?;
        Ok(())
    }

    fn conn(&self) -> TimetableResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TimetableError::store("timetable connection mutex poisoned"))
    }
}

impl RecordStore for DuckDbStorage {
    fn insert_entry(
        &self,
        entry: &NewTimetableEntry,
        status: RecordStatus,
    ) -> TimetableResult<EntryId> {
        let date = format_date(entry.date)?;
        let time = format_time(entry.time)?;

        let conn = self.conn()?;
        let id: i64 = conn.query_row(&format!("SELECT nextval('{ID_SEQUENCE}')"), [], |row| {
            row.get(0)
        })?;

        conn.execute(
            &format!(
                "INSERT INTO {TIMETABLE_TABLE} (
                    id, client_surname, appointment_date, appointment_time, doctor_id, status
                ) VALUES (?, ?, CAST(? AS DATE), CAST(? AS TIME), ?, ?)"
            ),
            params![
                id,
                entry.client_surname,
                date,
                time,
                entry.doctor_id,
                status.as_str()
            ],
        )?;

        Ok(id)
    }

    fn select_entries(&self, query: &TimetableQuery) -> TimetableResult<Vec<TimetableEntry>> {
        let statement = query.to_statement();
        debug!("{} -- params {:?}", statement.sql, statement.params);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&statement.sql)?;
        let rows = stmt.query_map(params_from_iter(statement.params.iter().copied()), |row| {
            Ok(TimetableRow {
                id: row.get(0)?,
                client_surname: row.get(1)?,
                date: row.get(2)?,
                time: row.get(3)?,
                doctor_id: row.get(4)?,
                status: row.get(5)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(TimetableEntry::try_from(row?)?);
        }

        Ok(entries)
    }
}

/// DuckDB dates are four-digit years only.
fn format_date(date: NaiveDate) -> TimetableResult<String> {
    if !(1..=9999).contains(&date.year()) {
        return Err(TimetableError::UnsupportedValue(format!(
            "date {date} is outside years 1..=9999"
        )));
    }
    Ok(date.format("%Y-%m-%d").to_string())
}

/// DuckDB times hold microseconds and no leap second.
fn format_time(time: NaiveTime) -> TimetableResult<String> {
    let nanos = time.nanosecond();
    if nanos >= 1_000_000_000 || nanos % 1_000 != 0 {
        return Err(TimetableError::UnsupportedValue(format!(
            "time {time} is finer than microsecond precision"
        )));
    }
    Ok(time.format("%H:%M:%S%.6f").to_string())
}

/// Raw column values of one timetable row, before validation.
struct TimetableRow {
    id: i64,
    client_surname: String,
    date: String,
    time: String,
    doctor_id: i64,
    status: String,
}

impl TryFrom<TimetableRow> for TimetableEntry {
    type Error = TimetableError;

    fn try_from(row: TimetableRow) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
            TimetableError::MalformedRow(format!("record {}: date '{}': {e}", row.id, row.date))
        })?;
        let time = NaiveTime::parse_from_str(&row.time, "%H:%M:%S%.f").map_err(|e| {
            TimetableError::MalformedRow(format!("record {}: time '{}': {e}", row.id, row.time))
        })?;
        let status = row.status.parse::<RecordStatus>()?;

        Ok(TimetableEntry {
            id: row.id,
            client_surname: row.client_surname,
            date,
            time,
            doctor_id: row.doctor_id,
            status,
        })
    }
}

impl DuckDbStorage {
    fn setup_migration_system(&self) -> TimetableResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        )?;
        Ok(())
    }

    fn run_migrations(&self) -> TimetableResult<()> {
        let migrations = discover_migrations(&migrations_dir())?;
        let applied = self.get_applied_migrations()?;

        for (version, name, sql_content) in migrations {
            if !applied.contains(&version) {
                self.apply_migration(version, &name, &sql_content)?;
                info!("applied migration {name}");
            }
        }

        Ok(())
    }

    fn get_applied_migrations(&self) -> TimetableResult<HashSet<i32>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT version FROM migrations ORDER BY version")?;

        let rows = stmt.query_map([], |row| row.get::<_, i32>(0))?;

        let mut applied = HashSet::new();
        for version in rows {
            applied.insert(version?);
        }

        Ok(applied)
    }

    fn apply_migration(&self, version: i32, name: &str, sql_content: &str) -> TimetableResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(sql_content)
            .map_err(|e| TimetableError::Migration {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        conn.execute(
            "INSERT INTO migrations (version, name) VALUES (?, ?)",
            params![version, name],
        )?;

        Ok(())
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Collect `NNN_name.sql` files, sorted by version.
fn discover_migrations(dir: &Path) -> TimetableResult<Vec<(i32, String, String)>> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let read_error = |name: &str, e: std::io::Error| TimetableError::Migration {
        name: name.to_string(),
        reason: e.to_string(),
    };

    let mut migrations = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| read_error(&dir.display().to_string(), e))?;

    for entry in entries {
        let path = entry.map_err(|e| read_error(&dir.display().to_string(), e))?.path();

        if path.extension().and_then(|s| s.to_str()) != Some("sql") {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(version) = filename
            .split('_')
            .next()
            .and_then(|v| v.parse::<i32>().ok())
        else {
            continue;
        };

        let name = filename.strip_suffix(".sql").unwrap_or(filename).to_string();
        let content = fs::read_to_string(&path).map_err(|e| read_error(&name, e))?;
        migrations.push((version, name, content));
    }

    migrations.sort_by_key(|(version, _, _)| *version);
    Ok(migrations)
}
