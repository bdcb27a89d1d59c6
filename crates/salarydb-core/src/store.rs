//! SQLite-backed record store.
//!
//! All values reach SQLite as bound parameters. Identifiers that vary between
//! statements (sort, filter and update columns) are drawn from closed enums
//! and are never built from user text.
//!
//! Row order for equal sort keys is whatever SQLite returns and must not be
//! relied upon. Non-numeric artifacts in numeric columns sort after every
//! number, so they lead a descending listing.

use std::fmt;
use std::path::Path;

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Params, Row};
use tracing::{debug, info};

use crate::error::CoreResult;
use crate::model::{Column, JobRecord, MatchCriteria, Numeric, FIELD_COUNT};

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS job (
        company text,
        title text,
        level text,
        totalyearlycompensation integer,
        basesalary integer,
        bonus integer,
        location text,
        yearsofexperience integer,
        yearsatcompany integer,
        timestamp text
    );";

const SELECT_COLUMNS: &str = "company, title, level, totalyearlycompensation, basesalary, \
                              bonus, location, yearsofexperience, yearsatcompany, timestamp";

const INSERT: &str = "
    INSERT INTO job (company, title, level, totalyearlycompensation, basesalary,
                     bonus, location, yearsofexperience, yearsatcompany, timestamp)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const MATCH_CLAUSE: &str = "company = ?1 AND title = ?2 AND level = ?3 \
                            AND totalyearlycompensation = ?4";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Columns a "top paid" query can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    /// Filter by company.
    Company,
    /// Filter by location.
    Location,
    /// Filter by job title.
    Title,
}

impl FilterColumn {
    /// Returns the underlying table column.
    pub fn column(&self) -> Column {
        match self {
            FilterColumn::Company => Column::Company,
            FilterColumn::Location => Column::Location,
            FilterColumn::Title => Column::Title,
        }
    }
}

/// Columns the update command may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateColumn {
    /// Level within the company.
    Level,
    /// Total yearly compensation.
    TotalYearlyCompensation,
    /// Bonus.
    Bonus,
    /// Location.
    Location,
}

impl UpdateColumn {
    /// Updatable columns in menu order.
    pub const ALL: [UpdateColumn; 4] = [
        UpdateColumn::Level,
        UpdateColumn::TotalYearlyCompensation,
        UpdateColumn::Bonus,
        UpdateColumn::Location,
    ];

    /// Returns the underlying table column.
    pub fn column(&self) -> Column {
        match self {
            UpdateColumn::Level => Column::Level,
            UpdateColumn::TotalYearlyCompensation => Column::TotalYearlyCompensation,
            UpdateColumn::Bonus => Column::Bonus,
            UpdateColumn::Location => Column::Location,
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            UpdateColumn::Level => "Level",
            UpdateColumn::TotalYearlyCompensation => "Total Pay",
            UpdateColumn::Bonus => "Bonus",
            UpdateColumn::Location => "Location",
        }
    }
}

/// The job table in an embedded SQLite database.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Opens (creating if absent) a store file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("opened record store at {}", path.display());
        let store = Self { conn };
        store.create_schema()?;
        Ok(store)
    }

    /// Opens a store that lives only as long as the process.
    pub fn open_in_memory() -> CoreResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Creates the job table if it does not already exist.
    pub fn create_schema(&self) -> CoreResult<()> {
        self.conn.execute_batch(CREATE_TABLE)?;
        Ok(())
    }

    /// Appends every record in a single transaction.
    ///
    /// Returns the number of records written.
    pub fn bulk_insert(&mut self, records: &[JobRecord]) -> CoreResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT)?;
            for record in records {
                stmt.execute(&record_params(record)[..])?;
            }
        }
        tx.commit()?;
        info!("inserted {} records", records.len());
        Ok(records.len())
    }

    /// Appends one record.
    pub fn insert(&self, record: &JobRecord) -> CoreResult<()> {
        debug!("insert company={:?} title={:?}", record.company, record.title);
        self.conn.execute(INSERT, &record_params(record)[..])?;
        Ok(())
    }

    /// Returns every stored record.
    pub fn select_all(&self) -> CoreResult<Vec<JobRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM job");
        self.query(&sql, [])
    }

    /// Returns every stored record sorted by one column.
    pub fn select_ordered(&self, column: Column, order: SortOrder) -> CoreResult<Vec<JobRecord>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM job ORDER BY {} {}",
            column.name(),
            order.as_sql()
        );
        self.query(&sql, [])
    }

    /// Returns records whose column equals `value`, highest paid first.
    pub fn select_where(&self, column: FilterColumn, value: &str) -> CoreResult<Vec<JobRecord>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM job WHERE {} = ?1 \
             ORDER BY totalyearlycompensation DESC",
            column.column().name()
        );
        self.query(&sql, params![value])
    }

    /// Sets one column on every row matching the criteria.
    ///
    /// Returns the number of rows changed, which may be zero.
    pub fn update_where(
        &self,
        column: UpdateColumn,
        new_value: &str,
        criteria: &MatchCriteria,
    ) -> CoreResult<usize> {
        let value: Box<dyn ToSql> = if column.column().is_numeric() {
            Box::new(Numeric::parse(new_value))
        } else {
            Box::new(new_value.to_string())
        };
        let sql = format!(
            "UPDATE job SET {} = ?5 WHERE {MATCH_CLAUSE}",
            column.column().name()
        );
        debug!("{}", sql);
        let changed = self.conn.execute(
            &sql,
            params![
                criteria.company,
                criteria.title,
                criteria.level,
                criteria.total_pay,
                value
            ],
        )?;
        debug!("updated {} rows", changed);
        Ok(changed)
    }

    /// Deletes every row matching the criteria.
    ///
    /// Returns the number of rows removed, which may be zero.
    pub fn delete_where(&self, criteria: &MatchCriteria) -> CoreResult<usize> {
        let sql = format!("DELETE FROM job WHERE {MATCH_CLAUSE}");
        let removed = self.conn.execute(
            &sql,
            params![
                criteria.company,
                criteria.title,
                criteria.level,
                criteria.total_pay
            ],
        )?;
        debug!("deleted {} rows", removed);
        Ok(removed)
    }

    /// Returns the number of stored rows.
    pub fn count(&self) -> CoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM job", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Closes the connection, flushing anything SQLite still holds.
    pub fn close(self) -> CoreResult<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        info!("closed record store");
        Ok(())
    }

    fn query<P: Params>(&self, sql: &str, params: P) -> CoreResult<Vec<JobRecord>> {
        debug!("{}", sql);
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn record_params(record: &JobRecord) -> [&dyn ToSql; FIELD_COUNT] {
    [
        &record.company,
        &record.title,
        &record.level,
        &record.total_yearly_compensation,
        &record.base_salary,
        &record.bonus,
        &record.location,
        &record.years_of_experience,
        &record.years_at_company,
        &record.timestamp,
    ]
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        company: text(row, 0)?,
        title: text(row, 1)?,
        level: text(row, 2)?,
        total_yearly_compensation: row.get(3)?,
        base_salary: row.get(4)?,
        bonus: row.get(5)?,
        location: text(row, 6)?,
        years_of_experience: row.get(7)?,
        years_at_company: row.get(8)?,
        timestamp: text(row, 9)?,
    })
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}
