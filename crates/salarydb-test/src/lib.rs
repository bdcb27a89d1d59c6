//! # salarydb-test
//!
//! Integration tests for SalaryDB.
//!
//! This crate contains:
//! - Fixtures for building survey files and seeded stores
//! - End-to-end import and store tests under `tests/`

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use salarydb_core::model::{Column, FIELD_COUNT};
use salarydb_core::{CoreResult, JobRecord, MatchCriteria, RecordStore};

/// Header line of a survey file, in table column order.
pub fn header() -> String {
    Column::ALL
        .iter()
        .map(Column::name)
        .collect::<Vec<_>>()
        .join(",")
}

/// A small survey with three companies, a duplicate Acme row and one quoted
/// location, given as raw cells.
pub fn sample_rows() -> Vec<[&'static str; FIELD_COUNT]> {
    vec![
        ["Apple", "Software Engineer", "ICT3", "200000", "150000", "20000", "Cupertino, CA", "3", "1", "2021-01-01 10:00:00"],
        ["Google", "Product Manager", "L5", "320000", "210000", "40000", "Seattle, WA", "8", "3", "2021-01-02 10:00:00"],
        ["Apple", "Software Engineer", "ICT4", "260000", "180000", "30000", "Cupertino, CA", "6", "2", "2021-01-03 10:00:00"],
        ["Acme", "Engineer", "L3", "150000", "130000", "10000", "Boise, ID", "2", "2", "2021-01-04 10:00:00"],
        ["Acme", "Engineer", "L3", "150000", "130000", "10000", "Boise, ID", "2", "2", "2021-01-05 10:00:00"],
        ["Microsoft", "Data Scientist", "62", "95000", "87500", "7500", "Arlington, VA", "1", "0", "2021-01-06 10:00:00"],
    ]
}

/// The sample rows as records.
pub fn sample_records() -> Vec<JobRecord> {
    sample_rows().iter().map(JobRecord::from_text).collect()
}

/// Renders rows as a comma-separated survey file, quoting cells that need it.
pub fn render_csv(rows: &[[&str; FIELD_COUNT]]) -> String {
    let mut out = header();
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                if cell.contains(',') || cell.contains('"') {
                    format!("\"{}\"", cell.replace('"', "\"\""))
                } else {
                    cell.to_string()
                }
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Writes rows to `dir/name` and returns the path.
pub fn write_csv(dir: &Path, name: &str, rows: &[[&str; FIELD_COUNT]]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, render_csv(rows))?;
    Ok(path)
}

/// Opens an in-memory store holding the sample records.
pub fn seeded_store() -> CoreResult<RecordStore> {
    let mut store = RecordStore::open_in_memory()?;
    store.bulk_insert(&sample_records())?;
    Ok(store)
}

/// Returns the total pay of each record as a float, in order.
pub fn pays(records: &[JobRecord]) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| r.total_yearly_compensation.as_f64())
        .collect()
}

/// Returns true if the store's update/delete match would select `record`.
///
/// Pay compares numerically, so `150000` and `150000.0` are the same value.
pub fn is_match(record: &JobRecord, criteria: &MatchCriteria) -> bool {
    let same_pay = match (
        record.total_yearly_compensation.as_f64(),
        criteria.total_pay.as_f64(),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => record.total_yearly_compensation == criteria.total_pay,
    };
    record.company == criteria.company
        && record.title == criteria.title
        && record.level == criteria.level
        && same_pay
}
