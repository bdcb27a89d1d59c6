//! Delimited-file importer.
//!
//! Reads a header row, locates the ten job columns by name (extra columns are
//! ignored) and yields one [`JobRecord`] per data row in file order. Cell
//! contents are not validated; numeric columns keep whatever text they hold.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::model::{Column, JobRecord, FIELD_COUNT};

/// Reads job records from delimited text.
#[derive(Debug, Clone)]
pub struct Importer {
    delimiter: u8,
}

impl Default for Importer {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl Importer {
    /// Creates an importer for comma-separated input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads every record from the file at `path`.
    pub fn read_path(&self, path: impl AsRef<Path>) -> CoreResult<Vec<JobRecord>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let records = self.read_from(file, path)?;
        info!("read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Reads every record from `reader`; `source` names it in error messages.
    pub fn read_from<R: Read>(&self, reader: R, source: impl Into<PathBuf>) -> CoreResult<Vec<JobRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(reader);

        let positions = locate_columns(reader.headers()?, source.into())?;
        debug!("column positions {:?}", positions);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let cells: [&str; FIELD_COUNT] =
                std::array::from_fn(|i| row.get(positions[i]).unwrap_or(""));
            records.push(JobRecord::from_text(&cells));
        }
        Ok(records)
    }
}

/// Maps each job column to its index in the header row.
fn locate_columns(headers: &StringRecord, source: PathBuf) -> CoreResult<[usize; FIELD_COUNT]> {
    let mut positions = [0usize; FIELD_COUNT];
    let mut missing = Vec::new();

    for (slot, column) in Column::ALL.iter().enumerate() {
        let found = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(column.name()));
        match found {
            Some(idx) => positions[slot] = idx,
            None => missing.push(column.name().to_string()),
        }
    }

    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(CoreError::MalformedInput {
            path: source,
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Numeric;

    const HEADER: &str = "timestamp,company,level,title,totalyearlycompensation,location,\
                          yearsofexperience,yearsatcompany,tag,basesalary,stockgrantvalue,bonus";

    #[test]
    fn test_reads_rows_in_file_order() {
        let data = format!(
            "{HEADER}\n\
             6/7/2017 11:33:27,Oracle,L3,Product Manager,127000,\"Redwood City, CA\",1.5,1.5,,107000,20000,10000\n\
             6/10/2017 17:11:29,eBay,SE 2,Software Engineer,100000,\"San Francisco, CA\",5,3,,0,0,0\n"
        );
        let records = Importer::new().read_from(data.as_bytes(), "inline").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company, "Oracle");
        assert_eq!(records[0].title, "Product Manager");
        assert_eq!(records[0].location, "Redwood City, CA");
        assert_eq!(records[0].years_of_experience, Numeric::Real(1.5));
        assert_eq!(records[0].bonus, Numeric::Integer(10000));
        assert_eq!(records[1].company, "eBay");
        assert_eq!(records[1].timestamp, "6/10/2017 17:11:29");
    }

    #[test]
    fn test_missing_headers_are_reported() {
        let data = "company,title,level\nApple,SWE,ICT3\n";
        let err = Importer::new()
            .read_from(data.as_bytes(), "short.csv")
            .unwrap_err();
        match err {
            CoreError::MalformedInput { path, missing } => {
                assert_eq!(path, PathBuf::from("short.csv"));
                assert!(missing.contains(&"totalyearlycompensation".to_string()));
                assert!(missing.contains(&"timestamp".to_string()));
                assert!(!missing.contains(&"company".to_string()));
            }
            other => panic!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_header_match_ignores_case_and_padding() {
        let data = "Company, Title ,LEVEL,TotalYearlyCompensation,basesalary,bonus,location,\
                    yearsofexperience,yearsatcompany,timestamp\n\
                    Apple,SWE,ICT3,200000,150000,20000,\"Austin, TX\",2,1,2020-01-01\n";
        let records = Importer::new().read_from(data.as_bytes(), "mixed").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "SWE");
    }

    #[test]
    fn test_short_rows_yield_empty_cells() {
        let data = "company,title,level,totalyearlycompensation,basesalary,bonus,location,\
                    yearsofexperience,yearsatcompany,timestamp\n\
                    Apple,SWE,ICT3,200000\n";
        let records = Importer::new().read_from(data.as_bytes(), "short").unwrap();
        assert_eq!(records[0].total_yearly_compensation, Numeric::Integer(200000));
        assert_eq!(records[0].location, "");
        assert_eq!(records[0].timestamp, "");
    }

    #[test]
    fn test_custom_delimiter() {
        let data = "company;title;level;totalyearlycompensation;basesalary;bonus;location;\
                    yearsofexperience;yearsatcompany;timestamp\n\
                    Apple;SWE;ICT3;200000;150000;20000;Austin, TX;2;1;2020-01-01\n";
        let records = Importer::new()
            .delimiter(b';')
            .read_from(data.as_bytes(), "semi")
            .unwrap();
        assert_eq!(records[0].location, "Austin, TX");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Importer::new().read_path("/nonexistent/salary_data.csv").unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
