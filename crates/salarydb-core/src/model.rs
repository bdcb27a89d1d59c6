//! Row types for the job table.
//!
//! Survey data is messy: numeric columns regularly carry artifacts such as
//! `"1.5"`, `""` or `"n/a"`. Numeric cells are therefore held as [`Numeric`],
//! which keeps whatever the source provided instead of rejecting the row.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Serialize, Serializer};

/// Number of columns in the job table.
pub const FIELD_COUNT: usize = 10;

/// A column of the job table, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Employer name.
    Company,
    /// Job title.
    Title,
    /// Level within the company.
    Level,
    /// Total yearly compensation.
    TotalYearlyCompensation,
    /// Base salary.
    BaseSalary,
    /// Bonus.
    Bonus,
    /// Location, e.g. `Seattle, WA`.
    Location,
    /// Total years of experience.
    YearsOfExperience,
    /// Years at the current company.
    YearsAtCompany,
    /// Submission time as free text.
    Timestamp,
}

impl Column {
    /// All columns in table order.
    pub const ALL: [Column; FIELD_COUNT] = [
        Column::Company,
        Column::Title,
        Column::Level,
        Column::TotalYearlyCompensation,
        Column::BaseSalary,
        Column::Bonus,
        Column::Location,
        Column::YearsOfExperience,
        Column::YearsAtCompany,
        Column::Timestamp,
    ];

    /// Returns the column identifier used both in SQL and in input headers.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Company => "company",
            Column::Title => "title",
            Column::Level => "level",
            Column::TotalYearlyCompensation => "totalyearlycompensation",
            Column::BaseSalary => "basesalary",
            Column::Bonus => "bonus",
            Column::Location => "location",
            Column::YearsOfExperience => "yearsofexperience",
            Column::YearsAtCompany => "yearsatcompany",
            Column::Timestamp => "timestamp",
        }
    }

    /// Returns true for columns declared with integer affinity.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Column::TotalYearlyCompensation
                | Column::BaseSalary
                | Column::Bonus
                | Column::YearsOfExperience
                | Column::YearsAtCompany
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric cell that may not actually be numeric.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    /// Whole number.
    Integer(i64),
    /// Fractional number, e.g. `1.5` years of experience.
    Real(f64),
    /// Anything that did not parse, kept verbatim.
    Text(String),
}

impl Numeric {
    /// Interprets raw text the way the store's integer affinity would.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Numeric::Integer(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Numeric::Real(f),
            _ => Numeric::Text(raw.to_string()),
        }
    }

    /// Returns the value as a float, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Integer(i) => Some(*i as f64),
            Numeric::Real(f) => Some(*f),
            Numeric::Text(_) => None,
        }
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::Text(String::new())
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Integer(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Numeric::parse(value)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(i) => write!(f, "{}", i),
            Numeric::Real(v) => write!(f, "{}", v),
            Numeric::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Numeric::Integer(i) => serializer.serialize_i64(*i),
            Numeric::Real(f) => serializer.serialize_f64(*f),
            Numeric::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl ToSql for Numeric {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Numeric::Integer(i) => ToSqlOutput::from(*i),
            Numeric::Real(f) => ToSqlOutput::from(*f),
            Numeric::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

impl FromSql for Numeric {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Numeric::default()),
            ValueRef::Integer(i) => Ok(Numeric::Integer(i)),
            ValueRef::Real(f) => Ok(Numeric::Real(f)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| Numeric::Text(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// One compensation-survey entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct JobRecord {
    /// Employer name.
    pub company: String,
    /// Job title.
    pub title: String,
    /// Level within the company.
    pub level: String,
    /// Total yearly compensation.
    #[serde(rename = "totalyearlycompensation")]
    pub total_yearly_compensation: Numeric,
    /// Base salary.
    #[serde(rename = "basesalary")]
    pub base_salary: Numeric,
    /// Bonus.
    pub bonus: Numeric,
    /// Location.
    pub location: String,
    /// Total years of experience.
    #[serde(rename = "yearsofexperience")]
    pub years_of_experience: Numeric,
    /// Years at the current company.
    #[serde(rename = "yearsatcompany")]
    pub years_at_company: Numeric,
    /// Submission time as free text.
    pub timestamp: String,
}

impl JobRecord {
    /// Builds a record from raw cells given in [`Column::ALL`] order.
    pub fn from_text(cells: &[&str; FIELD_COUNT]) -> Self {
        Self {
            company: cells[0].to_string(),
            title: cells[1].to_string(),
            level: cells[2].to_string(),
            total_yearly_compensation: Numeric::parse(cells[3]),
            base_salary: Numeric::parse(cells[4]),
            bonus: Numeric::parse(cells[5]),
            location: cells[6].to_string(),
            years_of_experience: Numeric::parse(cells[7]),
            years_at_company: Numeric::parse(cells[8]),
            timestamp: cells[9].to_string(),
        }
    }
}

/// Identifies the rows an update or delete applies to.
///
/// The composite is not unique; every row that matches is affected.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCriteria {
    /// Company to match exactly.
    pub company: String,
    /// Title to match exactly.
    pub title: String,
    /// Level to match exactly.
    pub level: String,
    /// Total yearly compensation to match.
    pub total_pay: Numeric,
}

impl MatchCriteria {
    /// Creates a new set of match criteria.
    pub fn new(
        company: impl Into<String>,
        title: impl Into<String>,
        level: impl Into<String>,
        total_pay: impl Into<Numeric>,
    ) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            level: level.into(),
            total_pay: total_pay.into(),
        }
    }
}
