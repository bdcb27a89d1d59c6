//! Menu choices and the prompts each command asks.
//!
//! Everything here is pure parsing so the menus can be tested without a
//! terminal.

use std::num::IntErrorKind;

use salarydb_core::UpdateColumn;

/// Prompts for the nine user-supplied fields of a new record, in table order.
pub const CREATE_PROMPTS: [&str; 9] = [
    "Company: ",
    "Title: ",
    "Level: ",
    "Total Pay: ",
    "Base Salary: ",
    "Bonus: ",
    "Location: ",
    "Years of Experience: ",
    "Years at Company: ",
];

/// Prompts for the four fields that select rows to update or delete.
pub const MATCH_PROMPTS: [&str; 4] = [
    "Company: ",
    "Job Title: ",
    "Level in Company: ",
    "Total Yearly Pay: ",
];

/// A top-level menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    /// Leave the program.
    Exit,
    /// Show every record.
    ViewAll,
    /// Open the query submenu.
    Queries,
    /// Create a record.
    Create,
    /// Update matching records.
    Update,
    /// Delete matching records.
    Delete,
}

impl MainChoice {
    /// Choices indexed by their menu key.
    const BY_KEY: [MainChoice; 6] = [
        MainChoice::Exit,
        MainChoice::ViewAll,
        MainChoice::Queries,
        MainChoice::Create,
        MainChoice::Update,
        MainChoice::Delete,
    ];

    /// Parses a menu key.
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().parse::<usize>().ok()?;
        Self::BY_KEY.get(key).copied()
    }
}

/// Answer to "display all or some of the results?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitChoice {
    /// Show everything.
    All,
    /// Ask for a row count.
    Partial,
}

impl LimitChoice {
    /// Parses `A`/`ALL` or `S`/`SOME`, ignoring case.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "A" | "ALL" => Some(LimitChoice::All),
            "S" | "SOME" => Some(LimitChoice::Partial),
            _ => None,
        }
    }
}

/// Parses a positive row count; counts too large to represent mean "all".
pub fn parse_count(input: &str) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    }
}

/// Parses the update menu's 1-based column choice.
pub fn parse_update_column(input: &str) -> Option<UpdateColumn> {
    let key = input.trim().parse::<usize>().ok()?;
    key.checked_sub(1)
        .and_then(|idx| UpdateColumn::ALL.get(idx))
        .copied()
}
