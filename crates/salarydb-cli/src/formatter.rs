//! Output formatting for records and menus.
//!
//! Supports a fixed-width table, JSON, and CSV.

use serde::{Deserialize, Serialize};

use salarydb_core::model::Column;
use salarydb_core::{JobRecord, QueryCatalog, UpdateColumn};

/// Width of the right-aligned numeric columns.
const NUMERIC_WIDTH: usize = 8;

/// Inner width of the boxed menus.
const MENU_WIDTH: usize = 28;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width table output.
    #[default]
    Table,
    /// JSON output.
    Json,
    /// CSV output.
    Csv,
}

/// How many rows of a result to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    /// Every row.
    All,
    /// At most this many rows from the front.
    First(usize),
}

impl RowLimit {
    /// Returns the leading rows this limit allows.
    pub fn apply<'a>(&self, records: &'a [JobRecord]) -> &'a [JobRecord] {
        match self {
            RowLimit::All => records,
            RowLimit::First(n) => &records[..records.len().min(*n)],
        }
    }
}

/// Formats records according to the specified format.
pub fn format_records(records: &[JobRecord], format: OutputFormat, width: usize) -> String {
    match format {
        OutputFormat::Table => format_table(records, width),
        OutputFormat::Json => format_json(records),
        OutputFormat::Csv => format_csv(records),
    }
}

/// Formats records as a fixed-width table with the header repeated as a footer.
fn format_table(records: &[JobRecord], width: usize) -> String {
    let text_rule = "-".repeat(width + 4);
    let num_rule = "-".repeat(NUMERIC_WIDTH + 4);
    let separator = format!(
        "|{t}|{t}|{t}|{n}|{n}|{n}|{t}|",
        t = text_rule,
        n = num_rule
    );
    let banner = "=".repeat(separator.chars().count());
    let header = table_line(
        ["Company", "Title", "Level", "TotalPay", "Salary", "Bonus", "Location"],
        width,
    );

    let mut output = String::new();
    for line in [&banner, &header, &separator] {
        output.push_str(line);
        output.push('\n');
    }

    for record in records {
        let pay = record.total_yearly_compensation.to_string();
        let salary = record.base_salary.to_string();
        let bonus = record.bonus.to_string();
        let company = truncate(&record.company, width);
        let title = truncate(&record.title, width);
        let level = truncate(&record.level, width);
        let location = truncate(&record.location, width);
        output.push_str(&table_line(
            [
                company.as_str(),
                title.as_str(),
                level.as_str(),
                pay.as_str(),
                salary.as_str(),
                bonus.as_str(),
                location.as_str(),
            ],
            width,
        ));
        output.push('\n');
    }

    for line in [&separator, &header, &banner] {
        output.push_str(line);
        output.push('\n');
    }
    output
}

fn table_line(cells: [&str; 7], width: usize) -> String {
    format!(
        "|  {:<w$}  |  {:<w$}  |  {:<w$}  |  {:>n$}  |  {:>n$}  |  {:>n$}  |  {:<w$}  |",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        cells[4],
        cells[5],
        cells[6],
        w = width,
        n = NUMERIC_WIDTH
    )
}

/// Cuts a value down to at most `width` characters.
fn truncate(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

/// Formats records as JSON.
fn format_json(records: &[JobRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

/// Formats records as CSV.
fn format_csv(records: &[JobRecord]) -> String {
    let mut output = String::new();

    let header: Vec<&str> = Column::ALL.iter().map(Column::name).collect();
    output.push_str(&header.join(","));
    output.push('\n');

    for record in records {
        let values = [
            escape_csv(&record.company),
            escape_csv(&record.title),
            escape_csv(&record.level),
            escape_csv(&record.total_yearly_compensation.to_string()),
            escape_csv(&record.base_salary.to_string()),
            escape_csv(&record.bonus.to_string()),
            escape_csv(&record.location),
            escape_csv(&record.years_of_experience.to_string()),
            escape_csv(&record.years_at_company.to_string()),
            escape_csv(&record.timestamp),
        ];
        output.push_str(&values.join(","));
        output.push('\n');
    }

    output
}

/// Escapes a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Describes the result of an update or delete.
pub fn format_outcome(verb: &str, rows: usize) -> String {
    match rows {
        0 => format!("No records matched; 0 rows {}.", verb),
        1 => format!("1 row {}.", verb),
        n => format!("{} rows {}.", n, verb),
    }
}

/// Renders the top-level menu.
pub fn format_main_menu() -> String {
    [
        "",
        "           MENU",
        "/========================\\",
        "| 0) Exit                |",
        "| 1) View data           |",
        "| 2) Run a query         |",
        "| 3) Create a new record |",
        "| 4) Update a record     |",
        "| 5) Delete a record     |",
        "\\========================/",
        "",
    ]
    .join("\n")
}

/// Renders the welcome banner.
pub fn format_banner() -> String {
    [
        "",
        "/=========================================================================\\",
        "| Welcome to my Job/Salary Database! Pick a Number from the options below |",
        "\\=========================================================================/",
    ]
    .join("\n")
}

/// Renders the query submenu from the catalog, grouping entries by heading.
pub fn format_query_menu(catalog: &QueryCatalog) -> String {
    let blank = format!("|{}|", " ".repeat(MENU_WIDTH));
    let rule = format!("|{}|", "-".repeat(MENU_WIDTH));

    let mut lines = vec![
        format!("{:^w$}", "Pick a Query", w = MENU_WIDTH + 2),
        format!("/{}\\", "=".repeat(MENU_WIDTH)),
    ];
    let mut heading = "";
    for entry in catalog.entries() {
        if entry.heading != heading && !entry.heading.is_empty() {
            heading = entry.heading;
            lines.push(blank.clone());
            lines.push(format!("|{:^w$}|", heading, w = MENU_WIDTH));
            lines.push(rule.clone());
        }
        let key = format!("{}) ", entry.key);
        lines.extend(menu_item(&key, &entry.label));
    }
    lines.push(format!("\\{}/", "=".repeat(MENU_WIDTH)));
    lines.push(String::new());
    lines.join("\n")
}

/// Renders the column choices for the update command.
pub fn format_update_menu() -> String {
    let mut lines = vec!["What would you like to change?".to_string()];
    for (i, column) in UpdateColumn::ALL.iter().enumerate() {
        lines.push(format!("{}) {}", i + 1, column.label()));
    }
    lines.join("\n")
}

/// Lays out one menu entry, wrapping labels that overflow the box.
fn menu_item(key: &str, label: &str) -> Vec<String> {
    let room = MENU_WIDTH - 1 - key.len();
    let indent = " ".repeat(key.len());
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > room {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    lines.push(current);

    lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let prefix = if i == 0 { key } else { indent.as_str() };
            format!("| {:<w$}|", format!("{}{}", prefix, text), w = MENU_WIDTH - 1)
        })
        .collect()
}
