//! Interactive menu session for SalaryDB.
//!
//! A [`Session`] drives the main menu and the query submenu against a
//! borrowed [`RecordStore`]. Input arrives through a [`LineSource`], which is
//! a rustyline editor in the binary and a scripted queue in tests.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use thiserror::Error;
use tracing::{debug, warn};

use salarydb_core::model::FIELD_COUNT;
use salarydb_core::{
    CoreError, JobRecord, MatchCriteria, MenuAction, Query, QueryCatalog, RecordStore,
};

use crate::commands::{
    parse_count, parse_update_column, LimitChoice, MainChoice, CREATE_PROMPTS, MATCH_PROMPTS,
};
use crate::formatter::{self, OutputFormat, RowLimit};

/// The prompt shown when waiting for a menu choice.
const PROMPT: &str = "> ";

/// Errors that end or interrupt a menu flow.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input reached end-of-file.
    #[error("input closed")]
    InputClosed,

    /// A store or import operation failed; the session can continue.
    #[error(transparent)]
    Store(#[from] CoreError),

    /// The line editor failed.
    #[error("terminal error: {0}")]
    Terminal(String),

    /// Writing output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// A source of input lines.
pub trait LineSource {
    /// Reads one line after showing `prompt`; `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> SessionResult<Option<String>>;
}

/// Line source backed by a rustyline editor with persistent history.
pub struct Terminal {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl Terminal {
    /// Creates a terminal, loading history if the file exists.
    pub fn new(history_file: Option<PathBuf>, history_size: usize) -> Result<Self> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .max_history_size(history_size)?
            .build();

        let mut editor = DefaultEditor::with_config(rl_config)?;
        if let Some(ref path) = history_file {
            if path.exists() {
                let _ = editor.load_history(path);
            }
        }

        Ok(Self {
            editor,
            history_file,
        })
    }

    /// Saves command history.
    pub fn save_history(&mut self) {
        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = self.editor.save_history(path) {
                debug!("Failed to save history: {}", e);
            }
        }
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> SessionResult<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                Err(ReadlineError::Interrupted) => {
                    acknowledge_interrupt(&mut io::stderr());
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(SessionError::Terminal(e.to_string())),
            }
        }
    }
}

/// Echoes Ctrl-C; a closed stream is ignored.
fn acknowledge_interrupt(out: &mut dyn Write) {
    let _ = writeln!(out, "^C");
}

/// One interactive session over a record store.
pub struct Session<'a> {
    store: &'a RecordStore,
    input: &'a mut dyn LineSource,
    out: &'a mut dyn Write,
    catalog: QueryCatalog,
    format: OutputFormat,
    column_width: usize,
}

impl<'a> Session<'a> {
    /// Creates a session with table output and 20-character text columns.
    pub fn new(
        store: &'a RecordStore,
        input: &'a mut dyn LineSource,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            store,
            input,
            out,
            catalog: QueryCatalog::standard(),
            format: OutputFormat::Table,
            column_width: 20,
        }
    }

    /// Sets the output format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the display width of text columns.
    pub fn column_width(mut self, width: usize) -> Self {
        self.column_width = width;
        self
    }

    /// Prints the welcome banner.
    pub fn print_banner(&mut self) -> SessionResult<()> {
        writeln!(self.out, "{}", formatter::format_banner())?;
        Ok(())
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run(&mut self) -> SessionResult<()> {
        loop {
            writeln!(self.out, "{}", formatter::format_main_menu())?;
            let line = match self.ask(PROMPT) {
                Err(SessionError::InputClosed) => break,
                other => other?,
            };
            writeln!(self.out)?;

            let result = match MainChoice::parse(&line) {
                Some(MainChoice::Exit) => break,
                Some(MainChoice::ViewAll) => self.view_all(),
                Some(MainChoice::Queries) => self.query_menu(),
                Some(MainChoice::Create) => self.create_record(),
                Some(MainChoice::Update) => self.update_record(),
                Some(MainChoice::Delete) => self.delete_record(),
                None => {
                    self.invalid("Invalid input, pick from the numbers above")?;
                    continue;
                }
            };
            match self.recover(result) {
                Err(SessionError::InputClosed) => break,
                other => other?,
            }
        }

        writeln!(self.out, "Goodbye!")?;
        self.out.flush()?;
        Ok(())
    }

    /// Runs the query submenu until the user goes back.
    fn query_menu(&mut self) -> SessionResult<()> {
        loop {
            writeln!(self.out, "{}", formatter::format_query_menu(&self.catalog))?;
            let line = self.ask(PROMPT)?;
            writeln!(self.out)?;

            let action = match self.catalog.parse_choice(&line) {
                Some(entry) => entry.action.clone(),
                None => {
                    self.invalid("Invalid input, pick from the numbers above")?;
                    continue;
                }
            };

            let result = match action {
                MenuAction::Back => return Ok(()),
                MenuAction::Run(query) => self.run_query(&query),
                MenuAction::Custom(category) => {
                    let value = self.ask(category.prompt())?;
                    self.run_query(&Query::scoped(category, value))
                }
            };
            self.recover(result)?;
        }
    }

    fn view_all(&mut self) -> SessionResult<()> {
        let records = self.store.select_all()?;
        self.display(&records)
    }

    fn run_query(&mut self, query: &Query) -> SessionResult<()> {
        debug!("running query: {}", query);
        let records = query.run(self.store)?;
        self.display(&records)
    }

    fn create_record(&mut self) -> SessionResult<()> {
        writeln!(self.out, "Input information to create new record")?;
        let mut answers = Vec::with_capacity(FIELD_COUNT);
        for prompt in CREATE_PROMPTS {
            answers.push(self.ask(prompt)?);
        }
        answers.push(Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string());

        let cells: [&str; FIELD_COUNT] = std::array::from_fn(|i| answers[i].as_str());
        self.store.insert(&JobRecord::from_text(&cells))?;
        writeln!(self.out, "Record created!")?;
        Ok(())
    }

    fn update_record(&mut self) -> SessionResult<()> {
        writeln!(self.out, "Please fill out fields to find job to update")?;
        let criteria = self.ask_criteria()?;

        let column = loop {
            writeln!(self.out, "{}", formatter::format_update_menu())?;
            let line = self.ask(PROMPT)?;
            match parse_update_column(&line) {
                Some(column) => break column,
                None => self.invalid("Invalid input, pick from the numbers above")?,
            }
        };

        let new_value = self.ask("Enter the new value: ")?;
        let changed = self.store.update_where(column, &new_value, &criteria)?;
        writeln!(self.out, "{}", formatter::format_outcome("updated", changed))?;
        Ok(())
    }

    fn delete_record(&mut self) -> SessionResult<()> {
        writeln!(self.out, "Fill in fields to find the job to delete")?;
        let criteria = self.ask_criteria()?;
        let removed = self.store.delete_where(&criteria)?;
        writeln!(self.out, "{}", formatter::format_outcome("deleted", removed))?;
        Ok(())
    }

    fn ask_criteria(&mut self) -> SessionResult<MatchCriteria> {
        let [company, title, level, total_pay] = MATCH_PROMPTS;
        Ok(MatchCriteria::new(
            self.ask(company)?,
            self.ask(title)?,
            self.ask(level)?,
            self.ask(total_pay)?.as_str(),
        ))
    }

    /// Asks how many rows to show, then prints them.
    fn display(&mut self, records: &[JobRecord]) -> SessionResult<()> {
        let limit = self.ask_row_limit(records.len())?;
        let shown = limit.apply(records);

        writeln!(self.out, "\nRESULTS: ")?;
        write!(
            self.out,
            "{}",
            formatter::format_records(shown, self.format, self.column_width)
        )?;
        if self.format == OutputFormat::Table {
            writeln!(
                self.out,
                "({} row{})\n",
                shown.len(),
                if shown.len() == 1 { "" } else { "s" }
            )?;
        }
        Ok(())
    }

    fn ask_row_limit(&mut self, total: usize) -> SessionResult<RowLimit> {
        loop {
            writeln!(self.out, "Display all {} results? (A)", total)?;
            writeln!(self.out, "OR some of the results? (S)")?;
            let line = self.ask(PROMPT)?;

            match LimitChoice::parse(&line) {
                Some(LimitChoice::All) => return Ok(RowLimit::All),
                Some(LimitChoice::Partial) => {
                    writeln!(self.out, "How many records do you want to see?")?;
                    let line = self.ask(PROMPT)?;
                    match parse_count(&line) {
                        Some(n) => return Ok(RowLimit::First(n)),
                        None => self.invalid("Invalid input. Try putting in a positive number")?,
                    }
                }
                None => self.invalid("Invalid input, try again")?,
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> SessionResult<String> {
        self.out.flush()?;
        self.input
            .read_line(prompt)?
            .ok_or(SessionError::InputClosed)
    }

    fn invalid(&mut self, message: &str) -> SessionResult<()> {
        writeln!(self.out, "\n------> ERROR: {}\n", message)?;
        Ok(())
    }

    /// Reports store failures and lets the session continue.
    fn recover(&mut self, result: SessionResult<()>) -> SessionResult<()> {
        match result {
            Err(SessionError::Store(e)) => {
                warn!("command failed: {}", e);
                writeln!(self.out, "\n------> ERROR: {}\n", e)?;
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use salarydb_core::{FilterColumn, Numeric};

    #[derive(Debug, Default)]
    struct ScriptedInput {
        lines: VecDeque<String>,
    }

    impl ScriptedInput {
        fn new<I, S>(lines: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                lines: lines.into_iter().map(Into::into).collect(),
            }
        }
    }

    impl LineSource for ScriptedInput {
        fn read_line(&mut self, _prompt: &str) -> SessionResult<Option<String>> {
            Ok(self.lines.pop_front())
        }
    }

    fn seeded_store() -> RecordStore {
        let mut store = RecordStore::open_in_memory().unwrap();
        let row = |company: &str, title: &str, level: &str, pay: &str, location: &str| {
            JobRecord::from_text(&[
                company, title, level, pay, "100000", "10000", location, "3", "1", "2021-01-01",
            ])
        };
        store
            .bulk_insert(&[
                row("Apple", "Software Engineer", "ICT3", "200000", "Cupertino, CA"),
                row("Apple", "Software Engineer", "ICT4", "260000", "Cupertino, CA"),
                row("Google", "Product Manager", "L5", "320000", "Seattle, WA"),
                row("Acme", "Engineer", "L3", "150000", "Boise, ID"),
                row("Acme", "Engineer", "L3", "150000", "Boise, ID"),
            ])
            .unwrap();
        store
    }

    fn run_script(store: &RecordStore, lines: &[&str]) -> String {
        let mut input = ScriptedInput::new(lines.iter().copied());
        let mut out = Vec::new();
        Session::new(store, &mut input, &mut out).run().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_immediately() {
        let store = seeded_store();
        let output = run_script(&store, &["0"]);
        assert!(output.contains("| 0) Exit"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let store = seeded_store();
        let output = run_script(&store, &["3", "Acme"]);
        assert!(output.contains("Goodbye!"));
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn test_invalid_choices_reprompt() {
        let store = seeded_store();
        let output = run_script(&store, &["x", "9", "0"]);
        assert_eq!(output.matches("ERROR: Invalid input").count(), 2);
        assert_eq!(output.matches("| 0) Exit").count(), 3);
    }

    #[test]
    fn test_view_all_first_n() {
        let store = seeded_store();
        let output = run_script(&store, &["1", "S", "2", "0"]);
        assert!(output.contains("Display all 5 results? (A)"));
        assert!(output.contains("(2 rows)"));
    }

    #[test]
    fn test_oversized_count_shows_everything() {
        let store = seeded_store();
        let output = run_script(&store, &["1", "S", "99999999999999999999", "0"]);
        assert!(!output.contains("positive number"));
        assert!(output.contains("(5 rows)"));
    }

    #[test]
    fn test_invalid_count_reprompts() {
        let store = seeded_store();
        let output = run_script(&store, &["1", "S", "zero", "S", "0", "A", "0"]);
        assert_eq!(output.matches("Try putting in a positive number").count(), 2);
        assert!(output.contains("(5 rows)"));
    }

    #[test]
    fn test_query_submenu_custom_company() {
        let store = seeded_store();
        let output = run_script(&store, &["2", "8", "Apple", "A", "0", "0"]);
        assert!(output.contains("Pick a Query"));
        assert!(output.contains("Display all 2 results? (A)"));
        let first = output.find("ICT4").unwrap();
        let second = output.find("ICT3").unwrap();
        assert!(first < second);
        assert!(output.contains("(2 rows)"));
    }

    #[test]
    fn test_query_submenu_rejects_out_of_range() {
        let store = seeded_store();
        let output = run_script(&store, &["2", "21", "0", "0"]);
        assert_eq!(output.matches("ERROR: Invalid input").count(), 1);
        assert_eq!(output.matches("Pick a Query").count(), 2);
    }

    #[test]
    fn test_create_with_quote_then_view() {
        let store = seeded_store();
        let output = run_script(
            &store,
            &[
                "3",
                "O'Reilly Co",
                "Editor",
                "Senior",
                "120000",
                "100000",
                "5000",
                "Sebastopol, CA",
                "7",
                "3",
                "1",
                "A",
                "0",
            ],
        );
        assert!(output.contains("Record created!"));
        assert!(output.contains("O'Reilly Co"));

        let created = store
            .select_where(FilterColumn::Company, "O'Reilly Co")
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].bonus, Numeric::Integer(5000));
        assert!(!created[0].timestamp.is_empty());
    }

    #[test]
    fn test_update_reports_every_match() {
        let store = seeded_store();
        let output = run_script(
            &store,
            &["4", "Acme", "Engineer", "L3", "150000", "7", "3", "5000", "0"],
        );
        assert!(output.contains("2 rows updated."));
        assert_eq!(output.matches("ERROR: Invalid input").count(), 1);

        let acme = store.select_where(FilterColumn::Company, "Acme").unwrap();
        assert!(acme.iter().all(|r| r.bonus == Numeric::Integer(5000)));
        let apple = store.select_where(FilterColumn::Company, "Apple").unwrap();
        assert!(apple.iter().all(|r| r.bonus == Numeric::Integer(10000)));
    }

    #[test]
    fn test_update_zero_matches() {
        let store = seeded_store();
        let output = run_script(
            &store,
            &["4", "Acme", "Engineer", "L9", "150000", "3", "5000", "0"],
        );
        assert!(output.contains("No records matched; 0 rows updated."));
    }

    #[test]
    fn test_delete_and_missing_delete() {
        let store = seeded_store();
        let output = run_script(
            &store,
            &[
                "5", "Google", "Product Manager", "L5", "320000", "5", "Google",
                "Product Manager", "L5", "320000", "0",
            ],
        );
        assert!(output.contains("1 row deleted."));
        assert!(output.contains("No records matched; 0 rows deleted."));
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn test_json_output() {
        let store = seeded_store();
        let mut input = ScriptedInput::new(["2", "5", "A", "0", "0"]);
        let mut out = Vec::new();
        Session::new(&store, &mut input, &mut out)
            .format(OutputFormat::Json)
            .run()
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("\"company\": \"Google\""));
        assert!(!output.contains("(1 row)"));
    }

    #[test]
    fn test_store_failure_keeps_menu_running() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sql.db");
        let store = RecordStore::open(&path).unwrap();
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("DROP TABLE job;")
            .unwrap();

        let output = run_script(&store, &["1", "5", "Acme", "Engineer", "L3", "150000", "0"]);
        assert_eq!(output.matches("------> ERROR: store error").count(), 2);
        assert!(output.contains("no such table"));
        assert_eq!(output.matches("| 0) Exit").count(), 3);
        assert!(output.ends_with("Goodbye!\n"));
    }

    struct ClosedStream;

    impl Write for ClosedStream {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_interrupt_echo() {
        let mut out = Vec::new();
        acknowledge_interrupt(&mut out);
        assert_eq!(out, b"^C\n");

        acknowledge_interrupt(&mut ClosedStream);
    }

    #[test]
    fn test_store_errors_are_reported() {
        let store = seeded_store();
        let mut input = ScriptedInput::default();
        let mut out = Vec::new();
        let mut session = Session::new(&store, &mut input, &mut out);
        let failure = CoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        session.recover(Err(failure.into())).unwrap();
        assert!(session.recover(Err(SessionError::InputClosed)).is_err());
        drop(session);

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("------> ERROR: i/o error: disk full"));
    }
}
