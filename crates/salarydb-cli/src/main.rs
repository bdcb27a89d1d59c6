//! SalaryDB command-line interface
//!
//! Imports a job/salary survey file into an embedded SQLite table and opens
//! an interactive menu over it.
//!
//! # Usage
//!
//! ```bash
//! # Import salary_data.csv into sql.db (if empty) and start the menu
//! salarydb
//!
//! # Use another database and data file, re-importing on every start
//! salarydb --db survey.db --data levels.csv --import always
//!
//! # Print query results as JSON
//! salarydb -o json
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use salarydb_core::{Importer, RecordStore};

mod commands;
mod config;
mod formatter;
mod repl;

use config::{CliConfig, ImportMode};
use formatter::OutputFormat;
use repl::{Session, Terminal};

/// SalaryDB command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "salarydb",
    version,
    about = "Interactive job/salary survey database",
    long_about = "Loads a job/salary survey CSV into a local SQLite database and offers\n\
                  a numbered menu to view, query, create, update and delete records."
)]
struct Args {
    /// SQLite database file
    #[arg(long = "db", value_name = "FILE", env = "SALARYDB_DATABASE")]
    database: Option<PathBuf>,

    /// Survey file imported at startup
    #[arg(long = "data", value_name = "FILE", env = "SALARYDB_DATA")]
    data_file: Option<PathBuf>,

    /// When to import the survey file
    #[arg(long = "import", value_enum)]
    import_mode: Option<ImportModeArg>,

    /// Output format for query results
    #[arg(short = 'o', long, value_enum)]
    output: Option<OutputFormatArg>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress the welcome banner
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Import policy argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImportModeArg {
    /// Append the survey file on every start
    Always,
    /// Import only into an empty table
    IfEmpty,
    /// Never import
    Never,
}

impl From<ImportModeArg> for ImportMode {
    fn from(arg: ImportModeArg) -> Self {
        match arg {
            ImportModeArg::Always => ImportMode::Always,
            ImportModeArg::IfEmpty => ImportMode::IfEmpty,
            ImportModeArg::Never => ImportMode::Never,
        }
    }
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display results in a fixed-width table
    Table,
    /// Display results as JSON
    Json,
    /// Display results as CSV
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = load_config(&args)?;
    debug!("configuration: {:?}", config);

    let mut store = RecordStore::open(&config.database_path)
        .with_context(|| format!("cannot open {}", config.database_path.display()))?;

    let outcome = start(&mut store, &config, args.quiet);
    store.close()?;
    outcome
}

/// Loads the survey file and runs the interactive session.
fn start(store: &mut RecordStore, config: &CliConfig, quiet: bool) -> Result<()> {
    load_initial_data(store, config)?;

    let mut terminal = Terminal::new(config.history_path(), config.history_size)?;
    let mut stdout = io::stdout();
    let mut session = Session::new(store, &mut terminal, &mut stdout)
        .format(config.output_format)
        .column_width(config.column_width);

    if !quiet {
        session.print_banner()?;
    }
    let outcome = session.run();
    terminal.save_history();
    outcome.map_err(Into::into)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("salarydb=debug,salarydb_core=debug")
    } else {
        EnvFilter::new("salarydb=warn,salarydb_core=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<CliConfig> {
    let mut config = if let Some(path) = &args.config {
        CliConfig::from_file(path)
            .with_context(|| format!("cannot read config {}", path.display()))?
    } else {
        CliConfig::load_default()?
    };

    // Command line arguments win over the file
    if let Some(db) = &args.database {
        config.database_path = db.clone();
    }
    if let Some(data) = &args.data_file {
        config.data_file = data.clone();
    }
    if let Some(mode) = args.import_mode {
        config.import_mode = mode.into();
    }
    if let Some(output) = args.output {
        config.output_format = output.into();
    }

    Ok(config)
}

/// Imports the survey file according to the configured policy.
fn load_initial_data(store: &mut RecordStore, config: &CliConfig) -> Result<()> {
    let import = match config.import_mode {
        ImportMode::Always => true,
        ImportMode::IfEmpty => store.count()? == 0,
        ImportMode::Never => false,
    };
    if !import {
        debug!("skipping import ({:?})", config.import_mode);
        return Ok(());
    }

    let records = Importer::new()
        .delimiter(config.delimiter_byte()?)
        .read_path(&config.data_file)
        .with_context(|| format!("cannot import {}", config.data_file.display()))?;
    let inserted = store.bulk_insert(&records)?;
    info!(
        "imported {} record(s) from {}",
        inserted,
        config.data_file.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const SURVEY: &str = "company,title,level,totalyearlycompensation,basesalary,bonus,\
                          location,yearsofexperience,yearsatcompany,timestamp\n\
                          Apple,Software Engineer,ICT3,200000,150000,20000,\"Cupertino, CA\",3,1,2021-01-01\n\
                          Acme,Engineer,L3,150000,130000,10000,\"Boise, ID\",2,2,2021-01-02\n";

    fn config_for(data_file: &Path, import_mode: ImportMode) -> CliConfig {
        CliConfig {
            data_file: data_file.to_path_buf(),
            import_mode,
            ..CliConfig::default()
        }
    }

    fn write_survey(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("salary_data.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_if_empty_imports_once() {
        let dir = TempDir::new().unwrap();
        let data = write_survey(&dir, SURVEY);
        let mut store = RecordStore::open_in_memory().unwrap();
        let config = config_for(&data, ImportMode::IfEmpty);

        load_initial_data(&mut store, &config).unwrap();
        load_initial_data(&mut store, &config).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_always_appends_each_start() {
        let dir = TempDir::new().unwrap();
        let data = write_survey(&dir, SURVEY);
        let mut store = RecordStore::open_in_memory().unwrap();
        let config = config_for(&data, ImportMode::Always);

        load_initial_data(&mut store, &config).unwrap();
        load_initial_data(&mut store, &config).unwrap();
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn test_never_skips_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = RecordStore::open_in_memory().unwrap();
        let config = config_for(&dir.path().join("absent.csv"), ImportMode::Never);

        load_initial_data(&mut store, &config).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_missing_file_fails_startup() {
        let dir = TempDir::new().unwrap();
        let mut store = RecordStore::open_in_memory().unwrap();
        let config = config_for(&dir.path().join("absent.csv"), ImportMode::IfEmpty);

        let err = load_initial_data(&mut store, &config).unwrap_err();
        assert!(format!("{err:#}").contains("cannot import"));
    }

    #[test]
    fn test_malformed_header_names_missing_columns() {
        let dir = TempDir::new().unwrap();
        let data = write_survey(&dir, "company,title,bonus\nApple,SWE,100\n");
        let mut store = RecordStore::open_in_memory().unwrap();
        let config = config_for(&data, ImportMode::Always);

        let err = load_initial_data(&mut store, &config).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("cannot import"), "{message}");
        assert!(
            message.contains("missing column(s) level, totalyearlycompensation, basesalary"),
            "{message}"
        );
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_command_line_overrides() {
        let args = Args::parse_from([
            "salarydb", "--db", "survey.db", "--import", "never", "-o", "json", "--config",
            "/nonexistent/salarydb.toml",
        ]);
        assert!(load_config(&args).is_err());

        let args = Args::parse_from(["salarydb", "--db", "survey.db", "--import", "if-empty"]);
        assert_eq!(args.database, Some(PathBuf::from("survey.db")));
        assert!(matches!(args.import_mode, Some(ImportModeArg::IfEmpty)));
    }
}
