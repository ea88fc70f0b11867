mod document;
mod export;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use datagrid_lib::query::FilterCondition;
use datagrid_lib::window::ScrollRequest;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::document::TableDocument;
use crate::export::JsonExporter;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Headless data grid: load a table document, apply actions, print the view"
)]
struct Args {
    /// Table document (JSON with columns, records, config and initial state)
    path: PathBuf,

    /// Filter as JSON, e.g. '{"field":"dept","operator":"equals","value":"Eng"}'
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Remove the filter on a field
    #[arg(long = "clear-filter")]
    clear_filters: Vec<String>,

    /// Cycle the sort on a field (asc, desc, off); repeatable
    #[arg(long = "sort")]
    sorts: Vec<String>,

    /// Group by these fields, comma-separated
    #[arg(long = "group-by", value_delimiter = ',')]
    group_by: Option<Vec<String>>,

    /// Toggle a group open or closed by key, e.g. "Eng|NYC"
    #[arg(long = "toggle-group")]
    toggle_groups: Vec<String>,

    /// Expand every group
    #[arg(long = "expand-all", action)]
    expand_all: bool,

    /// Select every filtered row (or clear if already selected)
    #[arg(long = "select-all", action)]
    select_all: bool,

    /// Go to a 1-based page
    #[arg(long = "page")]
    page: Option<usize>,

    /// Change the page size
    #[arg(long = "page-size")]
    page_size: Option<usize>,

    /// Scroll the virtual body to an offset in pixels
    #[arg(long = "scroll")]
    scroll: Option<f64>,

    /// Scroll so the row at this index is visible
    #[arg(long = "scroll-into-view")]
    scroll_into_view: Option<usize>,

    /// Write the filtered, sorted rows as JSON to this file ("-" for stdout)
    #[arg(long = "export")]
    export: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long = "pretty", action)]
    pretty: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,

    /// Log file
    #[arg(long = "log-file", default_value = "datagrid.log")]
    log_file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Grid(#[from] datagrid_lib::Error),

    #[error("Invalid filter '{input}': {source}")]
    Filter {
        input: String,
        source: serde_json::Error,
    },

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl From<datagrid_lib::error::ConfigError> for CliError {
    fn from(e: datagrid_lib::error::ConfigError) -> Self {
        CliError::Grid(e.into())
    }
}

impl From<datagrid_lib::error::ExportError> for CliError {
    fn from(e: datagrid_lib::error::ExportError) -> Self {
        CliError::Grid(e.into())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Grid(e.into())
    }
}

fn init_logging(args: &Args) -> Result<(), CliError> {
    let log_file = File::create(&args.log_file)?;
    WriteLogger::init(args.log_level, Config::default(), log_file)?;
    Ok(())
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut table = TableDocument::load(&args.path)?.into_controller()?;

    for input in &args.filters {
        let filter: FilterCondition =
            serde_json::from_str(input).map_err(|source| CliError::Filter {
                input: input.clone(),
                source,
            })?;
        let field = filter.field.clone();
        table.set_filter(&field, Some(filter));
    }
    for field in &args.clear_filters {
        table.set_filter(field, None);
    }
    for field in &args.sorts {
        table.toggle_sort(field);
    }
    if let Some(fields) = &args.group_by {
        table.set_group_by(Some(fields.clone()));
    }
    for key in &args.toggle_groups {
        table.toggle_group_expanded(key);
    }
    if args.expand_all {
        table.expand_all();
    }
    if args.select_all {
        table.toggle_all_selection();
    }
    if let Some(page_size) = args.page_size {
        table.set_page_size(page_size)?;
    }
    if let Some(page) = args.page {
        table.set_page(page);
    }
    if let Some(offset) = args.scroll {
        table.scroll_to(offset);
    }
    if let Some(index) = args.scroll_into_view {
        table.scroll(ScrollRequest::IntoView(index));
    }

    if let Some(path) = &args.export {
        if path.as_os_str() == "-" {
            table.export(&mut JsonExporter::new(io::stdout().lock()).pretty(args.pretty))?;
        } else {
            table.export(&mut JsonExporter::new(File::create(path)?).pretty(args.pretty))?;
        }
        return Ok(());
    }

    let view = table.view();
    let stdout = io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(stdout, &view).map_err(datagrid_lib::Error::from)?;
    } else {
        serde_json::to_writer(stdout, &view).map_err(datagrid_lib::Error::from)?;
    }
    println!();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
