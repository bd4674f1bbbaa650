use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use sheet_import::config::NotionConfig;
use sheet_import::handler::handle_import;
use sheet_import::ingestion::{
    DEFAULT_ERROR_BUDGET, DEFAULT_MAX_ROWS, ImportLimits, ImportOptions, LogObserver, SheetFormat,
    UploadPart,
};
use sheet_import::processing::DEFAULT_STATUS;
use sheet_import::store::{DryRunStore, NotionStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Excel,
}

impl From<FormatArg> for SheetFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => SheetFormat::Csv,
            FormatArg::Excel => SheetFormat::Excel,
        }
    }
}

/// Import a spreadsheet into the Notion database named by NOTION_TOKEN / NOTION_DATABASE_ID.
#[derive(Debug, Parser)]
#[command(name = "sheet-import", version, about)]
struct Cli {
    /// Spreadsheet to import (.xlsx, .xls, .ods, .csv).
    file: PathBuf,

    /// Force the input format instead of detecting it.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Map and log records without calling Notion.
    #[arg(long)]
    dry_run: bool,

    /// Maximum number of data rows to read.
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    max_rows: usize,

    /// Failures tolerated before the batch stops.
    #[arg(long, default_value_t = DEFAULT_ERROR_BUDGET)]
    error_budget: usize,

    /// Status marker applied to created records.
    #[arg(long, default_value = DEFAULT_STATUS)]
    status: String,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let data = match std::fs::read(&cli.file) {
        Ok(data) => data,
        Err(e) => {
            log::error!("cannot read {}: {e}", cli.file.display());
            return ExitCode::FAILURE;
        }
    };
    let filename = cli.file.file_name().map(|n| n.to_string_lossy().into_owned());
    let parts = vec![UploadPart::new("file", filename, data)];

    let options = ImportOptions {
        format: cli.format.map(SheetFormat::from),
        status: cli.status.clone(),
        limits: ImportLimits {
            max_rows: cli.max_rows,
            error_budget: cli.error_budget,
            ..ImportLimits::default()
        },
        observer: Some(Arc::new(LogObserver)),
        ..ImportOptions::default()
    };

    let response = if cli.dry_run {
        handle_import(|| Ok(DryRunStore), &parts, &options)
    } else {
        handle_import(|| NotionConfig::from_env().and_then(NotionStore::new), &parts, &options)
    };

    match response.body_json() {
        Ok(body) => println!("{body}"),
        Err(e) => log::error!("cannot serialize response: {e}"),
    }

    if response.status == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
