use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Everything that can stop a plot run before the window opens.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("'start' must be >= 1")]
    InvalidStart,

    #[error("'end' ({end}) must be >= 'start' ({start}).")]
    EndBeforeStart { start: i64, end: i64 },

    #[error("Unsupported file type: {0}. Use .csv, .xls, or .xlsx")]
    UnsupportedFileType(String),

    #[error("Column '{column}' not found in '{label}'. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        label: String,
        available: Vec<String>,
    },

    #[error("Sheet '{sheet}' not found. Available sheets: {available:?}")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Unknown color '{0}'")]
    UnknownColor(String),

    #[error("Missing setting '{0}' (set it in the config file or on the command line)")]
    MissingSetting(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type PlotResult<T> = Result<T, PlotError>;
