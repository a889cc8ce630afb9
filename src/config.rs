//! Plot settings: JSON config file, command-line overrides, derived labels.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::window::RowWindow;
use crate::error::{PlotError, PlotResult};

// ---------------------------------------------------------------------------
// PlotConfig
// ---------------------------------------------------------------------------

/// A sheet to plot and the colour to draw it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetColor {
    pub sheet: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Everything one plot run needs, after the config file and the command
/// line have been merged and checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotConfig {
    pub file_path: PathBuf,

    /// 1-based row number of the header row.
    pub start: usize,
    /// 1-based last row, `None` reads to the bottom.
    pub end: Option<usize>,

    /// Workbooks only. Empty means every sheet with default colours.
    pub sheet_colors: Vec<SheetColor>,

    pub x_axis: String,
    pub y_axis: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub plot_title: Option<String>,

    pub label_fontsize: f32,
    pub title_fontsize: f32,
    pub tick_fontsize: f32,
    pub legend_fontsize: f32,

    /// Marker area in points², as matplotlib's `s`.
    pub marker_size: f32,
    pub marker_alpha: f32,
}

fn default_start() -> usize {
    1
}
fn default_label_fontsize() -> f32 {
    20.0
}
fn default_title_fontsize() -> f32 {
    20.0
}
fn default_tick_fontsize() -> f32 {
    10.0
}
fn default_legend_fontsize() -> f32 {
    12.0
}
fn default_marker_size() -> f32 {
    15.0
}
fn default_marker_alpha() -> f32 {
    0.8
}

// ---------------------------------------------------------------------------
// ConfigFile – the JSON file as written, every field optional
// ---------------------------------------------------------------------------

/// Settings as read from a JSON file. A file may hold only styling and leave
/// the data file or the columns to the command line.
///
/// Row bounds are signed so a negative value reaches the row-bound checks
/// instead of failing as a type error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub file_path: Option<PathBuf>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub sheet_colors: Option<Vec<SheetColor>>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub plot_title: Option<String>,
    pub label_fontsize: Option<f32>,
    pub title_fontsize: Option<f32>,
    pub tick_fontsize: Option<f32>,
    pub legend_fontsize: Option<f32>,
    pub marker_size: Option<f32>,
    pub marker_alpha: Option<f32>,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> PlotResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fill defaults and check the settings that have none.
    pub fn resolve(self) -> PlotResult<PlotConfig> {
        let file_path = self.file_path.ok_or(PlotError::MissingSetting("file_path"))?;
        let x_axis = self.x_axis.ok_or(PlotError::MissingSetting("x_axis"))?;
        let y_axis = self.y_axis.ok_or(PlotError::MissingSetting("y_axis"))?;

        let start = match self.start {
            None => default_start(),
            Some(start) => usize::try_from(start)
                .ok()
                .filter(|s| *s >= 1)
                .ok_or(PlotError::InvalidStart)?,
        };
        let end = match self.end {
            None => None,
            Some(end) => Some(usize::try_from(end).map_err(|_| PlotError::EndBeforeStart {
                start: i64::try_from(start).unwrap_or(i64::MAX),
                end,
            })?),
        };

        Ok(PlotConfig {
            file_path,
            start,
            end,
            sheet_colors: self.sheet_colors.unwrap_or_default(),
            x_axis,
            y_axis,
            x_label: self.x_label,
            y_label: self.y_label,
            plot_title: self.plot_title,
            label_fontsize: self.label_fontsize.unwrap_or_else(default_label_fontsize),
            title_fontsize: self.title_fontsize.unwrap_or_else(default_title_fontsize),
            tick_fontsize: self.tick_fontsize.unwrap_or_else(default_tick_fontsize),
            legend_fontsize: self.legend_fontsize.unwrap_or_else(default_legend_fontsize),
            marker_size: self.marker_size.unwrap_or_else(default_marker_size),
            marker_alpha: self.marker_alpha.unwrap_or_else(default_marker_alpha),
        })
    }
}

impl PlotConfig {
    /// Defaults for everything except the file and the two columns.
    pub fn for_file(path: &Path, x_axis: &str, y_axis: &str) -> Self {
        PlotConfig {
            file_path: path.to_path_buf(),
            start: default_start(),
            end: None,
            sheet_colors: Vec::new(),
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
            x_label: None,
            y_label: None,
            plot_title: None,
            label_fontsize: default_label_fontsize(),
            title_fontsize: default_title_fontsize(),
            tick_fontsize: default_tick_fontsize(),
            legend_fontsize: default_legend_fontsize(),
            marker_size: default_marker_size(),
            marker_alpha: default_marker_alpha(),
        }
    }

    pub fn x_label_to_use(&self) -> &str {
        self.x_label.as_deref().unwrap_or(&self.x_axis)
    }

    pub fn y_label_to_use(&self) -> &str {
        self.y_label.as_deref().unwrap_or(&self.y_axis)
    }

    /// Custom title, or `"{y} vs {x} (rows {range})"`.
    pub fn title_to_use(&self, window: &RowWindow) -> String {
        match &self.plot_title {
            Some(title) => title.clone(),
            None => format!(
                "{} vs {} (rows {})",
                self.y_label_to_use(),
                self.x_label_to_use(),
                window.range_label()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "sheet-scatter")]
#[command(about = "Scatter-plot two columns of a CSV file or Excel workbook")]
#[command(version)]
pub struct Cli {
    /// Data file (.csv, .xls, .xlsx); overrides `file_path` from the config
    pub file: Option<PathBuf>,

    /// JSON config file with the plot settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Row number of the header row (1-based)
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Last row to read (1-based); reads to the bottom when omitted
    #[arg(long, allow_negative_numbers = true)]
    pub end: Option<i64>,

    /// Column name for the X axis
    #[arg(short = 'x', long = "x")]
    pub x_axis: Option<String>,

    /// Column name for the Y axis
    #[arg(short = 'y', long = "y")]
    pub y_axis: Option<String>,

    #[arg(long)]
    pub x_label: Option<String>,

    #[arg(long)]
    pub y_label: Option<String>,

    /// Custom plot title
    #[arg(long)]
    pub title: Option<String>,

    /// Sheet to plot, optionally with a colour: `--sheet "Sheet1=red"` (repeatable)
    #[arg(long = "sheet", value_name = "NAME[=COLOR]")]
    pub sheets: Vec<String>,

    #[arg(long)]
    pub label_size: Option<f32>,

    #[arg(long)]
    pub title_size: Option<f32>,

    #[arg(long)]
    pub tick_size: Option<f32>,

    #[arg(long)]
    pub legend_size: Option<f32>,

    /// Load and validate, log a summary, and exit without opening a window
    #[arg(long)]
    pub check: bool,

    /// Print the merged configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// List the sheets of the workbook and exit
    #[arg(long)]
    pub list_sheets: bool,
}

impl Cli {
    /// Merge: config file (if any) first, then every flag given on the
    /// command line. Required settings are checked only after merging.
    pub fn into_config(self) -> PlotResult<PlotConfig> {
        let mut file = match &self.config {
            Some(path) => ConfigFile::from_file(path)?,
            None => ConfigFile::default(),
        };

        if self.file.is_some() {
            file.file_path = self.file;
        }
        if self.start.is_some() {
            file.start = self.start;
        }
        if self.end.is_some() {
            file.end = self.end;
        }
        if self.x_axis.is_some() {
            file.x_axis = self.x_axis;
        }
        if self.y_axis.is_some() {
            file.y_axis = self.y_axis;
        }
        if self.x_label.is_some() {
            file.x_label = self.x_label;
        }
        if self.y_label.is_some() {
            file.y_label = self.y_label;
        }
        if self.title.is_some() {
            file.plot_title = self.title;
        }
        if !self.sheets.is_empty() {
            file.sheet_colors = Some(self.sheets.iter().map(|s| parse_sheet_arg(s)).collect());
        }
        if self.label_size.is_some() {
            file.label_fontsize = self.label_size;
        }
        if self.title_size.is_some() {
            file.title_fontsize = self.title_size;
        }
        if self.tick_size.is_some() {
            file.tick_fontsize = self.tick_size;
        }
        if self.legend_size.is_some() {
            file.legend_fontsize = self.legend_size;
        }
        file.resolve()
    }
}

/// `"Sheet1=red"` → sheet + colour, `"Sheet1"` → sheet with the default colour.
/// Splits on the last `=` so sheet names may contain one.
fn parse_sheet_arg(arg: &str) -> SheetColor {
    match arg.rsplit_once('=') {
        Some((sheet, color)) if !color.trim().is_empty() => SheetColor {
            sheet: sheet.to_string(),
            color: Some(color.trim().to_string()),
        },
        Some((sheet, _)) => SheetColor {
            sheet: sheet.to_string(),
            color: None,
        },
        None => SheetColor {
            sheet: arg.to_string(),
            color: None,
        },
    }
}
