/// Data layer: row window, loading, tables and scatter series.
///
/// Architecture:
/// ```text
///  .csv / .xls / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  window   │  start/end → skip + row count
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file (or each sheet) → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  column check → ScatterSeries on the shared PlotModel
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod series;
pub mod window;

use crate::config::PlotConfig;
use crate::error::PlotResult;
use series::PlotModel;
use window::{ensure_exists, RowWindow};

/// Run the whole pipeline: validate, load every source, accumulate series.
pub fn build_plot(config: &PlotConfig) -> PlotResult<(RowWindow, PlotModel)> {
    ensure_exists(&config.file_path)?;
    let window = RowWindow::new(config.start, config.end)?;

    let mut model = PlotModel::default();
    for source in loader::load_sources(config, &window)? {
        if source.table.is_empty() {
            log::warn!("'{}' has no data rows in rows {}", source.label, window.range_label());
        }
        model.add_table(
            &source.table,
            &source.label,
            source.color,
            &config.x_axis,
            &config.y_axis,
        )?;
    }
    Ok((window, model))
}
