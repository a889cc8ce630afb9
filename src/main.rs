mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::SheetScatterApp;
use clap::Parser;
use config::Cli;
use data::loader::{sheet_names, SourceKind};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let (check, print_config, list_sheets) = (cli.check, cli.print_config, cli.list_sheets);
    let config = cli.into_config().context("building plot configuration")?;

    if print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if list_sheets {
        let kind = SourceKind::from_path(&config.file_path)?;
        anyhow::ensure!(
            kind.is_workbook(),
            "{} is not a workbook",
            config.file_path.display()
        );
        for name in sheet_names(&config.file_path)? {
            println!("{name}");
        }
        return Ok(());
    }

    let (window, model) = data::build_plot(&config)
        .with_context(|| format!("plotting {}", config.file_path.display()))?;

    if check {
        for (idx, series) in model.series.iter().enumerate() {
            log::info!(
                "series {idx} '{}': {} points, {} rows skipped",
                series.label,
                series.points.len(),
                series.dropped
            );
        }
        println!("{}", config.title_to_use(&window));
        return Ok(());
    }

    let title = format!("{} – Sheet Scatter", config.title_to_use(&window));
    let state = AppState::new(config, window, model);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([500.0, 350.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(SheetScatterApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
