use std::path::PathBuf;

use crate::config::PlotConfig;
use crate::data::build_plot;
use crate::data::series::PlotModel;
use crate::data::window::RowWindow;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Settings the current plot was built from.
    pub config: PlotConfig,

    /// Row window of the current plot.
    pub window: RowWindow,

    /// Series accumulated from the loaded file.
    pub model: PlotModel,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set when the plot should re-fit its bounds on the next frame.
    pub reset_view: bool,
}

impl AppState {
    pub fn new(config: PlotConfig, window: RowWindow, model: PlotModel) -> Self {
        Self {
            config,
            window,
            model,
            status_message: None,
            reset_view: true,
        }
    }

    /// Title shown above the plot.
    pub fn title(&self) -> String {
        self.config.title_to_use(&self.window)
    }

    /// Rebuild the plot from `path` with the current settings.
    ///
    /// On failure the previous plot stays and the error goes to the status line.
    pub fn load_file(&mut self, path: PathBuf) {
        let mut config = self.config.clone();
        config.file_path = path;
        self.apply(config);
    }

    /// Re-read the current file.
    pub fn reload(&mut self) {
        self.apply(self.config.clone());
    }

    fn apply(&mut self, config: PlotConfig) {
        match build_plot(&config) {
            Ok((window, model)) => {
                log::info!(
                    "Loaded {} series, {} points from {}",
                    model.series.len(),
                    model.total_points(),
                    config.file_path.display()
                );
                self.config = config;
                self.window = window;
                self.model = model;
                self.status_message = None;
                self.reset_view = true;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", config.file_path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Toggle one series on or off.
    pub fn toggle_series(&mut self, idx: usize) {
        if let Some(series) = self.model.series.get_mut(idx) {
            series.visible = !series.visible;
        }
    }

    pub fn show_all(&mut self) {
        for series in &mut self.model.series {
            series.visible = true;
        }
    }

    pub fn hide_all(&mut self) {
        for series in &mut self.model.series {
            series.visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_for(dir: &std::path::Path) -> AppState {
        let path = dir.join("a.csv");
        std::fs::write(&path, "x,y\n1,2\n3,4\n").unwrap();
        let config = PlotConfig::for_file(&path, "x", "y");
        let (window, model) = build_plot(&config).unwrap();
        AppState::new(config, window, model)
    }

    #[test]
    fn failed_load_keeps_previous_plot() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_for(dir.path());
        state.reset_view = false;

        let other = dir.path().join("b.csv");
        std::fs::write(&other, "p,q\n1,2\n").unwrap();
        state.load_file(other);

        assert_eq!(state.model.series[0].label, "a");
        assert!(!state.reset_view);
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error: Column 'x' not found in 'b'"));
    }

    #[test]
    fn successful_load_replaces_plot() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_for(dir.path());

        let other = dir.path().join("b.csv");
        std::fs::write(&other, "x,y\n5,6\n").unwrap();
        state.load_file(other.clone());

        assert_eq!(state.config.file_path, other);
        assert_eq!(state.model.series[0].label, "b");
        assert_eq!(state.model.series[0].points, vec![[5.0, 6.0]]);
        assert!(state.status_message.is_none());
        assert_eq!(state.title(), "y vs x (rows 1–end)");
    }

    #[test]
    fn series_visibility_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_for(dir.path());
        state.toggle_series(0);
        assert!(!state.model.series[0].visible);
        state.show_all();
        assert!(state.model.series[0].visible);
        state.hide_all();
        assert!(!state.model.series[0].visible);
        state.toggle_series(9);
    }
}
