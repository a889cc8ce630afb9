use eframe::egui::{FontId, RichText, TextStyle, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotBounds, Points};

use crate::state::AppState;

/// Text style the legend is drawn with, sized from `legend_fontsize`.
const LEGEND_STYLE: &str = "legend";

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Marker radius in pixels for a matplotlib marker area `s` (points²).
pub fn marker_radius(area: f32) -> f32 {
    area.max(0.0).sqrt() / 2.0
}

/// Render the title and the scatter plot in the central panel.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState) {
    let config = &state.config;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(state.title()).size(config.title_fontsize).strong());
    });

    if state.model.series.iter().all(|s| s.points.is_empty()) {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new("No numeric points in the selected rows.").italics());
        });
    }

    let radius = marker_radius(config.marker_size);
    let alpha = config.marker_alpha.clamp(0.0, 1.0);
    let reset = std::mem::take(&mut state.reset_view);
    let model = &state.model;

    ui.scope(|ui: &mut Ui| {
        // Tick labels use the body style; the override ends with this scope.
        let style = ui.style_mut();
        style
            .text_styles
            .insert(TextStyle::Body, FontId::proportional(config.tick_fontsize));
        style.text_styles.insert(
            TextStyle::Name(LEGEND_STYLE.into()),
            FontId::proportional(config.legend_fontsize),
        );

        let mut plot = Plot::new("scatter_plot")
            .x_axis_label(RichText::new(config.x_label_to_use()).size(config.label_fontsize))
            .y_axis_label(RichText::new(config.y_label_to_use()).size(config.label_fontsize))
            .show_grid(true)
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true);

        if model.has_legend_entries() {
            plot = plot.legend(Legend::default().text_style(TextStyle::Name(LEGEND_STYLE.into())));
        }

        plot.show(ui, |plot_ui| {
            for (idx, series) in model.series.iter().enumerate() {
                if !series.visible {
                    continue;
                }
                let color = model.color_of(idx).gamma_multiply(alpha);
                let points = Points::new(series.points.clone())
                    .name(&series.label)
                    .color(color)
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(radius);
                plot_ui.points(points);
            }

            if reset {
                if let Some((min, max)) = model.bounds() {
                    let pad_x = ((max[0] - min[0]) * 0.05).max(f64::EPSILON);
                    let pad_y = ((max[1] - min[1]) * 0.05).max(f64::EPSILON);
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [min[0] - pad_x, min[1] - pad_y],
                        [max[0] + pad_x, max[1] + pad_y],
                    ));
                }
            }
        });
    });
}
