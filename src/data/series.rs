use eframe::egui::Color32;

use super::model::Table;
use crate::color::default_cycle;
use crate::error::{PlotError, PlotResult};

// ---------------------------------------------------------------------------
// ScatterSeries – one layer of the overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ScatterSeries {
    /// Legend label (file stem or sheet name).
    pub label: String,
    /// Explicit colour; `None` falls back to the default cycle.
    pub color: Option<Color32>,
    pub points: Vec<[f64; 2]>,
    /// Rows dropped because x or y was not numeric.
    pub dropped: usize,
    pub visible: bool,
}

// ---------------------------------------------------------------------------
// PlotModel – every series drawn on the shared plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PlotModel {
    pub series: Vec<ScatterSeries>,
}

impl PlotModel {
    /// Check that both columns exist in `table` and append its points as a
    /// new series. Rows where either value is not numeric are dropped.
    pub fn add_table(
        &mut self,
        table: &Table,
        label: &str,
        color: Option<Color32>,
        x_axis: &str,
        y_axis: &str,
    ) -> PlotResult<()> {
        let missing = |column: &str| PlotError::MissingColumn {
            column: column.to_string(),
            label: label.to_string(),
            available: table.columns.clone(),
        };
        let xs = table.numeric_column(x_axis).ok_or_else(|| missing(x_axis))?;
        let ys = table.numeric_column(y_axis).ok_or_else(|| missing(y_axis))?;

        let points: Vec<[f64; 2]> = xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| Some([x?, y?]))
            .collect();
        let dropped = table.len() - points.len();
        if dropped > 0 {
            log::warn!("'{label}': dropped {dropped} rows with non-numeric '{x_axis}' or '{y_axis}'");
        }
        log::info!("'{label}': {} points", points.len());

        self.series.push(ScatterSeries {
            label: label.to_string(),
            color,
            points,
            dropped,
            visible: true,
        });
        Ok(())
    }

    /// Colour the series is drawn with.
    pub fn color_of(&self, idx: usize) -> Color32 {
        let series = &self.series[idx];
        series.color.unwrap_or_else(|| {
            // Only series without an explicit colour advance the cycle.
            let n = self.series[..idx]
                .iter()
                .filter(|s| s.color.is_none())
                .count();
            default_cycle(n)
        })
    }

    pub fn has_legend_entries(&self) -> bool {
        !self.series.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// `[min_x, min_y]`, `[max_x, max_y]` over all visible points.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut points = self
            .series
            .iter()
            .filter(|s| s.visible)
            .flat_map(|s| s.points.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table() -> Table {
        Table::new(
            vec!["POSITION mm".into(), "LOAD N".into()],
            vec![
                vec![CellValue::Float(0.1), CellValue::Float(10.0)],
                vec![CellValue::Float(0.2), CellValue::Null],
                vec![CellValue::Float(0.3), CellValue::Integer(12)],
            ],
        )
    }

    #[test]
    fn series_keeps_only_numeric_pairs() {
        let mut model = PlotModel::default();
        model
            .add_table(&table(), "Sheet1", None, "POSITION mm", "LOAD N")
            .unwrap();

        let s = &model.series[0];
        assert_eq!(s.points, vec![[0.1, 10.0], [0.3, 12.0]]);
        assert_eq!(s.dropped, 1);
        assert!(model.has_legend_entries());
        assert_eq!(model.total_points(), 2);
    }

    #[test]
    fn missing_column_lists_available_columns() {
        let mut model = PlotModel::default();
        let err = model
            .add_table(&table(), "100um sample", None, "POSITION mm", "LOAD kN")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'LOAD kN' not found in '100um sample'. \
             Available columns: [\"POSITION mm\", \"LOAD N\"]"
        );
        assert!(model.series.is_empty());
        assert!(!model.has_legend_entries());
    }

    #[test]
    fn series_accumulate_in_call_order() {
        let red = Color32::from_rgb(255, 0, 0);
        let mut model = PlotModel::default();
        model.add_table(&table(), "a", None, "POSITION mm", "LOAD N").unwrap();
        model.add_table(&table(), "b", Some(red), "POSITION mm", "LOAD N").unwrap();
        model.add_table(&table(), "c", None, "POSITION mm", "LOAD N").unwrap();

        let labels: Vec<_> = model.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(model.color_of(0), default_cycle(0));
        assert_eq!(model.color_of(1), red);
        assert_eq!(model.color_of(2), default_cycle(1));
    }

    #[test]
    fn infinite_values_are_dropped_and_keep_bounds_finite() {
        let t = Table::new(
            vec!["x".into(), "y".into()],
            vec![
                vec![CellValue::parse("1"), CellValue::parse("2")],
                vec![CellValue::parse("inf"), CellValue::parse("3")],
                vec![CellValue::parse("4"), CellValue::parse("-inf")],
            ],
        );
        let mut model = PlotModel::default();
        model.add_table(&t, "scan", None, "x", "y").unwrap();

        assert_eq!(model.series[0].points, vec![[1.0, 2.0]]);
        assert_eq!(model.series[0].dropped, 2);
        assert_eq!(model.bounds(), Some(([1.0, 2.0], [1.0, 2.0])));
    }

    #[test]
    fn bounds_cover_visible_series() {
        let mut model = PlotModel::default();
        assert!(model.bounds().is_none());
        model.add_table(&table(), "a", None, "POSITION mm", "LOAD N").unwrap();
        assert_eq!(model.bounds(), Some(([0.1, 10.0], [0.3, 12.0])));
        model.series[0].visible = false;
        assert!(model.bounds().is_none());
    }
}
