use std::path::Path;

use crate::error::{PlotError, PlotResult};

// ---------------------------------------------------------------------------
// RowWindow – which rows of the source are read
// ---------------------------------------------------------------------------

/// 1-based header row (`start`) and optional last row (`end`).
///
/// The header sits at `start`; everything above it is skipped. When `end` is
/// set, `end - start + 1` data rows are read after the header, otherwise the
/// source is read to the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: Option<usize>,
}

impl RowWindow {
    /// Validate the bounds and build the window.
    pub fn new(start: usize, end: Option<usize>) -> PlotResult<Self> {
        if start < 1 {
            return Err(PlotError::InvalidStart);
        }
        if let Some(end) = end {
            if end < start {
                return Err(PlotError::EndBeforeStart {
                    start: i64::try_from(start).unwrap_or(i64::MAX),
                    end: i64::try_from(end).unwrap_or(i64::MAX),
                });
            }
        }
        let window = RowWindow { start, end };
        log::debug!(
            "row window: skip {} rows, read {:?} data rows",
            window.skip(),
            window.rows()
        );
        Ok(window)
    }

    /// Zero-based number of rows skipped before the header row.
    pub fn skip(&self) -> usize {
        self.start - 1
    }

    /// Number of data rows to read after the header (`None` = to the bottom).
    pub fn rows(&self) -> Option<usize> {
        self.end.map(|end| end - self.start + 1)
    }

    /// Human-readable range used in the automatic title, e.g. `10–25` or `10–end`.
    pub fn range_label(&self) -> String {
        match self.end {
            Some(end) => format!("{}–{}", self.start, end),
            None => format!("{}–end", self.start),
        }
    }
}

/// Fail early when the data file is missing.
pub fn ensure_exists(path: &Path) -> PlotResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PlotError::FileNotFound(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ended_window_reads_to_bottom() {
        let w = RowWindow::new(10, None).unwrap();
        assert_eq!(w.skip(), 9);
        assert_eq!(w.rows(), None);
        assert_eq!(w.range_label(), "10–end");
    }

    #[test]
    fn bounded_window_counts_rows_inclusively() {
        let w = RowWindow::new(34, Some(40)).unwrap();
        assert_eq!(w.skip(), 33);
        assert_eq!(w.rows(), Some(7));
        assert_eq!(w.range_label(), "34–40");
    }

    #[test]
    fn start_equal_to_end_is_allowed() {
        let w = RowWindow::new(5, Some(5)).unwrap();
        assert_eq!(w.rows(), Some(1));
    }

    #[test]
    fn zero_start_is_rejected() {
        let err = RowWindow::new(0, None).unwrap_err();
        assert!(matches!(err, PlotError::InvalidStart));
        assert_eq!(err.to_string(), "'start' must be >= 1");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = RowWindow::new(10, Some(3)).unwrap_err();
        assert!(matches!(err, PlotError::EndBeforeStart { start: 10, end: 3 }));
        assert_eq!(err.to_string(), "'end' (3) must be >= 'start' (10).");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = ensure_exists(&path).unwrap_err();
        assert!(matches!(err, PlotError::FileNotFound(_)));
        assert!(err.to_string().contains("nope.csv"));
    }
}
