use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use eframe::egui::Color32;

use super::model::{CellValue, Table};
use super::window::RowWindow;
use crate::color::parse_color;
use crate::config::{PlotConfig, SheetColor};
use crate::error::{PlotError, PlotResult};

// ---------------------------------------------------------------------------
// Source kind: dispatch by extension
// ---------------------------------------------------------------------------

/// The reader a file is routed to, decided by its (lower-cased) extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    /// Legacy binary workbook (`.xls`).
    Xls,
    /// Any other workbook calamine can open (`.xlsx`, `.xlsm`, `.xlsb`, `.ods`).
    Xlsx,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> PlotResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceKind::Csv),
            "xls" => Ok(SourceKind::Xls),
            "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(SourceKind::Xlsx),
            "" => Err(PlotError::UnsupportedFileType("<none>".to_string())),
            other => Err(PlotError::UnsupportedFileType(format!(".{other}"))),
        }
    }

    pub fn is_workbook(self) -> bool {
        !matches!(self, SourceKind::Csv)
    }
}

// ---------------------------------------------------------------------------
// Multi-source entry point
// ---------------------------------------------------------------------------

/// One table ready to become a scatter series.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub label: String,
    pub color: Option<Color32>,
    pub table: Table,
}

/// Load every table the configuration asks for.
///
/// * CSV → one table labelled with the file stem.
/// * Workbook with `sheet_colors` → exactly those sheets, in order, with their colours.
/// * Workbook without `sheet_colors` → every sheet, default colours.
pub fn load_sources(config: &PlotConfig, window: &RowWindow) -> PlotResult<Vec<LoadedTable>> {
    let path = config.file_path.as_path();
    match SourceKind::from_path(path)? {
        SourceKind::Csv => {
            let table = load_csv(path, window)?;
            let label = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(vec![LoadedTable {
                label,
                color: None,
                table,
            }])
        }
        SourceKind::Xls | SourceKind::Xlsx => {
            let mut workbook = open_workbook(path)?;

            let sheets = select_sheets(&config.sheet_colors, &workbook.sheet_names())?;

            let mut loaded = Vec::with_capacity(sheets.len());
            for (sheet, color) in sheets {
                let table = read_sheet(&mut workbook, &sheet, window)?;
                log::info!(
                    "Loaded sheet '{sheet}': {} rows, columns {:?}",
                    table.len(),
                    table.columns
                );
                loaded.push(LoadedTable {
                    label: sheet,
                    color,
                    table,
                });
            }
            Ok(loaded)
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read the CSV window: skip `window.skip()` physical lines, take the next
/// record as the header and at most `window.rows()` data records after it.
///
/// Leading whitespace after a delimiter is ignored. Records with more fields
/// than the header are skipped; shorter ones are padded with nulls.
pub fn load_csv(path: &Path, window: &RowWindow) -> PlotResult<Table> {
    let bytes = std::fs::read(path)?;
    let raw = String::from_utf8_lossy(&bytes);
    let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    let body = skip_lines(text, window.skip());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|f| f.trim_start().to_string()).collect(),
        None => Vec::new(),
    };
    let width = header.len();
    let limit = window.rows().unwrap_or(usize::MAX);

    let mut rows = Vec::new();
    let mut bad_lines = 0usize;
    for result in records {
        if rows.len() >= limit {
            break;
        }
        let record = result?;
        if record.len() > width {
            bad_lines += 1;
            log::warn!(
                "Skipping line {}: expected {width} fields, saw {}",
                record.position().map(|p| p.line() as usize).unwrap_or(0) + window.skip(),
                record.len()
            );
            continue;
        }
        rows.push(record.iter().map(|f| CellValue::parse(f.trim_start())).collect());
    }

    let table = Table::new(header, rows);
    log::info!(
        "Loaded {}: {} rows, columns {:?}{}",
        path.display(),
        table.len(),
        table.columns,
        if bad_lines > 0 {
            format!(" ({bad_lines} bad lines skipped)")
        } else {
            String::new()
        }
    );
    Ok(table)
}

/// Everything after the first `n` newline-terminated lines.
fn skip_lines(text: &str, n: usize) -> &str {
    if n == 0 {
        return text;
    }
    match text.match_indices('\n').nth(n - 1) {
        Some((pos, _)) => &text[pos + 1..],
        None => "",
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

type Workbook = Sheets<BufReader<File>>;

fn open_workbook(path: &Path) -> PlotResult<Workbook> {
    Ok(open_workbook_auto(path)?)
}

/// All sheet names of a workbook, in workbook order.
pub fn sheet_names(path: &Path) -> PlotResult<Vec<String>> {
    Ok(open_workbook(path)?.sheet_names())
}

/// Which sheets to plot, in order, with their colour overrides.
///
/// An empty `sheet_colors` selects every sheet in workbook order with default
/// colours. Otherwise exactly the listed sheets are selected; each must exist
/// and each colour must parse.
pub fn select_sheets(
    sheet_colors: &[SheetColor],
    available: &[String],
) -> PlotResult<Vec<(String, Option<Color32>)>> {
    if sheet_colors.is_empty() {
        return Ok(available.iter().map(|name| (name.clone(), None)).collect());
    }
    sheet_colors
        .iter()
        .map(|sc| {
            if !available.iter().any(|name| *name == sc.sheet) {
                return Err(PlotError::SheetNotFound {
                    sheet: sc.sheet.clone(),
                    available: available.to_vec(),
                });
            }
            let color = sc.color.as_deref().map(parse_color).transpose()?;
            Ok((sc.sheet.clone(), color))
        })
        .collect()
}

fn read_sheet(workbook: &mut Workbook, sheet: &str, window: &RowWindow) -> PlotResult<Table> {
    let range = workbook.worksheet_range(sheet)?;
    Ok(table_from_range(&range, window))
}

/// Cut the row window out of a worksheet range.
///
/// Rows are addressed from worksheet row 1, so leading empty rows above the
/// used range still count towards `window.skip()`.
pub fn table_from_range(range: &Range<Data>, window: &RowWindow) -> Table {
    let (Some((_, first_col)), Some((last_row, last_col))) = (range.start(), range.end()) else {
        return Table::default();
    };

    let header_row = match u32::try_from(window.skip()) {
        Ok(row) if row <= last_row => row,
        _ => return Table::default(),
    };

    let read_row = |row: u32| -> Vec<CellValue> {
        (first_col..=last_col)
            .map(|col| {
                range
                    .get_value((row, col))
                    .map(cell_from_data)
                    .unwrap_or(CellValue::Null)
            })
            .collect()
    };

    let header: Vec<String> = read_row(header_row)
        .iter()
        .map(|cell| cell.to_string())
        .collect();

    let count = window.rows().unwrap_or(usize::MAX);
    let rows = (header_row + 1..=last_row).take(count).map(read_row).collect();

    Table::new(header, rows)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial day number, so date columns still plot on a numeric axis.
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const DIFFRACTION: &str = "\
Instrument: D8
Operator: lab
Angle, ESD, Note
10.0, 1.5, a
10.5, 1.7, b
11.0, 1.6
11.5, 1.9, c
";

    #[test]
    fn extension_dispatch() {
        assert_eq!(SourceKind::from_path(Path::new("a.CSV")).unwrap(), SourceKind::Csv);
        assert_eq!(SourceKind::from_path(Path::new("a.xls")).unwrap(), SourceKind::Xls);
        assert_eq!(SourceKind::from_path(Path::new("a.xlsx")).unwrap(), SourceKind::Xlsx);
        let err = SourceKind::from_path(Path::new("a.txt")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file type: .txt. Use .csv, .xls, or .xlsx"
        );
    }

    #[test]
    fn csv_header_row_is_start() {
        let file = write_csv(DIFFRACTION);
        let window = RowWindow::new(3, None).unwrap();
        let table = load_csv(file.path(), &window).unwrap();

        assert_eq!(table.columns, vec!["Angle", "ESD", "Note"]);
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows[0][0], CellValue::Float(10.0));
        assert_eq!(table.rows[0][2], CellValue::String("a".into()));
        assert_eq!(table.rows[2][2], CellValue::Null);
    }

    #[test]
    fn csv_end_limits_data_rows() {
        let file = write_csv(DIFFRACTION);
        let window = RowWindow::new(3, Some(4)).unwrap();
        let table = load_csv(file.path(), &window).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][1], CellValue::Float(1.7));
    }

    #[test]
    fn csv_lines_with_extra_fields_are_skipped() {
        let file = write_csv("x,y\n1,2\n3,4,5\n6,7\n");
        let window = RowWindow::new(1, None).unwrap();
        let table = load_csv(file.path(), &window).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][0], CellValue::Integer(6));
    }

    #[test]
    fn csv_start_past_end_of_file_gives_empty_table() {
        let file = write_csv("x,y\n1,2\n");
        let window = RowWindow::new(50, None).unwrap();
        let table = load_csv(file.path(), &window).unwrap();
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn skip_lines_counts_physical_lines() {
        assert_eq!(skip_lines("a\nb\nc", 0), "a\nb\nc");
        assert_eq!(skip_lines("a\nb\nc", 2), "c");
        assert_eq!(skip_lines("a\nb\nc", 5), "");
    }

    fn strain_sheet() -> Range<Data> {
        // Used range starts at B3; rows 1-2 are empty.
        let mut range = Range::new((2, 1), (6, 2));
        range.set_value((2, 1), Data::String("Sample 100um".into()));
        range.set_value((3, 1), Data::String(" POSITION mm ".into()));
        range.set_value((3, 2), Data::String("LOAD N".into()));
        range.set_value((4, 1), Data::Float(0.1));
        range.set_value((4, 2), Data::Float(12.5));
        range.set_value((5, 1), Data::Float(0.2));
        range.set_value((5, 2), Data::Int(13));
        range.set_value((6, 1), Data::Float(0.3));
        range.set_value((6, 2), Data::Error(calamine::CellErrorType::NA));
        range
    }

    #[test]
    fn sheet_rows_are_addressed_from_row_one() {
        let window = RowWindow::new(4, None).unwrap();
        let table = table_from_range(&strain_sheet(), &window);

        assert_eq!(table.columns, vec!["POSITION mm", "LOAD N"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1][1], CellValue::Integer(13));
        assert_eq!(table.rows[2][1], CellValue::Null);
    }

    #[test]
    fn sheet_window_end_is_clamped() {
        let window = RowWindow::new(4, Some(4)).unwrap();
        assert_eq!(table_from_range(&strain_sheet(), &window).len(), 1);

        let window = RowWindow::new(4, Some(400)).unwrap();
        assert_eq!(table_from_range(&strain_sheet(), &window).len(), 3);
    }

    #[test]
    fn sheet_header_below_data_gives_empty_table() {
        let window = RowWindow::new(20, None).unwrap();
        let table = table_from_range(&strain_sheet(), &window);
        assert!(table.columns.is_empty());
        assert!(table_from_range(&Range::empty(), &window).is_empty());
    }

    #[test]
    fn huge_start_does_not_wrap_to_an_early_row() {
        let window = RowWindow::new((u32::MAX as usize) + 5, None).unwrap();
        let table = table_from_range(&strain_sheet(), &window);
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sheet(name: &str, color: Option<&str>) -> SheetColor {
        SheetColor {
            sheet: name.to_string(),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn no_sheet_colors_selects_every_sheet_in_workbook_order() {
        let selected = select_sheets(&[], &names(&["Sheet2", "100um sample", "Sheet1"])).unwrap();
        assert_eq!(
            selected,
            vec![
                ("Sheet2".to_string(), None),
                ("100um sample".to_string(), None),
                ("Sheet1".to_string(), None),
            ]
        );
    }

    #[test]
    fn sheet_colors_select_exactly_those_sheets_in_listed_order() {
        let available = names(&["Sheet1", "Sheet2", "Sheet3"]);
        let selected = select_sheets(
            &[sheet("Sheet3", Some("red")), sheet("Sheet1", None)],
            &available,
        )
        .unwrap();
        assert_eq!(
            selected,
            vec![
                ("Sheet3".to_string(), Some(Color32::from_rgb(255, 0, 0))),
                ("Sheet1".to_string(), None),
            ]
        );
    }

    #[test]
    fn listed_sheet_missing_from_workbook_is_an_error() {
        let err = select_sheets(&[sheet("Sheet9", Some("blue"))], &names(&["Sheet1"])).unwrap_err();
        assert!(matches!(err, PlotError::SheetNotFound { ref sheet, .. } if sheet == "Sheet9"));
        assert_eq!(
            err.to_string(),
            "Sheet 'Sheet9' not found. Available sheets: [\"Sheet1\"]"
        );
    }

    #[test]
    fn bad_sheet_color_is_an_error() {
        let err = select_sheets(&[sheet("Sheet1", Some("blurple"))], &names(&["Sheet1"])).unwrap_err();
        assert!(matches!(err, PlotError::UnknownColor(_)));
    }

    #[test]
    fn csv_source_is_labelled_with_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TiNiCu_700.csv");
        std::fs::write(&path, "Angle,ESD\n1,2\n").unwrap();

        let config = PlotConfig::for_file(&path, "Angle", "ESD");
        let window = RowWindow::new(1, None).unwrap();
        let loaded = load_sources(&config, &window).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].label, "TiNiCu_700");
        assert!(loaded[0].color.is_none());
    }
}
