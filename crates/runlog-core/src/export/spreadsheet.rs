//! Spreadsheet (`.xlsx`) export.
//!
//! Same columns as the CSV output. Numbers are written as numbers, distance
//! with two decimals, and absent values as the text placeholder. Header
//! styling and row banding are cosmetic.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

use super::{plan_cells, MISSING_VALUE, PLAN_HEADERS, RUN_HEADERS};
use crate::{
    error::{Result, RunLogError},
    models::{Run, TrainingPlan},
};

const HEADER_BACKGROUND: u32 = 0x1F4E78;
const BAND_BACKGROUND: u32 = 0xDDEBF7;

/// Cell formats, indexed by band (0 = plain row, 1 = shaded row).
struct Formats {
    header: Format,
    text: [Format; 2],
    integer: [Format; 2],
    decimal: [Format; 2],
}

impl Formats {
    fn new() -> Self {
        let band = |format: Format, shaded: bool| {
            if shaded {
                format.set_background_color(Color::RGB(BAND_BACKGROUND))
            } else {
                format
            }
        };
        let banded = |make: fn() -> Format| [band(make(), false), band(make(), true)];

        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_BACKGROUND))
                .set_border(FormatBorder::Thin),
            text: banded(Format::new),
            integer: banded(|| Format::new().set_num_format("0")),
            decimal: banded(|| Format::new().set_num_format("0.00")),
        }
    }
}

/// A value destined for one cell.
enum Cell<'a> {
    Text(&'a str),
    Integer(u64),
    Decimal(f64),
    Missing,
}

fn write_cell(
    sheet: &mut Worksheet,
    formats: &Formats,
    row: u32,
    col: u16,
    cell: Cell<'_>,
) -> std::result::Result<(), XlsxError> {
    let band = usize::from(row % 2 == 0);
    match cell {
        Cell::Text(text) => {
            sheet.write_string_with_format(row, col, text, &formats.text[band])?;
        }
        Cell::Integer(value) => {
            sheet.write_number_with_format(row, col, value as f64, &formats.integer[band])?;
        }
        Cell::Decimal(value) => {
            let rounded = (value * 100.0).round() / 100.0;
            sheet.write_number_with_format(row, col, rounded, &formats.decimal[band])?;
        }
        Cell::Missing => {
            sheet.write_string_with_format(row, col, MISSING_VALUE, &formats.text[band])?;
        }
    }
    Ok(())
}

fn write_header(
    sheet: &mut Worksheet,
    formats: &Formats,
    headers: &[&str],
) -> std::result::Result<(), XlsxError> {
    for (col, title) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *title, &formats.header)?;
        let width = (title.len() as f64 + 4.0).max(12.0);
        sheet.set_column_width(col, width)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn optional(value: Option<u32>) -> Cell<'static> {
    value.map_or(Cell::Missing, |v| Cell::Integer(u64::from(v)))
}

fn build_runs(path: &Path, runs: &[Run]) -> std::result::Result<(), XlsxError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Runs")?;
    write_header(sheet, &formats, &RUN_HEADERS)?;

    for (row, run) in (1u32..).zip(runs) {
        let date = run.date.to_string();
        let pace = run.avg_pace.to_string();
        let notes = run.notes.as_deref().filter(|n| !n.trim().is_empty());
        let cells = [
            Cell::Integer(run.id),
            Cell::Text(&date),
            Cell::Decimal(run.distance),
            Cell::Integer(u64::from(run.duration)),
            Cell::Text(&pace),
            optional(run.avg_bpm),
            optional(run.max_bpm),
            optional(run.elevation_gain),
            optional(run.calories),
            Cell::Text(run.workout_type.label()),
            notes.map_or(Cell::Missing, Cell::Text),
        ];
        for (col, cell) in (0u16..).zip(cells) {
            write_cell(sheet, &formats, row, col, cell)?;
        }
    }

    workbook.save(path)
}

fn build_plan(path: &Path, plan: &TrainingPlan) -> std::result::Result<(), XlsxError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Plan")?;
    write_header(sheet, &formats, &PLAN_HEADERS)?;

    for (row, cells) in (1u32..).zip(plan_cells(plan)) {
        for (col, text) in (0u16..).zip(cells.iter()) {
            let cell = if text == MISSING_VALUE {
                Cell::Missing
            } else {
                Cell::Text(text)
            };
            write_cell(sheet, &formats, row, col, cell)?;
        }
    }

    workbook.save(path)
}

fn export_error(path: &Path, error: XlsxError) -> RunLogError {
    RunLogError::Export {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

pub(crate) fn write_runs(path: &Path, runs: &[Run]) -> Result<()> {
    build_runs(path, runs).map_err(|e| export_error(path, e))
}

pub(crate) fn write_plan(path: &Path, plan: &TrainingPlan) -> Result<()> {
    build_plan(path, plan).map_err(|e| export_error(path, e))
}
