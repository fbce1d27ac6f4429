//! Delimited-text export.
//!
//! Fields containing a comma, quote or line break are quoted, with embedded
//! quotes doubled. Everything is written as plain text.

use std::{borrow::Cow, fmt::Write as _, fs, path::Path};

use super::{plan_cells, run_cells, PLAN_HEADERS, RUN_HEADERS};
use crate::{
    error::{Result, RunLogError},
    models::{Run, TrainingPlan},
};

/// Quotes a field when it would otherwise break the row.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_row<S: AsRef<str>>(output: &mut String, cells: &[S]) {
    let line = cells
        .iter()
        .map(|cell| escape_field(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    // Writing to a String cannot fail.
    let _ = writeln!(output, "{line}");
}

/// Renders runs as CSV text, header first. An empty slice yields just the header.
pub fn render_runs(runs: &[Run]) -> String {
    let mut output = String::new();
    push_row(&mut output, &RUN_HEADERS);
    for run in runs {
        push_row(&mut output, &run_cells(run));
    }
    output
}

/// Renders a plan's sessions as CSV text, header first.
pub fn render_plan(plan: &TrainingPlan) -> String {
    let mut output = String::new();
    push_row(&mut output, &PLAN_HEADERS);
    for row in plan_cells(plan) {
        push_row(&mut output, &row);
    }
    output
}

pub(crate) fn write_runs(path: &Path, runs: &[Run]) -> Result<()> {
    write_file(path, render_runs(runs))
}

pub(crate) fn write_plan(path: &Path, plan: &TrainingPlan) -> Result<()> {
    write_file(path, render_plan(plan))
}

fn write_file(path: &Path, content: String) -> Result<()> {
    fs::write(path, content).map_err(|e| RunLogError::file_system(path, e))
}
