//! Plain text rendering for validation outcomes.

use crate::validate::{DiagnosticRecord, ValidationOutcome};

/// Status line for a valid upload.
pub const VALID_MESSAGE: &str = "Upload is valid!";

/// Status line for an upload with diagnostics.
pub const INVALID_MESSAGE: &str = "Upload contains errors";

const HEADINGS: [&str; 3] = ["Line", "Column", "Message"];

/// Status line for an outcome.
pub fn status_line(outcome: &ValidationOutcome) -> &'static str {
    if outcome.valid {
        VALID_MESSAGE
    } else {
        INVALID_MESSAGE
    }
}

/// Render an outcome as a status line followed by the diagnostics table.
pub fn to_text(outcome: &ValidationOutcome) -> String {
    let mut output = format!(
        "Sheet: {} ({} rows)\n{}\n",
        outcome.page,
        outcome.row_count,
        status_line(outcome)
    );

    if !outcome.diagnostics.is_empty() {
        output.push('\n');
        output.push_str(&diagnostics_table(&outcome.diagnostics));
    }

    output
}

/// Render diagnostics as an aligned three-column table.
pub fn diagnostics_table(records: &[DiagnosticRecord]) -> String {
    let lines: Vec<String> = records.iter().map(|r| r.line_number.to_string()).collect();

    let line_width = lines
        .iter()
        .map(String::len)
        .chain(std::iter::once(HEADINGS[0].len()))
        .max()
        .unwrap_or(0);
    let column_width = records
        .iter()
        .map(|r| r.column.chars().count())
        .chain(std::iter::once(HEADINGS[1].len()))
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    push_row(&mut output, HEADINGS[0], HEADINGS[1], HEADINGS[2], line_width, column_width);
    push_row(
        &mut output,
        &"-".repeat(line_width),
        &"-".repeat(column_width),
        &"-".repeat(HEADINGS[2].len()),
        line_width,
        column_width,
    );
    for (record, line) in records.iter().zip(&lines) {
        push_row(&mut output, line, &record.column, &record.message, line_width, column_width);
    }
    output
}

fn push_row(
    output: &mut String,
    line: &str,
    column: &str,
    message: &str,
    line_width: usize,
    column_width: usize,
) {
    let row = format!(
        "{:<line_width$}  {:<column_width$}  {}",
        line,
        column,
        message,
        line_width = line_width,
        column_width = column_width
    );
    output.push_str(row.trim_end());
    output.push('\n');
}
