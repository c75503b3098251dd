//! Plain-text table rendering for report output.

use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders with per-column alignment; columns without an entry in `aligns`
/// fall back to left. Numeric columns read best right-aligned.
pub fn render_aligned(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths, aligns);
    let _ = writeln!(output, "{header_line}");

    let separator_cells = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &widths, &[]);
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths, aligns);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

pub fn print_aligned(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) {
    print!("{}", render_aligned(headers, rows, aligns));
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let display = display_width(sanitized.as_ref());
        let padding = widths[idx].saturating_sub(display);
        let align = aligns.get(idx).copied().unwrap_or(Align::Left);
        let cell = match align {
            Align::Left => {
                let mut cell = sanitized.into_owned();
                cell.push_str(&" ".repeat(padding));
                cell
            }
            Align::Right => {
                let mut cell = " ".repeat(padding);
                cell.push_str(sanitized.as_ref());
                cell
            }
        };
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        let mut sanitized = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\n' | '\r' | '\t' => sanitized.push(' '),
                other => sanitized.push(other),
            }
        }
        Cow::Owned(sanitized)
    } else {
        Cow::Borrowed(value)
    }
}
