// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

//! Turns aggregated stats into the rendered report table.

use crate::aggregator::AggregateStats;

const HEADERS: [&str; 4] = ["", "handler", "total", "avg_response_time"];

/// One line of the averaging report: rank, handler, request count and
/// mean response time in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub index: usize,
    pub handler: String,
    pub count: u64,
    pub avg_response_time: f64,
}

/// Projects stats into report rows.
///
/// Averages are rounded to three decimals. Rows are ordered by request
/// count, busiest handler first; handlers with equal counts keep the
/// order they were first observed in. Indices are assigned after the
/// sort, starting at 0.
pub fn build_rows(stats: AggregateStats) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = stats
        .into_entries()
        .into_iter()
        .map(|(handler, stats)| ReportRow {
            index: 0,
            handler,
            // count is at least 1 for every handler present
            avg_response_time: round3(stats.total_time / stats.count as f64),
            count: stats.count,
        })
        .collect();
    // stable sort: entries arrive in first-seen order, which ties keep
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    for (index, row) in rows.iter_mut().enumerate() {
        row.index = index;
    }
    rows
}

/// Renders the averaging report as an aligned text table.
pub fn format_report(stats: AggregateStats) -> String {
    render_table(&build_rows(stats))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn render_table(rows: &[ReportRow]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.index.to_string(),
                row.handler.clone(),
                row.count.to_string(),
                format!("{:.3}", row.avg_response_time),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (column, cell) in row.iter().enumerate() {
            widths[column] = widths[column].max(cell.len());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(format_line(&HEADERS.map(str::to_string), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        lines.push(format_line(row, &widths));
    }
    lines.join("\n")
}

/// Pads one row of cells to the column widths. The handler column is
/// left-aligned, the numeric columns right-aligned.
fn format_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    format!(
        "{:>index_width$}  {:<handler_width$}  {:>total_width$}  {:>avg_width$}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        index_width = widths[0],
        handler_width = widths[1],
        total_width = widths[2],
        avg_width = widths[3],
    )
}
