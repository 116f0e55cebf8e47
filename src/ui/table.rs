//! Plain text and JSON renderings of a run report.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::models::{RankedResult, RunReport};

const HEADERS: [&str; 7] = [
    "Rank",
    "Symbol",
    "Super-Score",
    "Technical",
    "Sentiment",
    "News",
    "Recommendation",
];

fn row_cells(rank: usize, result: &RankedResult) -> [String; 7] {
    [
        rank.to_string(),
        result.symbol.clone(),
        format!("{:.5}", result.super_score),
        format!("{:.5}", result.technical_score),
        format!("{:.3}", result.sentiment),
        result.headline_count.to_string(),
        result.recommendation.label().to_string(),
    ]
}

/// Aligned ranking table followed by the skipped symbols
pub fn render_table(report: &RunReport) -> String {
    let rows: Vec<[String; 7]> = report
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| row_cells(i + 1, r))
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(col, (cell, width))| {
                // Text columns left aligned, numbers right aligned
                if col == 1 || col == 6 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };

    let headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    line(&mut out, &headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&mut out, &rule);
    for row in &rows {
        line(&mut out, row);
    }

    if report.results.is_empty() {
        let _ = writeln!(out, "(no symbols could be scored)");
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped {} of {} symbols:", report.skipped_count(), report.total_symbols);
        for skipped in &report.skipped {
            let _ = writeln!(out, "  {:<8} {}", skipped.symbol, skipped.reason);
        }
    }
    out
}

#[derive(Serialize)]
struct JsonSkipped<'a> {
    symbol: &'a str,
    reason: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total_symbols: usize,
    results: &'a [RankedResult],
    skipped: Vec<JsonSkipped<'a>>,
}

/// Ranking as pretty printed JSON
pub fn render_json(report: &RunReport) -> Result<String> {
    let json = JsonReport {
        total_symbols: report.total_symbols,
        results: &report.results,
        skipped: report
            .skipped
            .iter()
            .map(|s| JsonSkipped {
                symbol: &s.symbol,
                reason: s.reason.to_string(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
