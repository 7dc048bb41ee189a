//! Output formatting and persistence for loan reports.
//!
//! Supports pretty-printing, JSON serialization, per-section CSV files and
//! plain-text tables for the terminal.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{LoanReport, Section};
use crate::record::LoanRow;
use crate::tiers::{BinSpec, Category};
use csv::WriterBuilder;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Prints a value as pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes the report as pretty-printed JSON, creating parent directories.
pub fn write_json(path: &Path, report: &LoanReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }

    let body = serde_json::to_vec_pretty(report)?;
    fs::write(path, body).with_context(|| format!("failed to write '{}'", path.display()))?;

    info!(path = %path.display(), "Report JSON written");
    Ok(())
}

/// Writes one section as `<dir>/<section id>.csv` and returns the path.
///
/// Undefined statistics are written as empty cells.
pub fn write_section_csv(dir: &Path, section: &Section) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create '{}'", dir.display()))?;
    let path = dir.join(format!("{}.csv", section.id()));
    debug!(path = %path.display(), "Writing section CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;

    let mut header: Vec<&str> = section.key_labels().to_vec();
    header.push(section.value_label());
    header.push("Count");
    writer.write_record(&header)?;

    for row in section.rows() {
        let mut record = row.key.clone();
        record.push(row.value.map(|v| v.to_string()).unwrap_or_default());
        record.push(row.count.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(path)
}

/// Writes every section of the report as CSV into `dir`.
pub fn write_report_csv(dir: &Path, report: &LoanReport) -> Result<Vec<PathBuf>> {
    let paths = report
        .sections()
        .iter()
        .map(|s| write_section_csv(dir, s))
        .collect::<Result<Vec<_>>>()?;

    info!(dir = %dir.display(), files = paths.len(), "Report CSVs written");
    Ok(paths)
}

/// Renders one section as an aligned text table.
pub fn render_section(section: &Section) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}", section.title());

    let mut header: Vec<String> = section.key_labels().iter().map(|s| s.to_string()).collect();
    header.push(section.value_label().to_string());
    header.push("Count".to_string());

    let body: Vec<Vec<String>> = section
        .rows()
        .iter()
        .map(|r| {
            let mut cells = r.key.clone();
            cells.push(fmt_value(r.value));
            cells.push(r.count.to_string());
            cells
        })
        .collect();

    out.push_str(&render_table(&header, &body));

    if let Some(pivot) = section.pivot() {
        let mut header = vec![String::new()];
        header.extend(pivot.columns.iter().cloned());
        let body: Vec<Vec<String>> = pivot
            .rows
            .iter()
            .zip(&pivot.cells)
            .map(|(row, cells)| {
                let mut line = vec![row.clone()];
                line.extend(cells.iter().map(|c| fmt_value(*c)));
                line
            })
            .collect();
        out.push('\n');
        out.push_str(&render_table(&header, &body));
    }

    let unclassified = section.unclassified();
    if unclassified.count > 0 || section.dropped() > 0 {
        let _ = writeln!(
            out,
            "unclassified: {} ({}), dropped: {}",
            unclassified.count,
            fmt_value(unclassified.value),
            section.dropped()
        );
    }

    out
}

/// Renders the whole report, one table per section.
pub fn render_report(report: &LoanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Loan default risk ({} records from {})\n",
        report.records(),
        report.source()
    );

    for section in report.sections() {
        out.push_str(&render_section(section));
        out.push('\n');
    }

    out
}

/// Renders the first records of a dataset with their derived tiers.
pub fn render_preview(rows: &[LoanRow<'_>]) -> String {
    let header: Vec<String> = [
        "Purpose of Loan",
        "FICO Score",
        "Annual Income",
        "Debt to Income",
        "Revolving Balances",
        "Not Fully Paid",
        "FICO Tier",
        "Income Tier",
        "DTI Tier",
        "Credit Balance Tier",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let r = row.record;
            let d = row.derived;
            vec![
                r.purpose.clone().unwrap_or_default(),
                fmt_value(r.fico_score),
                fmt_value(d.annual_income),
                fmt_value(r.debt_to_income),
                fmt_value(r.revolving_balance),
                r.not_fully_paid.map(|v| v.to_string()).unwrap_or_default(),
                fmt_label(d.credit_tier),
                fmt_label(d.income_tier),
                fmt_label(d.dti_tier),
                fmt_label(d.balance_tier),
            ]
        })
        .collect();

    render_table(&header, &body)
}

/// Renders a bin spec as `label  (lower, upper]` lines.
pub fn render_bin_spec<L: Category>(spec: &BinSpec<L>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", L::TITLE);
    for (i, (lower, upper, label)) in spec.intervals().enumerate() {
        let open = if i == 0 { '[' } else { '(' };
        let _ = writeln!(out, "  {:<12} {open}{lower}, {upper}]", label.label());
    }
    out
}

fn fmt_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "NaN".to_string())
}

fn fmt_label<L: Category>(label: Option<L>) -> String {
    label.map(|l| l.label().to_string()).unwrap_or_else(|| "-".to_string())
}

fn render_table(header: &[String], body: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in body {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[String]| {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_line(header);
    for row in body {
        push_line(row);
    }

    out
}
