//! CSV loader for the loan dataset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::record::{COLUMN_COUNT, Dataset, LoanRecord};

/// Reads every record from a loan CSV.
///
/// The header row is skipped and columns are matched by position, so the file
/// may use any header names as long as it has [`COLUMN_COUNT`] columns.
///
/// # Errors
///
/// Fails on a wrong column count or on the first row that does not parse.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<LoanRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("failed to read CSV headers")?;
    if headers.len() != COLUMN_COUNT {
        bail!(
            "expected {} columns, found {} ({:?})",
            COLUMN_COUNT,
            headers.len(),
            headers
        );
    }

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // +2: 1-based, after the header line
        let line = idx + 2;
        let row = result.with_context(|| format!("failed to read CSV line {line}"))?;
        let record: LoanRecord = row
            .deserialize(None)
            .with_context(|| format!("failed to parse CSV line {line}"))?;
        records.push(record);
    }

    debug!(records = records.len(), "Parsed loan records");
    Ok(records)
}

/// Loads a loan CSV from disk and derives tiers for every record.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let records =
        parse_records(file).with_context(|| format!("failed to load '{}'", path.display()))?;

    info!(records = records.len(), "Loan dataset loaded");
    Ok(Dataset::new(records))
}
