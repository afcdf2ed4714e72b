//! Input loading and cleaning.
//!
//! Reads a headerless CSV where column 0 is a timestamp, column 1 the process
//! value (PV) and column 2 the setpoint (SP); extra columns are ignored.
//! Rows with unparsable timestamps are dropped, non-numeric readings and the
//! `-999` sensor-fault sentinel become missing values. Only structural
//! problems (unreadable file, short rows, nothing parseable) are errors.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use std::path::Path;

/// Reading value that denotes a sensor fault, not a measurement.
pub const SENTINEL: f64 = -999.0;

/// One cleaned input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: NaiveDateTime,
    pub pv: Option<f64>,
    pub sp: Option<f64>,
}

const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

fn parse_time(field: &str) -> Option<NaiveDateTime> {
    let field = field.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(field, fmt).ok())
}

fn parse_reading(field: &str) -> Option<f64> {
    let val: f64 = field.trim().parse().ok()?;
    if !val.is_finite() || val == SENTINEL {
        return None;
    }
    Some(val)
}

/// Load and clean a series of samples from a CSV file.
///
/// Returns the samples sorted ascending by timestamp with exact duplicates
/// removed.
///
/// # Errors
/// Returns an error if the file cannot be read, if any row has fewer than
/// three columns, or if no row yields a parseable timestamp.
pub fn load_series<P: AsRef<Path>>(file: P) -> Result<Vec<Sample>> {
    let file = file.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file)
        .with_context(|| format!("failed to open {file:?}"))?;

    let mut samples = Vec::new();
    let mut n_rows = 0usize;

    for (i_row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read row {i_row}"))?;
        if record.len() < 3 {
            bail!(
                "row {i_row} has {} columns, expected at least 3",
                record.len()
            );
        }
        n_rows += 1;

        let Some(time) = parse_time(&record[0]) else {
            log::debug!("dropped row {i_row}: unparsable timestamp {:?}", &record[0]);
            continue;
        };

        samples.push(Sample {
            time,
            pv: parse_reading(&record[1]),
            sp: parse_reading(&record[2]),
        });
    }

    if n_rows == 0 {
        bail!("{file:?} contains no data rows");
    }
    if samples.is_empty() {
        bail!("{file:?} contains no rows with a parseable timestamp");
    }

    samples.sort_by_key(|sample| sample.time);
    samples.dedup();

    Ok(samples)
}
