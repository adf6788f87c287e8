//! CSV loading with explicit schema validation
//!
//! Every file must carry a `Date` and a `Close` column (header names are
//! trimmed and matched case-insensitively). Futures exports may also carry an
//! `Expiry` column with one row per contract; those are collapsed to the
//! nearest contract per date. Anything that does not parse fails the whole
//! file with the offending line number.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::series::{PricePoint, PriceSeries};
use crate::{DataError, DataResult};

/// Accepted date layouts: ISO, NSE export style (`05-Jan-2024`), day-first slashes
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%b-%Y", "%d/%m/%Y"];

/// Resolved column positions for one file
struct Columns {
    date: usize,
    close: usize,
    expiry: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, String> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let missing: Vec<&str> = ["Date", "Close"]
            .into_iter()
            .filter(|name| find(name).is_none())
            .collect();
        match (find("Date"), find("Close")) {
            (Some(date), Some(close)) => Ok(Self {
                date,
                close,
                expiry: find("Expiry"),
            }),
            _ => Err(format!("missing required column(s): {}", missing.join(", "))),
        }
    }
}

/// The row kept for a date so far
struct Row {
    close: f64,
    expiry: Option<NaiveDate>,
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_close(raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("missing close value".to_string());
    }
    let close: f64 = raw
        .parse()
        .map_err(|_| format!("unparseable close value {raw:?}"))?;
    if !close.is_finite() || close <= 0.0 {
        return Err(format!("close value {raw:?} is not a finite positive price"));
    }
    Ok(close)
}

/// Load one stock's series from a CSV file on disk
pub fn load_series(symbol: &str, path: impl AsRef<Path>) -> DataResult<PriceSeries> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: origin.clone(),
        source,
    })?;
    parse_series(symbol, &origin, file)
}

/// Parse CSV content into a series. `origin` names the source in errors.
pub fn parse_series<R: Read>(symbol: &str, origin: &str, input: R) -> DataResult<PriceSeries> {
    let schema_error = |message: String| DataError::Schema {
        path: origin.to_string(),
        message,
    };
    let format_error = |row: usize, message: String| DataError::Format {
        path: origin.to_string(),
        row,
        message,
    };
    let csv_error = |e: csv::Error| match e.position() {
        Some(pos) => format_error(pos.line() as usize, e.to_string()),
        None => schema_error(e.to_string()),
    };

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let columns = Columns::resolve(&headers).map_err(schema_error)?;

    let mut rows: BTreeMap<NaiveDate, Row> = BTreeMap::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let date_raw = record.get(columns.date).unwrap_or("");
        let date = parse_date(date_raw)
            .ok_or_else(|| format_error(line, format!("unparseable date {date_raw:?}")))?;
        let close = parse_close(record.get(columns.close).unwrap_or(""))
            .map_err(|message| format_error(line, message))?;
        let expiry = match columns.expiry {
            Some(idx) => {
                let raw = record.get(idx).unwrap_or("");
                Some(parse_date(raw).ok_or_else(|| {
                    format_error(line, format!("unparseable expiry {raw:?}"))
                })?)
            }
            None => None,
        };

        match rows.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(Row { close, expiry });
            }
            Entry::Occupied(mut slot) => match (expiry, slot.get().expiry) {
                (Some(new), Some(kept)) => {
                    if new < kept {
                        slot.insert(Row { close, expiry });
                    }
                }
                _ => return Err(format_error(line, format!("duplicate date {date}"))),
            },
        }
    }

    let points: Vec<PricePoint> = rows
        .into_iter()
        .map(|(date, row)| PricePoint {
            date,
            close: row.close,
        })
        .collect();

    debug!(symbol, origin, rows = points.len(), "Parsed price series");

    PriceSeries::new(symbol, points).map_err(|e| schema_error(e.to_string()))
}
