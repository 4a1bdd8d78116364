//! Seed-file parsing for the in-memory backend.
//!
//! The bundled file carries eight columns:
//! `id,time,latitude,longitude,depth,magnitude,place,magType` with times in
//! `YYYY-MM-DD HH:MM:SS`. Any malformed row is fatal — a bad seed file
//! aborts startup rather than serving a partial data set.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::Earthquake;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Malformed(#[from] csv::Error),

    #[error("row {row}: {reason}")]
    Row { row: usize, reason: String },
}

/// Parse the bundled earthquake seed file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Earthquake>, CsvError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CsvError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_reader(file)
}

/// Parse earthquake rows from any reader. The first row is the header.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Earthquake>, CsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut quakes = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header row is consumed by the reader, so data rows start at 2.
        let row = index + 2;
        if record.len() < 8 {
            return Err(CsvError::Row {
                row,
                reason: format!("expected 8 columns, found {}", record.len()),
            });
        }
        quakes.push(parse_record(&record, row)?);
    }
    Ok(quakes)
}

fn parse_record(record: &csv::StringRecord, row: usize) -> Result<Earthquake, CsvError> {
    let field = |i: usize| record.get(i).unwrap_or_default();

    let id = field(0).to_string();
    if id.is_empty() {
        return Err(CsvError::Row {
            row,
            reason: "empty id".to_string(),
        });
    }

    let time = NaiveDateTime::parse_from_str(field(1), TIME_FORMAT).map_err(|e| CsvError::Row {
        row,
        reason: format!("bad time '{}': {e}", field(1)),
    })?;

    let number = |i: usize, name: &str| -> Result<f64, CsvError> {
        field(i).parse().map_err(|_| CsvError::Row {
            row,
            reason: format!("bad {name} '{}'", field(i)),
        })
    };

    Ok(Earthquake {
        id,
        time: Some(time),
        latitude: Some(number(2, "latitude")?),
        longitude: Some(number(3, "longitude")?),
        depth: Some(number(4, "depth")?),
        magnitude: Some(number(5, "magnitude")?),
        place: Some(field(6).to_string()),
        magnitude_type: Some(field(7).to_string()),
    })
}
