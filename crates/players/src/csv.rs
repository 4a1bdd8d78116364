//! Player CSV parsing and structure validation.
//!
//! Used both for the bundled seed file at startup (where any malformed row
//! is fatal) and for the admin upload endpoints (where a rejected file is
//! reported back to the caller). Headers are matched after trimming,
//! unquoting, and lowercasing, so `Height(inches)` and `height(inches)`
//! are the same column.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::model::Player;

/// Canonical header set for a player CSV, in template order.
pub const EXPECTED_HEADERS: [&str; 6] = [
    "name",
    "team",
    "position",
    "height(inches)",
    "weight(lbs)",
    "age",
];

/// Example file served by the admin template endpoint.
pub const TEMPLATE: &str = "\
Name,Team,Position,Height(inches),Weight(lbs),Age
Adam Donachie,BAL,Catcher,74,180,22.99
Paul Bako,BAL,Catcher,74,215,34.69
Ramon Hernandez,BAL,Catcher,72,210,30.78
";

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Malformed(#[from] csv::Error),

    #[error("missing or unexpected headers; expected {expected:?}")]
    BadHeaders { expected: Vec<String> },

    #[error("row {row}: {reason}")]
    Row { row: usize, reason: String },
}

/// Parse the bundled player seed file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Player>, CsvError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CsvError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_reader(file)
}

/// Parse player rows from any reader, validating the header row first.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Player>, CsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| -> Result<usize, CsvError> {
        headers
            .iter()
            .position(|h| clean_header(h) == name)
            .ok_or_else(|| CsvError::BadHeaders {
                expected: EXPECTED_HEADERS.iter().map(|h| h.to_string()).collect(),
            })
    };

    let name_col = column("name")?;
    let team_col = column("team")?;
    let position_col = column("position")?;
    let height_col = column("height(inches)")?;
    let weight_col = column("weight(lbs)")?;
    let age_col = column("age")?;

    let mut players = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 2;
        let field = |i: usize| record.get(i).unwrap_or_default();

        let name = field(name_col);
        let team = field(team_col);
        if name.is_empty() || team.is_empty() {
            return Err(CsvError::Row {
                row,
                reason: "name and team are required".to_string(),
            });
        }

        let height: i32 = field(height_col).parse().map_err(|_| CsvError::Row {
            row,
            reason: format!("bad height '{}'", field(height_col)),
        })?;
        let weight: i32 = field(weight_col).parse().map_err(|_| CsvError::Row {
            row,
            reason: format!("bad weight '{}'", field(weight_col)),
        })?;
        let age: f64 = field(age_col).parse().map_err(|_| CsvError::Row {
            row,
            reason: format!("bad age '{}'", field(age_col)),
        })?;

        players.push(Player::new(
            name,
            team,
            field(position_col),
            Some(height),
            Some(weight),
            Some(age),
        ));
    }
    Ok(players)
}

/// Check whether a CSV carries exactly the expected header set
/// (order-insensitive, after cleaning). Read errors count as invalid
/// structure, not as a server fault.
pub fn validate_structure<R: Read>(reader: R) -> bool {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let Ok(headers) = csv_reader.headers() else {
        return false;
    };

    let actual: HashSet<String> = headers.iter().map(clean_header).collect();
    let expected: HashSet<String> = EXPECTED_HEADERS.iter().map(|h| h.to_string()).collect();
    actual == expected
}

fn clean_header(header: &str) -> String {
    header.replace('"', "").trim().to_lowercase()
}
