//! CSV readers for recorded gaze streams
//!
//! Two tables are accepted:
//! - raw input `timestamp,x,y` where a row with both `x` and `y` empty is a
//!   frame without a detected point. A table with the labelled header
//!   `timestamp,x,y,fixation` is also accepted and its `fixation` column
//!   ignored, so labelled output can be fed back in. Every row must have
//!   as many columns as the header it sits under.
//! - labelled output `timestamp,x,y,fixation` as written by
//!   [`crate::csv_output::CsvOutput`].
//!
//! Blank lines are skipped. Every other malformed row is an error naming
//! its 1-based line number.

use thiserror::Error;

use crate::csv_output::SAMPLE_HEADER;
use crate::point::Point;
use crate::tracker::{LabeledSample, Sample};

const INPUT_HEADER: &str = "timestamp,x,y";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("missing header row")]
    MissingHeader,

    #[error("line {line}: unexpected header {found:?}, expected {expected:?}")]
    BadHeader {
        line: usize,
        found: String,
        expected: &'static str,
    },

    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid {column} value {value:?}")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: x and y must both be present or both be empty")]
    PartialPoint { line: usize },
}

/// Parse the fixation column; accepts `True/False`, `true/false`, `1/0`
pub fn parse_fixation(value: &str) -> Option<bool> {
    match value {
        "True" | "true" | "TRUE" | "1" => Some(true),
        "False" | "false" | "FALSE" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a labelled-sample table
pub fn parse_labeled_csv(input: &str) -> Result<Vec<LabeledSample>, TableError> {
    let (_, mut rows) = data_rows(input, &[SAMPLE_HEADER])?;
    rows.try_fold(Vec::new(), |mut samples, (line, fields)| {
        expect_columns(line, &fields, 4)?;
        let timestamp = parse_timestamp(line, fields[0])?;
        let point = Point::new(
            parse_coord(line, "x", fields[1])?,
            parse_coord(line, "y", fields[2])?,
        );
        let is_fixation = parse_fixation(fields[3]).ok_or_else(|| TableError::InvalidValue {
            line,
            column: "fixation",
            value: fields[3].to_string(),
        })?;
        samples.push(LabeledSample {
            timestamp,
            point,
            is_fixation,
        });
        Ok(samples)
    })
}

/// Parse a raw input table
pub fn parse_sample_csv(input: &str) -> Result<Vec<Sample>, TableError> {
    Ok(parse_sample_rows(input)?
        .into_iter()
        .map(|(_, sample)| sample)
        .collect())
}

/// Parse a raw input table, pairing each sample with its 1-based line number
pub fn parse_sample_rows(input: &str) -> Result<Vec<(usize, Sample)>, TableError> {
    let (header, mut rows) = data_rows(input, &[INPUT_HEADER, SAMPLE_HEADER])?;
    let columns = header.split(',').count();
    rows.try_fold(Vec::new(), |mut samples, (line, fields)| {
        expect_columns(line, &fields, columns)?;
        let timestamp = parse_timestamp(line, fields[0])?;
        let point = match (fields[1], fields[2]) {
            ("", "") => None,
            ("", _) | (_, "") => return Err(TableError::PartialPoint { line }),
            (x, y) => Some(Point::new(
                parse_coord(line, "x", x)?,
                parse_coord(line, "y", y)?,
            )),
        };
        samples.push((line, Sample::new(timestamp, point)));
        Ok(samples)
    })
}

/// Validate the header and yield `(line_number, fields)` for data rows
///
/// Returns the accepted header that matched.
fn data_rows<'a>(
    input: &'a str,
    headers: &[&'static str],
) -> Result<(&'static str, impl Iterator<Item = (usize, Vec<&'a str>)>), TableError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (line, header) = lines.next().ok_or(TableError::MissingHeader)?;
    let normalized: String = header.split(',').map(str::trim).collect::<Vec<_>>().join(",");
    let matched = headers
        .iter()
        .copied()
        .find(|h| normalized.eq_ignore_ascii_case(h))
        .ok_or_else(|| TableError::BadHeader {
            line,
            found: header.to_string(),
            expected: headers[0],
        })?;

    Ok((
        matched,
        lines.map(|(line, l)| (line, l.split(',').map(str::trim).collect())),
    ))
}

fn expect_columns(line: usize, fields: &[&str], expected: usize) -> Result<(), TableError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(TableError::ColumnCount {
            line,
            expected,
            found: fields.len(),
        })
    }
}

fn parse_timestamp(line: usize, value: &str) -> Result<f64, TableError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| TableError::InvalidValue {
            line,
            column: "timestamp",
            value: value.to_string(),
        })
}

fn parse_coord(line: usize, column: &'static str, value: &str) -> Result<i32, TableError> {
    value.parse::<i32>().map_err(|_| TableError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    })
}
