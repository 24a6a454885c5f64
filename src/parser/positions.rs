//! Position table reader.
//!
//! Reads a delimited table with a header row that names a chromosome column
//! and a position column. Every other column is carried through untouched.

use anyhow::{anyhow, bail, Context, Result};
use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::parser::util::{open_buffered, table_delimiter};

/// One data row of the position table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRow {
    /// 1-based line number in the input file (header is line 1).
    pub line: usize,
    pub chrom: String,
    pub position: i64,
    /// All cells of the row, in column order.
    pub cells: Vec<String>,
}

/// A parsed position table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionTable {
    pub headers: Vec<String>,
    pub rows: Vec<PositionRow>,
}

impl PositionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Coerce a position cell to an integer.
///
/// Accepts integer text and floats without a fractional part (`12345.0`),
/// which spreadsheet exports often produce.
pub fn parse_position(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(pos) = cell.parse::<i64>() {
        return Some(pos);
    }
    let value: f64 = cell.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow!("Input table has no '{}' column", name))
}

/// Read a position table from a file (tab-separated, or comma-separated for `.csv`).
pub fn read_positions(path: &Path, config: &Config) -> Result<PositionTable> {
    let reader = open_buffered(path, "input")?;
    read_positions_from(reader, table_delimiter(path), config)
        .with_context(|| format!("Failed to read position table: {}", path.display()))
}

/// Read a position table from any reader.
pub fn read_positions_from<R: Read>(
    reader: R,
    delimiter: u8,
    config: &Config,
) -> Result<PositionTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read table header")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let chrom_idx = column_index(&headers, &config.chrom_column)?;
    let pos_idx = column_index(&headers, &config.position_column)?;

    let mut rows = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let line = i + 2;
        let record = result.with_context(|| format!("Failed to read table row at line {}", line))?;

        let chrom = record.get(chrom_idx).unwrap_or("").trim().to_string();
        let pos_cell = record.get(pos_idx).unwrap_or("");
        let Some(position) = parse_position(pos_cell) else {
            bail!(
                "Line {}: {} value '{}' is not an integer",
                line,
                config.position_column,
                pos_cell
            );
        };

        rows.push(PositionRow {
            line,
            chrom,
            position,
            cells: record.iter().map(|c| c.to_string()).collect(),
        });
    }

    Ok(PositionTable { headers, rows })
}
