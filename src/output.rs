//! Output formatting for posannot results.
//!
//! Writes the input table back out with the three annotation columns filled
//! in. Existing columns of the same name are overwritten in place; otherwise
//! the columns are appended.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::parser::positions::PositionTable;
use crate::parser::util::table_delimiter;
use crate::types::Annotation;

/// Names of the annotation columns, in output order.
pub const ANNOTATION_COLUMNS: [&str; 3] = ["GENE", "LOCATION_IN_GENE", "OTHER_LOCATION"];

/// Output header and the column index each annotation cell goes to.
pub fn output_layout(headers: &[String]) -> (Vec<String>, [usize; 3]) {
    let mut out_headers = headers.to_vec();
    let mut slots = [0usize; 3];

    for (slot, name) in slots.iter_mut().zip(ANNOTATION_COLUMNS) {
        *slot = match out_headers.iter().position(|h| h == name) {
            Some(idx) => idx,
            None => {
                out_headers.push(name.to_string());
                out_headers.len() - 1
            }
        };
    }

    (out_headers, slots)
}

/// Write the annotated table to `writer` using `delimiter`.
pub fn write_annotated<W: Write>(
    writer: W,
    delimiter: u8,
    table: &PositionTable,
    annotations: &[Annotation],
) -> Result<()> {
    if table.rows.len() != annotations.len() {
        bail!(
            "Row count mismatch: {} rows but {} annotations",
            table.rows.len(),
            annotations.len()
        );
    }

    let (headers, slots) = output_layout(&table.headers);
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    csv_writer
        .write_record(&headers)
        .context("Failed to write output header")?;

    for (row, annotation) in table.rows.iter().zip(annotations) {
        let mut cells = row.cells.clone();
        if cells.len() < headers.len() {
            cells.resize(headers.len(), String::new());
        }
        let (gene, location, other) = annotation.labels();
        cells[slots[0]] = gene;
        cells[slots[1]] = location;
        cells[slots[2]] = other;

        csv_writer
            .write_record(&cells)
            .with_context(|| format!("Failed to write output row for line {}", row.line))?;
    }

    csv_writer.flush().context("Failed to flush output")?;
    Ok(())
}

/// Write the annotated table to a file; the delimiter follows the extension.
pub fn write_annotated_file(
    path: &Path,
    table: &PositionTable,
    annotations: &[Annotation],
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_annotated(file, table_delimiter(path), table, annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::positions::PositionRow;
    use crate::types::{Location, OtherLocation};

    fn table(headers: &[&str], rows: Vec<Vec<&str>>) -> PositionTable {
        PositionTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(i, cells)| PositionRow {
                    line: i + 2,
                    chrom: cells[0].to_string(),
                    position: cells[1].parse().unwrap(),
                    cells: cells.iter().map(|c| c.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_output_layout_appends() {
        let headers = vec!["CHROM".to_string(), "POSITION".to_string()];
        let (out, slots) = output_layout(&headers);
        assert_eq!(
            out,
            vec!["CHROM", "POSITION", "GENE", "LOCATION_IN_GENE", "OTHER_LOCATION"]
        );
        assert_eq!(slots, [2, 3, 4]);
    }

    #[test]
    fn test_output_layout_overwrites_existing() {
        let headers = vec![
            "CHROM".to_string(),
            "GENE".to_string(),
            "POSITION".to_string(),
        ];
        let (out, slots) = output_layout(&headers);
        assert_eq!(
            out,
            vec!["CHROM", "GENE", "POSITION", "LOCATION_IN_GENE", "OTHER_LOCATION"]
        );
        assert_eq!(slots, [1, 3, 4]);
    }

    #[test]
    fn test_write_annotated_tsv() {
        let table = table(&["CHROM", "POSITION"], vec![vec!["1", "250"], vec!["1", "50"]]);
        let annotations = vec![
            Annotation::in_gene("GeneG1", Location::Intron(1), OtherLocation::None),
            Annotation::intergenic(),
        ];

        let mut out = Vec::new();
        write_annotated(&mut out, b'\t', &table, &annotations).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "CHROM\tPOSITION\tGENE\tLOCATION_IN_GENE\tOTHER_LOCATION");
        assert_eq!(lines[1], "1\t250\tGeneG1\tintron_1\t");
        assert_eq!(lines[2], "1\t50\tNO\t\t");
    }

    #[test]
    fn test_write_annotated_count_mismatch() {
        let table = table(&["CHROM", "POSITION"], vec![vec!["1", "250"]]);
        let mut out = Vec::new();
        assert!(write_annotated(&mut out, b',', &table, &[]).is_err());
    }
}
