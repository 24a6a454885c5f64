//! Parallel classification of a whole position table.

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::index::GeneIndex;
use crate::matcher::position::classify_position;
use crate::parser::positions::PositionRow;
use crate::types::Annotation;

/// Classify every row, returning annotations in row order.
///
/// Rows are processed on the current rayon pool. `on_row` is called once per
/// finished row (from worker threads) and is meant for progress reporting.
pub fn classify_rows<F>(
    index: &GeneIndex,
    rows: &[PositionRow],
    on_row: F,
) -> Result<Vec<Annotation>>
where
    F: Fn() + Sync,
{
    rows.par_iter()
        .map(|row| -> Result<Annotation> {
            let annotation = classify_position(index, &row.chrom, row.position)
                .with_context(|| format!("Failed to annotate line {}", row.line))?;
            on_row();
            Ok(annotation)
        })
        .collect()
}
