//! Matching logic for genomic positions against gene models.

pub mod batch;
pub mod position;

pub use batch::classify_rows;
pub use position::{classify_in_gene, classify_position, intron_number};
