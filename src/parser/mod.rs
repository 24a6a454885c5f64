//! Parsers for GTF annotations and position tables.

pub mod attributes;
pub mod gtf;
pub mod positions;
pub mod util;

pub use attributes::AttributeBag;
pub use gtf::{build_gene_index, parse_gtf, BuildStats, GeneIndexBuilder};
pub use positions::{read_positions, PositionRow, PositionTable};
