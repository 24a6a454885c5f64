//! posannot - Genomic position annotation library.
//!
//! This library assigns genomic positions (chromosome + 1-based coordinate)
//! to the gene, exon/intron, and UTR/codon/CDS feature they fall in, using the
//! canonical transcript of each gene from a GTF file.
//!
//! # Features
//!
//! - Parse GTF files (with gzip support) into a per-chromosome gene index
//! - Keep only `Ensembl_canonical` transcripts and their own features
//! - Classify positions by UTR/codon, exon + CDS, CDS, then intron priority
//! - Read and write tab- or comma-separated position tables
//!
//! # Example
//!
//! ```ignore
//! use posannot::config::Config;
//! use posannot::parser::parse_gtf;
//! use posannot::matcher::classify_position;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let index = parse_gtf(Path::new("annotations.gtf"), &config)?;
//!
//! let annotation = classify_position(&index, "1", 250)?;
//! let (gene, location, other) = annotation.labels();
//! ```

pub mod config;
pub mod index;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod types;

pub use config::{BuildMode, Config};
pub use index::GeneIndex;
pub use parser::{AttributeBag, PositionRow, PositionTable};
pub use types::{
    Annotation, FeatureKind, GeneModel, Interval, IntronNumberError, Location, NumberedInterval,
    OtherLocation, Strand,
};
