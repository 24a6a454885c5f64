//! Configuration and defaults for posannot.
//!
//! This module contains the configuration structure and default values
//! that control how the gene index is built and how input tables are read.

use std::fmt;
use std::str::FromStr;

use crate::types::FeatureKind;

/// Priority order of the UTR/codon checks made before exon/intron detail.
pub const SITE_PRIORITY: [FeatureKind; 4] = [
    FeatureKind::FivePrimeUtr,
    FeatureKind::ThreePrimeUtr,
    FeatureKind::StartCodon,
    FeatureKind::StopCodon,
];

/// How feature records are matched to canonical transcripts.
///
/// Both modes keep only features that follow the last canonical record of
/// their gene; they differ in when the matching happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Hold features back and attach them once the whole file is read.
    TwoPass,
    /// Attach features as they are read.
    Streaming,
}

/// Error type for parsing build mode from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBuildModeError;

impl fmt::Display for ParseBuildModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid build mode: expected 'two-pass' or 'streaming'")
    }
}

impl std::error::Error for ParseBuildModeError {}

impl FromStr for BuildMode {
    type Err = ParseBuildModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "two-pass" | "twopass" => Ok(BuildMode::TwoPass),
            "streaming" => Ok(BuildMode::Streaming),
            _ => Err(ParseBuildModeError),
        }
    }
}

/// Configuration for index building and table processing.
#[derive(Debug, Clone)]
pub struct Config {
    /// GTF attribute holding the gene ID.
    pub gene_id_tag: String,
    /// GTF attribute holding the transcript ID.
    pub transcript_id_tag: String,
    /// GTF attribute holding the gene display name.
    pub gene_name_tag: String,
    /// GTF attribute holding exon (and CDS) numbers.
    pub exon_number_tag: String,
    /// GTF attribute scanned for the canonical marker.
    pub canonical_tag: String,
    /// Substring marking a transcript as canonical.
    pub canonical_marker: String,
    /// Look for the marker in every value of a repeated `canonical_tag`
    /// instead of only the last one.
    pub match_any_tag: bool,
    pub build_mode: BuildMode,
    /// Input table column with the chromosome.
    pub chrom_column: String,
    /// Input table column with the 1-based position.
    pub position_column: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gene_id_tag: "gene_id".to_string(),
            transcript_id_tag: "transcript_id".to_string(),
            gene_name_tag: "gene_name".to_string(),
            exon_number_tag: "exon_number".to_string(),
            canonical_tag: "tag".to_string(),
            canonical_marker: "Ensembl_canonical".to_string(),
            match_any_tag: false,
            build_mode: BuildMode::TwoPass,
            chrom_column: "CHROM".to_string(),
            position_column: "POSITION".to_string(),
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gene_id_tag, "gene_id");
        assert_eq!(config.transcript_id_tag, "transcript_id");
        assert_eq!(config.gene_name_tag, "gene_name");
        assert_eq!(config.exon_number_tag, "exon_number");
        assert_eq!(config.canonical_tag, "tag");
        assert_eq!(config.canonical_marker, "Ensembl_canonical");
        assert!(!config.match_any_tag);
        assert_eq!(config.build_mode, BuildMode::TwoPass);
        assert_eq!(config.chrom_column, "CHROM");
        assert_eq!(config.position_column, "POSITION");
    }

    #[test]
    fn test_site_priority_order() {
        assert_eq!(SITE_PRIORITY[0], FeatureKind::FivePrimeUtr);
        assert_eq!(SITE_PRIORITY[3], FeatureKind::StopCodon);
        assert!(!SITE_PRIORITY.contains(&FeatureKind::Exon));
        assert!(!SITE_PRIORITY.contains(&FeatureKind::Cds));
    }

    #[test]
    fn test_build_mode_parsing() {
        assert_eq!("two-pass".parse::<BuildMode>(), Ok(BuildMode::TwoPass));
        assert_eq!("Streaming".parse::<BuildMode>(), Ok(BuildMode::Streaming));
        assert!("lazy".parse::<BuildMode>().is_err());
    }
}
