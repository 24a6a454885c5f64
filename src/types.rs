//! Core data structures for posannot.
//!
//! This module contains the gene-model types built from a GTF and the
//! annotation types returned for a classified position.

use std::fmt;
use std::str::FromStr;

/// Strand orientation for genomic features.
///
/// Carried for reporting only; classification never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Positive,
    Negative,
    Unknown,
}

impl From<&str> for Strand {
    fn from(s: &str) -> Self {
        match s {
            "+" => Strand::Positive,
            "-" => Strand::Negative,
            _ => Strand::Unknown,
        }
    }
}

impl Strand {
    /// Convert strand to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
            Strand::Unknown => ".",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A closed, 1-based interval `[start, end]` as written in the GTF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        Interval { start, end }
    }

    /// True when `pos` lies inside the interval, both ends included.
    pub fn contains(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// An interval carrying the `exon_number` label of its GTF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedInterval {
    pub interval: Interval,
    pub number: Option<String>,
}

impl NumberedInterval {
    pub fn new(start: i64, end: i64, number: Option<String>) -> Self {
        NumberedInterval {
            interval: Interval::new(start, end),
            number,
        }
    }

    /// The label used as a suffix in `exon_N` / `CDS_N`.
    pub fn label(&self) -> &str {
        self.number.as_deref().unwrap_or("None")
    }
}

/// Sub-gene feature types kept from the GTF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Exon,
    Cds,
    FivePrimeUtr,
    ThreePrimeUtr,
    StartCodon,
    StopCodon,
}

/// Error type for parsing a feature kind from a GTF feature column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFeatureKindError;

impl fmt::Display for ParseFeatureKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported feature type")
    }
}

impl std::error::Error for ParseFeatureKindError {}

impl FromStr for FeatureKind {
    type Err = ParseFeatureKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exon" => Ok(FeatureKind::Exon),
            "CDS" => Ok(FeatureKind::Cds),
            "five_prime_utr" => Ok(FeatureKind::FivePrimeUtr),
            "three_prime_utr" => Ok(FeatureKind::ThreePrimeUtr),
            "start_codon" => Ok(FeatureKind::StartCodon),
            "stop_codon" => Ok(FeatureKind::StopCodon),
            _ => Err(ParseFeatureKindError),
        }
    }
}

impl FeatureKind {
    /// Convert feature kind to its GTF name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Exon => "exon",
            FeatureKind::Cds => "CDS",
            FeatureKind::FivePrimeUtr => "five_prime_utr",
            FeatureKind::ThreePrimeUtr => "three_prime_utr",
            FeatureKind::StartCodon => "start_codon",
            FeatureKind::StopCodon => "stop_codon",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The canonical transcript model of one gene.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneModel {
    pub gene_id: String,
    pub transcript_id: String,
    pub gene_name: String,
    /// Extent of the canonical transcript record.
    pub span: Interval,
    pub strand: Strand,
    /// Exons in file order (never sorted in place).
    pub exons: Vec<NumberedInterval>,
    pub cds: Vec<NumberedInterval>,
    pub five_prime_utr: Vec<Interval>,
    pub three_prime_utr: Vec<Interval>,
    pub start_codon: Vec<Interval>,
    pub stop_codon: Vec<Interval>,
}

impl GeneModel {
    /// Create a model with empty feature lists.
    ///
    /// `gene_name` falls back to `gene_id` when the record has none.
    pub fn new(
        gene_id: String,
        transcript_id: String,
        gene_name: Option<String>,
        span: Interval,
        strand: Strand,
    ) -> Self {
        let gene_name = gene_name.unwrap_or_else(|| gene_id.clone());
        GeneModel {
            gene_id,
            transcript_id,
            gene_name,
            span,
            strand,
            exons: Vec::new(),
            cds: Vec::new(),
            five_prime_utr: Vec::new(),
            three_prime_utr: Vec::new(),
            start_codon: Vec::new(),
            stop_codon: Vec::new(),
        }
    }

    /// Append a feature interval to the list matching `kind`.
    ///
    /// `number` is only kept for exons and CDS.
    pub fn add_feature(&mut self, kind: FeatureKind, interval: Interval, number: Option<String>) {
        match kind {
            FeatureKind::Exon => self.exons.push(NumberedInterval { interval, number }),
            FeatureKind::Cds => self.cds.push(NumberedInterval { interval, number }),
            FeatureKind::FivePrimeUtr => self.five_prime_utr.push(interval),
            FeatureKind::ThreePrimeUtr => self.three_prime_utr.push(interval),
            FeatureKind::StartCodon => self.start_codon.push(interval),
            FeatureKind::StopCodon => self.stop_codon.push(interval),
        }
    }

    /// Bare intervals of a UTR or codon kind. Empty for exon and CDS.
    pub fn sites(&self, kind: FeatureKind) -> &[Interval] {
        match kind {
            FeatureKind::FivePrimeUtr => &self.five_prime_utr,
            FeatureKind::ThreePrimeUtr => &self.three_prime_utr,
            FeatureKind::StartCodon => &self.start_codon,
            FeatureKind::StopCodon => &self.stop_codon,
            FeatureKind::Exon | FeatureKind::Cds => &[],
        }
    }

    /// Drop every attached feature, keeping identity and span.
    pub fn clear_features(&mut self) {
        self.exons.clear();
        self.cds.clear();
        self.five_prime_utr.clear();
        self.three_prime_utr.clear();
        self.start_codon.clear();
        self.stop_codon.clear();
    }
}

/// Location of a position relative to the exon/intron structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    None,
    Exon(String),
    Intron(i64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::None => Ok(()),
            Location::Exon(n) => write!(f, "exon_{}", n),
            Location::Intron(n) => write!(f, "intron_{}", n),
        }
    }
}

/// UTR, codon or CDS context of a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtherLocation {
    None,
    Site(FeatureKind),
    Cds(String),
}

impl fmt::Display for OtherLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtherLocation::None => Ok(()),
            OtherLocation::Site(kind) => write!(f, "{}", kind),
            OtherLocation::Cds(n) => write!(f, "CDS_{}", n),
        }
    }
}

/// Label reported when no gene contains the position.
pub const NO_GENE: &str = "NO";

/// Classification of one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Display name of the containing gene, `None` outside every gene.
    pub gene: Option<String>,
    pub location: Location,
    pub other: OtherLocation,
}

impl Annotation {
    /// The result for a position outside all genes.
    pub fn intergenic() -> Self {
        Annotation {
            gene: None,
            location: Location::None,
            other: OtherLocation::None,
        }
    }

    pub fn in_gene(gene_name: &str, location: Location, other: OtherLocation) -> Self {
        Annotation {
            gene: Some(gene_name.to_string()),
            location,
            other,
        }
    }

    /// Gene label, `NO` when intergenic.
    pub fn gene_label(&self) -> &str {
        self.gene.as_deref().unwrap_or(NO_GENE)
    }

    /// The three output cells: gene, location in gene, other location.
    pub fn labels(&self) -> (String, String, String) {
        (
            self.gene_label().to_string(),
            self.location.to_string(),
            self.other.to_string(),
        )
    }
}

/// Error raised when an exon label bounding an intron is not an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntronNumberError {
    pub gene_id: String,
    pub label: String,
}

impl fmt::Display for IntronNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot number intron of gene {}: exon number '{}' is not an integer",
            self.gene_id, self.label
        )
    }
}

impl std::error::Error for IntronNumberError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_parsing() {
        assert_eq!(Strand::from("+"), Strand::Positive);
        assert_eq!(Strand::from("-"), Strand::Negative);
        assert_eq!(Strand::from("."), Strand::Unknown);
    }

    #[test]
    fn test_feature_kind_parsing() {
        assert_eq!("exon".parse::<FeatureKind>(), Ok(FeatureKind::Exon));
        assert_eq!("CDS".parse::<FeatureKind>(), Ok(FeatureKind::Cds));
        assert_eq!(
            "five_prime_utr".parse::<FeatureKind>(),
            Ok(FeatureKind::FivePrimeUtr)
        );
        assert!("cds".parse::<FeatureKind>().is_err());
        assert!("gene".parse::<FeatureKind>().is_err());
    }

    #[test]
    fn test_interval_contains_is_closed() {
        let iv = Interval::new(100, 200);
        assert!(iv.contains(100));
        assert!(iv.contains(200));
        assert!(!iv.contains(99));
        assert!(!iv.contains(201));
    }

    #[test]
    fn test_gene_name_fallback() {
        let model = GeneModel::new(
            "G1".to_string(),
            "T1".to_string(),
            None,
            Interval::new(1, 10),
            Strand::Unknown,
        );
        assert_eq!(model.gene_name, "G1");
    }

    #[test]
    fn test_add_feature_routes_by_kind() {
        let mut model = GeneModel::new(
            "G1".to_string(),
            "T1".to_string(),
            Some("Gene1".to_string()),
            Interval::new(1, 100),
            Strand::Positive,
        );
        model.add_feature(FeatureKind::Exon, Interval::new(1, 10), Some("1".to_string()));
        model.add_feature(FeatureKind::StopCodon, Interval::new(8, 10), Some("1".to_string()));

        assert_eq!(model.exons.len(), 1);
        assert_eq!(model.exons[0].label(), "1");
        assert_eq!(model.sites(FeatureKind::StopCodon), &[Interval::new(8, 10)]);
        assert!(model.sites(FeatureKind::Exon).is_empty());

        model.clear_features();
        assert!(model.exons.is_empty());
        assert!(model.stop_codon.is_empty());
    }

    #[test]
    fn test_annotation_labels() {
        assert_eq!(
            Annotation::intergenic().labels(),
            ("NO".to_string(), String::new(), String::new())
        );

        let ann = Annotation::in_gene(
            "Gene1",
            Location::Exon("2".to_string()),
            OtherLocation::Cds("2".to_string()),
        );
        assert_eq!(
            ann.labels(),
            ("Gene1".to_string(), "exon_2".to_string(), "CDS_2".to_string())
        );

        let ann = Annotation::in_gene(
            "Gene1",
            Location::None,
            OtherLocation::Site(FeatureKind::ThreePrimeUtr),
        );
        assert_eq!(ann.labels().2, "three_prime_utr");
        assert_eq!(Location::Intron(3).to_string(), "intron_3");
    }
}
