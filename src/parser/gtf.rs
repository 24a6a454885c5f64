//! GTF file parser with gzip support.
//!
//! Builds the per-chromosome index of canonical gene models. Only transcript
//! records tagged as canonical create models, and only exon/CDS/UTR/codon
//! records of that same transcript are attached to them.

use ahash::AHashMap;
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::BufRead;
use std::path::Path;

use crate::config::{BuildMode, Config};
use crate::index::GeneIndex;
use crate::parser::attributes::AttributeBag;
use crate::parser::util::open_buffered;
use crate::types::{FeatureKind, GeneModel, Interval, Strand};

/// Number of tab-separated columns in a GTF line.
const GTF_COLUMNS: usize = 9;

/// What a GTF record contributes to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Transcript,
    Feature(FeatureKind),
}

impl RecordKind {
    /// Classify the feature column; `None` for types the index ignores.
    pub fn from_feature_type(feature_type: &str) -> Option<Self> {
        if feature_type == "transcript" {
            return Some(RecordKind::Transcript);
        }
        feature_type.parse().ok().map(RecordKind::Feature)
    }
}

/// A parsed GTF line of a feature type the index uses.
#[derive(Debug, Clone)]
pub struct GtfRecord {
    pub chrom: String,
    pub kind: RecordKind,
    pub interval: Interval,
    pub strand: Strand,
    pub attributes: AttributeBag,
}

impl GtfRecord {
    /// Build a record from the nine columns of a line.
    ///
    /// Returns `None` for ignored feature types and unparseable coordinates.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        if fields.len() != GTF_COLUMNS {
            return None;
        }
        let kind = RecordKind::from_feature_type(fields[2])?;
        let start: i64 = fields[3].trim().parse().ok()?;
        let end: i64 = fields[4].trim().parse().ok()?;

        Some(GtfRecord {
            chrom: fields[0].to_string(),
            kind,
            interval: Interval::new(start, end),
            strand: Strand::from(fields[6]),
            attributes: AttributeBag::parse(fields[8]),
        })
    }
}

/// Counters collected while building the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Data lines seen (comments and blank lines excluded).
    pub lines: usize,
    /// Lines with the wrong column count or bad coordinates.
    pub malformed: usize,
    /// Lines of feature types the index does not use.
    pub ignored: usize,
    /// Transcript records without the canonical marker.
    pub non_canonical: usize,
    /// Canonical transcript records stored (replacements included).
    pub canonical: usize,
    /// Records lacking a gene or transcript ID.
    pub missing_ids: usize,
    pub features_attached: usize,
    /// Feature records with no matching canonical model.
    pub features_dropped: usize,
}

/// A feature record waiting for the second pass.
#[derive(Debug, Clone)]
struct PendingFeature {
    /// Position of the record among the index-relevant records.
    seq: usize,
    chrom: String,
    gene_id: String,
    transcript_id: String,
    kind: FeatureKind,
    interval: Interval,
    number: Option<String>,
}

/// Accumulates GTF lines into a [`GeneIndex`].
///
/// A feature is kept only if it follows the last canonical transcript record
/// of its gene and carries that record's transcript ID. A feature before the
/// first canonical record is dropped, and a repeated canonical record discards
/// the features attached so far.
///
/// [`BuildMode::Streaming`] applies this as records arrive.
/// [`BuildMode::TwoPass`] holds features back and matches them against the
/// final models in [`finish`](Self::finish), with the same outcome.
pub struct GeneIndexBuilder<'a> {
    config: &'a Config,
    index: GeneIndex,
    pending: Vec<PendingFeature>,
    /// Sequence number of the last canonical record per (chromosome, gene).
    canonical_at: AHashMap<(String, String), usize>,
    seq: usize,
    stats: BuildStats,
}

impl<'a> GeneIndexBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        GeneIndexBuilder {
            config,
            index: GeneIndex::new(),
            pending: Vec::new(),
            canonical_at: AHashMap::new(),
            seq: 0,
            stats: BuildStats::default(),
        }
    }

    /// Feed one raw GTF line.
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        self.stats.lines += 1;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != GTF_COLUMNS {
            self.stats.malformed += 1;
            return;
        }
        if RecordKind::from_feature_type(fields[2]).is_none() {
            self.stats.ignored += 1;
            return;
        }

        match GtfRecord::from_fields(&fields) {
            Some(record) => self.push_record(record),
            None => self.stats.malformed += 1,
        }
    }

    /// Feed one parsed record.
    pub fn push_record(&mut self, record: GtfRecord) {
        self.seq += 1;
        match record.kind {
            RecordKind::Transcript => self.push_transcript(record),
            RecordKind::Feature(kind) => self.push_feature(kind, record),
        }
    }

    fn push_transcript(&mut self, record: GtfRecord) {
        let config = self.config;
        let attrs = &record.attributes;

        let is_canonical = if config.match_any_tag {
            attrs.any_contains(&config.canonical_tag, &config.canonical_marker)
        } else {
            attrs
                .get(&config.canonical_tag)
                .is_some_and(|tag| tag.contains(config.canonical_marker.as_str()))
        };
        if !is_canonical {
            self.stats.non_canonical += 1;
            return;
        }

        let (Some(gene_id), Some(transcript_id)) = (
            attrs.get(&config.gene_id_tag),
            attrs.get(&config.transcript_id_tag),
        ) else {
            self.stats.missing_ids += 1;
            return;
        };

        let model = GeneModel::new(
            gene_id.to_string(),
            transcript_id.to_string(),
            attrs.get(&config.gene_name_tag).map(str::to_string),
            record.interval,
            record.strand,
        );
        self.canonical_at
            .insert((record.chrom.clone(), gene_id.to_string()), self.seq);
        self.index.insert_canonical(&record.chrom, model);
        self.stats.canonical += 1;
    }

    fn push_feature(&mut self, kind: FeatureKind, record: GtfRecord) {
        let config = self.config;
        let attrs = &record.attributes;

        let (Some(gene_id), Some(transcript_id)) = (
            attrs.get(&config.gene_id_tag),
            attrs.get(&config.transcript_id_tag),
        ) else {
            self.stats.missing_ids += 1;
            return;
        };

        // CDS records reuse the exon numbering attribute.
        let number = match kind {
            FeatureKind::Exon | FeatureKind::Cds => {
                attrs.get(&config.exon_number_tag).map(str::to_string)
            }
            _ => None,
        };

        let feature = PendingFeature {
            seq: self.seq,
            chrom: record.chrom.clone(),
            gene_id: gene_id.to_string(),
            transcript_id: transcript_id.to_string(),
            kind,
            interval: record.interval,
            number,
        };

        match config.build_mode {
            BuildMode::Streaming => self.attach(feature),
            BuildMode::TwoPass => self.pending.push(feature),
        }
    }

    fn attach(&mut self, feature: PendingFeature) {
        let attached = self.index.attach_feature(
            &feature.chrom,
            &feature.gene_id,
            &feature.transcript_id,
            feature.kind,
            feature.interval,
            feature.number,
        );
        if attached {
            self.stats.features_attached += 1;
        } else {
            self.stats.features_dropped += 1;
        }
    }

    /// Attach any held-back features and return the finished index.
    pub fn finish(mut self) -> (GeneIndex, BuildStats) {
        let pending = std::mem::take(&mut self.pending);
        for feature in pending {
            let key = (feature.chrom.clone(), feature.gene_id.clone());
            let after_canonical = self
                .canonical_at
                .get(&key)
                .is_some_and(|&at| at < feature.seq);
            if after_canonical {
                self.attach(feature);
            } else {
                self.stats.features_dropped += 1;
            }
        }
        (self.index, self.stats)
    }
}

/// Parse a GTF file into a gene index.
///
/// Supports both plain text and gzip-compressed GTF files.
pub fn parse_gtf(path: &Path, config: &Config) -> Result<GeneIndex> {
    let reader = open_buffered(path, "GTF")?;
    build_gene_index(reader, config)
}

/// Build a gene index from GTF lines read from `reader`.
///
/// Malformed and irrelevant lines are skipped; only read failures are errors.
pub fn build_gene_index<R: BufRead>(reader: R, config: &Config) -> Result<GeneIndex> {
    let mut builder = GeneIndexBuilder::new(config);

    for line_result in reader.lines() {
        let line = line_result.context("Failed to read GTF line")?;
        builder.push_line(&line);
    }

    let (index, stats) = builder.finish();
    debug!("GTF build stats: {:?}", stats);
    info!(
        "Indexed {} canonical genes on {} chromosomes",
        index.num_genes(),
        index.num_chroms()
    );

    Ok(index)
}
