//! Per-chromosome index of canonical gene models.

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::types::{FeatureKind, GeneModel, Interval};

/// Gene models keyed by chromosome, then gene ID.
///
/// Genes keep the order in which their first canonical transcript was seen;
/// the classifier walks them in that order and stops at the first match.
#[derive(Debug, Clone, Default)]
pub struct GeneIndex {
    chroms: AHashMap<String, IndexMap<String, GeneModel>>,
}

impl GeneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a model built from a canonical transcript record.
    ///
    /// A model already present for the gene is replaced but keeps its
    /// position in the chromosome's gene order.
    pub fn insert_canonical(&mut self, chrom: &str, model: GeneModel) {
        self.chroms
            .entry(chrom.to_string())
            .or_default()
            .insert(model.gene_id.clone(), model);
    }

    /// Attach a feature interval to the gene's canonical model.
    ///
    /// Returns false (and changes nothing) unless the gene has a model on
    /// `chrom` whose transcript ID equals `transcript_id`.
    pub fn attach_feature(
        &mut self,
        chrom: &str,
        gene_id: &str,
        transcript_id: &str,
        kind: FeatureKind,
        interval: Interval,
        number: Option<String>,
    ) -> bool {
        let Some(model) = self
            .chroms
            .get_mut(chrom)
            .and_then(|genes| genes.get_mut(gene_id))
        else {
            return false;
        };
        if model.transcript_id != transcript_id {
            return false;
        }
        model.add_feature(kind, interval, number);
        true
    }

    /// Gene models of a chromosome in insertion order, `None` if unknown.
    pub fn genes(&self, chrom: &str) -> Option<impl Iterator<Item = &GeneModel>> {
        self.chroms.get(chrom).map(|genes| genes.values())
    }

    pub fn get(&self, chrom: &str, gene_id: &str) -> Option<&GeneModel> {
        self.chroms.get(chrom).and_then(|genes| genes.get(gene_id))
    }

    pub fn contains_chrom(&self, chrom: &str) -> bool {
        self.chroms.contains_key(chrom)
    }

    pub fn num_chroms(&self) -> usize {
        self.chroms.len()
    }

    pub fn num_genes(&self) -> usize {
        self.chroms.values().map(|genes| genes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strand;

    fn model(gene_id: &str, transcript_id: &str, start: i64, end: i64) -> GeneModel {
        GeneModel::new(
            gene_id.to_string(),
            transcript_id.to_string(),
            None,
            Interval::new(start, end),
            Strand::Positive,
        )
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut index = GeneIndex::new();
        index.insert_canonical("1", model("G2", "T2", 500, 900));
        index.insert_canonical("1", model("G1", "T1", 100, 400));

        let ids: Vec<&str> = index
            .genes("1")
            .unwrap()
            .map(|g| g.gene_id.as_str())
            .collect();
        assert_eq!(ids, vec!["G2", "G1"]);
        assert_eq!(index.num_genes(), 2);
        assert_eq!(index.num_chroms(), 1);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut index = GeneIndex::new();
        index.insert_canonical("1", model("G1", "T1", 100, 400));
        index.insert_canonical("1", model("G2", "T2", 500, 900));
        index.insert_canonical("1", model("G1", "T1b", 50, 450));

        let genes: Vec<&GeneModel> = index.genes("1").unwrap().collect();
        assert_eq!(genes[0].gene_id, "G1");
        assert_eq!(genes[0].transcript_id, "T1b");
        assert_eq!(genes[0].span, Interval::new(50, 450));
        assert_eq!(genes[1].gene_id, "G2");
    }

    #[test]
    fn test_attach_feature_requires_matching_transcript() {
        let mut index = GeneIndex::new();
        index.insert_canonical("1", model("G1", "T1", 100, 400));

        assert!(index.attach_feature(
            "1",
            "G1",
            "T1",
            FeatureKind::Exon,
            Interval::new(100, 200),
            Some("1".to_string())
        ));
        assert!(!index.attach_feature(
            "1",
            "G1",
            "T_other",
            FeatureKind::Exon,
            Interval::new(300, 400),
            Some("2".to_string())
        ));
        assert!(!index.attach_feature(
            "2",
            "G1",
            "T1",
            FeatureKind::Exon,
            Interval::new(300, 400),
            Some("2".to_string())
        ));
        assert!(!index.attach_feature(
            "1",
            "G9",
            "T1",
            FeatureKind::Cds,
            Interval::new(300, 400),
            None
        ));

        assert_eq!(index.get("1", "G1").unwrap().exons.len(), 1);
    }

    #[test]
    fn test_unknown_chrom() {
        let index = GeneIndex::new();
        assert!(index.genes("chrX").is_none());
        assert!(!index.contains_chrom("chrX"));
    }
}
