//! Position classification against canonical gene models.
//!
//! A position is assigned to the first gene (in index order) whose span
//! contains it, then located within that gene by a fixed priority:
//! UTR/codon sites, exons (with CDS overlap), CDS alone, introns.

use crate::config::SITE_PRIORITY;
use crate::index::GeneIndex;
use crate::types::{
    Annotation, GeneModel, IntronNumberError, Location, NumberedInterval, OtherLocation,
};

/// Classify `pos` (1-based) on `chrom`.
///
/// Positions on unknown chromosomes or outside every gene span are
/// intergenic. Fails only when an intron is found between exons whose
/// numbers are not integers.
pub fn classify_position(
    index: &GeneIndex,
    chrom: &str,
    pos: i64,
) -> Result<Annotation, IntronNumberError> {
    let Some(mut genes) = index.genes(chrom) else {
        return Ok(Annotation::intergenic());
    };

    match genes.find(|gene| gene.span.contains(pos)) {
        Some(gene) => classify_in_gene(gene, pos),
        None => Ok(Annotation::intergenic()),
    }
}

/// Locate `pos` inside a gene whose span is already known to contain it.
pub fn classify_in_gene(gene: &GeneModel, pos: i64) -> Result<Annotation, IntronNumberError> {
    let name = gene.gene_name.as_str();

    for kind in SITE_PRIORITY {
        if gene.sites(kind).iter().any(|site| site.contains(pos)) {
            return Ok(Annotation::in_gene(
                name,
                Location::None,
                OtherLocation::Site(kind),
            ));
        }
    }

    if let Some(exon) = gene.exons.iter().find(|e| e.interval.contains(pos)) {
        let label = exon.label().to_string();
        // CDS overlap is reported with the exon's number, not the CDS record's.
        let other = if gene.cds.iter().any(|c| c.interval.contains(pos)) {
            OtherLocation::Cds(label.clone())
        } else {
            OtherLocation::None
        };
        return Ok(Annotation::in_gene(name, Location::Exon(label), other));
    }

    if let Some(cds) = gene.cds.iter().find(|c| c.interval.contains(pos)) {
        return Ok(Annotation::in_gene(
            name,
            Location::None,
            OtherLocation::Cds(cds.label().to_string()),
        ));
    }

    if let Some(intron) = intron_number(gene, pos)? {
        return Ok(Annotation::in_gene(
            name,
            Location::Intron(intron),
            OtherLocation::None,
        ));
    }

    Ok(Annotation::in_gene(name, Location::None, OtherLocation::None))
}

/// Number of the intron holding `pos`, if it lies strictly between two
/// exons adjacent by start coordinate.
///
/// The intron takes the smaller of its two flanking exon numbers, so the
/// numbering follows the exon labels whichever strand they count along.
pub fn intron_number(gene: &GeneModel, pos: i64) -> Result<Option<i64>, IntronNumberError> {
    let mut sorted: Vec<&NumberedInterval> = gene.exons.iter().collect();
    sorted.sort_by_key(|e| e.interval.start);

    for pair in sorted.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        let left_end = left.interval.end;
        let right_start = right.interval.start;

        // Overlapping neighbours give right_start < left_end.
        let between =
            (left_end < pos && pos < right_start) || (right_start < pos && pos < left_end);
        if between {
            let left_num = exon_number(gene, left)?;
            let right_num = exon_number(gene, right)?;
            return Ok(Some(left_num.min(right_num)));
        }
    }

    Ok(None)
}

fn exon_number(gene: &GeneModel, exon: &NumberedInterval) -> Result<i64, IntronNumberError> {
    exon.number
        .as_deref()
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| IntronNumberError {
            gene_id: gene.gene_id.clone(),
            label: exon.label().to_string(),
        })
}
