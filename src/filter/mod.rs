//! Assembly quality filter.
//!
//! A cluster split across two contig ends of a fragmented assembly is called
//! twice by the annotation tool, inflating counts. Restricting the analysis
//! to Complete/Chromosome assemblies is the chosen mitigation.

#[cfg(test)]
mod tests;

use crate::dataset::regions::BgcRegion;
use crate::dataset::taxonomy::GenomeAssembly;
use itertools::Itertools;
use log::info;
use std::collections::BTreeMap;

/// Keep regions whose owning assembly is at Complete or Chromosome level.
///
/// A pure semi-join on the assembly table: retained records are untouched,
/// and an accession absent from the table is excluded.
pub fn high_quality(
    regions: &[BgcRegion],
    assemblies: &BTreeMap<String, GenomeAssembly>,
) -> Vec<BgcRegion> {
    let keep = regions
        .iter()
        .filter(|region| {
            assemblies
                .get(&region.accession)
                .map(|assembly| assembly.level.is_high_quality())
                .unwrap_or(false)
        })
        .cloned()
        .collect_vec();

    info!("Quality filter kept {}/{} regions.", keep.len(), regions.len());

    keep
}
