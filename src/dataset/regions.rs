use crate::classify::{Category, RawClasses};
use crate::dataset::taxonomy::{TaxonRecord, UNCLASSIFIED};
use crate::utils;
use crate::utils::table::Table;
use color_eyre::eyre::{Report, Result, WrapErr};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

// ----------------------------------------------------------------------------
// BGC Region
// ----------------------------------------------------------------------------

/// One detected biosynthetic gene cluster.
///
/// `categories` and `combination` are empty until the classification stage
/// fills them in; everything else comes straight from the region table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BgcRegion {
    /// Owning genome assembly accession.
    pub accession: String,
    /// Region length in base pairs.
    pub length: u64,
    /// Number of scaffolds in the owning genome.
    pub scaffolds: u64,
    /// Whether the region touches a contig edge, a signal of possible
    /// assembly fragmentation and double-counting.
    pub contig_edge: bool,
    /// Raw antiSMASH class annotation.
    pub classes: RawClasses,
    /// Genus of the owning genome.
    pub genus: String,
    /// Categories resolved from the raw classes.
    pub categories: Vec<Category>,
    /// Canonical category combination key.
    pub combination: String,
}

/// Read the region table.
///
/// The taxonomy join is authoritative for the genus; the table's own
/// denormalized genus column is the fallback, then [`UNCLASSIFIED`].
pub fn read(
    path: &Path,
    taxonomy: &BTreeMap<String, TaxonRecord>,
) -> Result<Vec<BgcRegion>, Report> {
    let table = Table::read(path)?;

    let mut regions = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        let accession = table.get("accession", row)?;
        let length: u64 = table.get("region_length", row)?.parse().wrap_err_with(|| {
            format!("Failed to parse region_length at row {row} in table: {path:?}")
        })?;
        let scaffolds: u64 = table.get("scaffold_count", row)?.parse().wrap_err_with(|| {
            format!("Failed to parse scaffold_count at row {row} in table: {path:?}")
        })?;
        let contig_edge = utils::parse_bool(table.get("contig_edge", row)?).wrap_err_with(|| {
            format!("Failed to parse contig_edge at row {row} in table: {path:?}")
        })?;
        let classes = RawClasses::from_str(table.get("classes", row)?)
            .wrap_err_with(|| format!("Failed to parse classes at row {row} in table: {path:?}"))?;

        let genus_cell = table.get("genus", row)?;
        let genus = taxonomy
            .get(accession)
            .map(|record| record.lineage.genus.as_str())
            .filter(|genus| !genus.is_empty())
            .unwrap_or(genus_cell);
        let genus = if genus.is_empty() { UNCLASSIFIED } else { genus };

        regions.push(BgcRegion {
            accession: accession.to_string(),
            length,
            scaffolds,
            contig_edge,
            classes,
            genus: genus.to_string(),
            categories: Vec::new(),
            combination: String::new(),
        });
    }

    Ok(regions)
}
