use crate::utils::table::Table;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Sentinel genus for assemblies without a usable taxonomy record.
pub const UNCLASSIFIED: &str = "Unclassified";

// ----------------------------------------------------------------------------
// Assembly Level
// ----------------------------------------------------------------------------

/// NCBI assembly quality level, from most to least contiguous.
#[derive(Clone, Copy, Debug, Default, Deserialize, EnumIter, Eq, PartialEq, Serialize)]
pub enum AssemblyLevel {
    Complete,
    Chromosome,
    Scaffold,
    #[default]
    Contig,
}

impl AssemblyLevel {
    /// Whether the level passes the contiguity bar of the analysis.
    pub fn is_high_quality(&self) -> bool {
        matches!(self, AssemblyLevel::Complete | AssemblyLevel::Chromosome)
    }
}

impl std::fmt::Display for AssemblyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for AssemblyLevel {
    type Err = Report;

    /// Convert a string to an assembly level.
    ///
    /// NCBI metadata spells the top level `"Complete Genome"`; both spellings
    /// are accepted.
    fn from_str(level: &str) -> Result<Self, Report> {
        let level = match level {
            "Complete" | "Complete Genome" => AssemblyLevel::Complete,
            "Chromosome" => AssemblyLevel::Chromosome,
            "Scaffold" => AssemblyLevel::Scaffold,
            "Contig" => AssemblyLevel::Contig,
            _ => Err(eyre!("Unknown assembly level: {level:?}")).suggestion(format!(
                "Options: {}",
                AssemblyLevel::iter().map(|level| level.to_string()).join(", ")
            ))?,
        };

        Ok(level)
    }
}

// ----------------------------------------------------------------------------
// Lineage
// ----------------------------------------------------------------------------

/// Full taxonomic lineage of one assembly, superkingdom down to species.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Lineage {
    pub superkingdom: String,
    pub phylum: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub genus: String,
    pub species: String,
}

impl Lineage {
    /// Genus name, or the [`UNCLASSIFIED`] sentinel when the rank is empty.
    pub fn genus_or_unclassified(&self) -> &str {
        if self.genus.is_empty() {
            UNCLASSIFIED
        } else {
            &self.genus
        }
    }
}

/// One row of the taxonomy table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TaxonRecord {
    pub taxid: Option<u64>,
    pub lineage: Lineage,
}

// ----------------------------------------------------------------------------
// Genome Assembly
// ----------------------------------------------------------------------------

/// One NCBI genome assembly with quality level and taxonomy attached.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GenomeAssembly {
    pub accession: String,
    pub level: AssemblyLevel,
    pub taxid: Option<u64>,
    pub lineage: Lineage,
}

/// Genus of an accession via the taxonomy join, [`UNCLASSIFIED`] when the
/// accession or its genus rank is missing.
pub fn genus_of<'a>(taxonomy: &'a BTreeMap<String, TaxonRecord>, accession: &str) -> &'a str {
    taxonomy
        .get(accession)
        .map(|record| record.lineage.genus_or_unclassified())
        .unwrap_or(UNCLASSIFIED)
}

/// Read the taxonomy table into records keyed by accession.
///
/// Columns: `accession`, `taxid`, then one column per lineage rank.
pub fn read_taxonomy(path: &Path) -> Result<BTreeMap<String, TaxonRecord>, Report> {
    let table = Table::read(path)?;

    let mut taxonomy = BTreeMap::new();
    for row in 0..table.rows.len() {
        let accession = table.get("accession", row)?;
        let taxid = match table.get("taxid", row)? {
            "" => None,
            value => Some(value.parse::<u64>().wrap_err_with(|| {
                format!("Failed to parse taxid {value:?} in table: {path:?}")
            })?),
        };
        let lineage = Lineage {
            superkingdom: table.get("superkingdom", row)?.to_string(),
            phylum: table.get("phylum", row)?.to_string(),
            class: table.get("class", row)?.to_string(),
            order: table.get("order", row)?.to_string(),
            family: table.get("family", row)?.to_string(),
            genus: table.get("genus", row)?.to_string(),
            species: table.get("species", row)?.to_string(),
        };
        taxonomy.insert(accession.to_string(), TaxonRecord { taxid, lineage });
    }

    Ok(taxonomy)
}

/// Read the assembly quality table and left join taxonomy onto it.
///
/// An accession absent from the taxonomy table keeps a default lineage, so
/// its genus resolves to [`UNCLASSIFIED`] rather than dropping the record.
pub fn read_assemblies(
    path: &Path,
    taxonomy: &BTreeMap<String, TaxonRecord>,
) -> Result<BTreeMap<String, GenomeAssembly>, Report> {
    let table = Table::read(path)?;

    let mut assemblies = BTreeMap::new();
    for row in 0..table.rows.len() {
        let accession = table.get("accession", row)?;
        let level = AssemblyLevel::from_str(table.get("assembly_level", row)?)
            .wrap_err_with(|| format!("Failed to parse assembly table: {path:?}"))?;
        let record = taxonomy.get(accession).cloned().unwrap_or_default();
        assemblies.insert(
            accession.to_string(),
            GenomeAssembly {
                accession: accession.to_string(),
                level,
                taxid: record.taxid,
                lineage: record.lineage,
            },
        );
    }

    Ok(assemblies)
}
