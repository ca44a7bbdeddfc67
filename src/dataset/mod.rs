//! Input tables of the analysis, loaded once into typed collections.

pub mod regions;
pub mod taxonomy;

#[cfg(test)]
mod tests;

use crate::classify::ClassMap;
use crate::dataset::regions::BgcRegion;
use crate::dataset::taxonomy::{GenomeAssembly, TaxonRecord};
use crate::utils;
use crate::utils::table::Table;
use color_eyre::eyre::{Report, Result, WrapErr};
use indoc::formatdoc;
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

// ----------------------------------------------------------------------------
// Input files
// ----------------------------------------------------------------------------

pub const CLASS_CATEGORIES_TSV: &str = "class_categories.tsv";
pub const TAXONOMY_TSV: &str = "taxonomy.tsv";
pub const REGIONS_TSV: &str = "regions.tsv";
pub const ASSEMBLY_LEVELS_TSV: &str = "assembly_levels.tsv";
pub const ZERO_HITS_TXT: &str = "zero_hits.txt";
pub const GENUS_GENOMES_TSV: &str = "genus_genomes.tsv";
pub const GCF_CLUSTERS_TSV: &str = "gcf_clusters.tsv";

// ----------------------------------------------------------------------------
// Dataset
// ----------------------------------------------------------------------------

/// All input tables of one analysis run.
///
/// Loaded once from the input directory and immutable afterwards; the
/// pipeline stages derive new collections instead of mutating these.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    /// antiSMASH class to category lookup.
    pub class_map: ClassMap,
    /// Taxonomy records keyed by accession.
    pub taxonomy: BTreeMap<String, TaxonRecord>,
    /// Genome assemblies with quality level and taxonomy attached.
    pub assemblies: BTreeMap<String, GenomeAssembly>,
    /// Detected BGC regions, one per antiSMASH region call.
    pub regions: Vec<BgcRegion>,
    /// Accessions annotated with zero detected BGCs.
    pub zero_hits: Vec<String>,
    /// Source genome counts per genus.
    pub genus_genomes: BTreeMap<String, usize>,
    /// Gene cluster family assignments from the clustering tool.
    pub gcf_clusters: Vec<GcfAssignment>,
}

/// One genome to gene cluster family (GCF) assignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GcfAssignment {
    pub accession: String,
    pub gcf: String,
}

impl Dataset {
    /// Load all input tables from a directory.
    pub fn load(input_dir: &Path) -> Result<Dataset, Report> {
        let class_map = ClassMap::read(&input_dir.join(CLASS_CATEGORIES_TSV))?;
        let taxonomy = taxonomy::read_taxonomy(&input_dir.join(TAXONOMY_TSV))?;
        let assemblies =
            taxonomy::read_assemblies(&input_dir.join(ASSEMBLY_LEVELS_TSV), &taxonomy)?;
        let regions = regions::read(&input_dir.join(REGIONS_TSV), &taxonomy)?;
        let zero_hits = utils::read_lines(&input_dir.join(ZERO_HITS_TXT))?;
        let genus_genomes = read_genus_genomes(&input_dir.join(GENUS_GENOMES_TSV))?;
        let gcf_clusters = read_gcf_clusters(&input_dir.join(GCF_CLUSTERS_TSV))?;

        let dataset = Dataset {
            class_map,
            taxonomy,
            assemblies,
            regions,
            zero_hits,
            genus_genomes,
            gcf_clusters,
        };
        info!("Loaded dataset:\n{}", dataset.pretty_print());

        Ok(dataset)
    }

    /// Genus of an accession via the taxonomy join.
    pub fn genus(&self, accession: &str) -> &str {
        taxonomy::genus_of(&self.taxonomy, accession)
    }

    /// Count the zero-hit accessions per genus.
    ///
    /// Accessions without a taxonomy record count under the
    /// [`Unclassified`](taxonomy::UNCLASSIFIED) sentinel instead of being
    /// dropped; omitting them would silently inflate densities.
    pub fn zero_hit_genus_counts(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        self.zero_hits.iter().for_each(|accession| {
            *counts.entry(self.genus(accession).to_string()).or_default() += 1;
        });
        counts
    }

    /// Row counts of the loaded tables, for the log.
    pub fn pretty_print(&self) -> String {
        formatdoc!(
            "class_map: {}
            taxonomy: {}
            assemblies: {}
            regions: {}
            zero_hits: {}
            genus_genomes: {}
            gcf_clusters: {}",
            self.class_map.len(),
            self.taxonomy.len(),
            self.assemblies.len(),
            self.regions.len(),
            self.zero_hits.len(),
            self.genus_genomes.len(),
            self.gcf_clusters.len(),
        )
    }
}

/// Read the per-genus source genome counts table (columns `genus`, `genomes`).
fn read_genus_genomes(path: &Path) -> Result<BTreeMap<String, usize>, Report> {
    let table = Table::read(path)?;

    let mut counts = BTreeMap::new();
    for row in 0..table.rows.len() {
        let genus = table.get("genus", row)?;
        let genomes: usize = table.get("genomes", row)?.parse().wrap_err_with(|| {
            format!("Failed to parse genomes at row {row} in table: {path:?}")
        })?;
        counts.insert(genus.to_string(), genomes);
    }

    Ok(counts)
}

/// Read the clustering result table (columns `accession`, `gcf`).
fn read_gcf_clusters(path: &Path) -> Result<Vec<GcfAssignment>, Report> {
    let table = Table::read(path)?;

    let mut assignments = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        assignments.push(GcfAssignment {
            accession: table.get("accession", row)?.to_string(),
            gcf: table.get("gcf", row)?.to_string(),
        });
    }

    Ok(assignments)
}

// re-exports for the taxonomy join consumers
pub use taxonomy::{AssemblyLevel, Lineage, UNCLASSIFIED};
