//! Summary statistics over the filtered regions.
//!
//! Four independent rollups: length statistics per combination, genus by
//! combination counts, per-genus densities normalized by genome totals, and
//! gene cluster family counts from the external clustering table.


use crate::classify::{lump, Category};
use crate::dataset::regions::BgcRegion;
use crate::dataset::taxonomy::{genus_of, TaxonRecord};
use crate::dataset::GcfAssignment;
use crate::utils::table::Table;
use color_eyre::eyre::{Report, Result};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};

// ----------------------------------------------------------------------------
// Length Statistics
// ----------------------------------------------------------------------------

/// Length statistics of one category combination.
#[derive(Clone, Debug, PartialEq)]
pub struct LengthStats {
    pub combination: String,
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
    pub sd: f64,
}

impl LengthStats {
    /// Compute the statistics of one group of lengths.
    ///
    /// The standard deviation uses the sample (N-1) formula; a group of one
    /// observation reports 0.0.
    pub fn from_lengths(combination: &str, lengths: &[u64]) -> LengthStats {
        let count = lengths.len();
        if count == 0 {
            return LengthStats {
                combination: combination.to_string(),
                count: 0,
                min: 0,
                max: 0,
                mean: 0.0,
                median: 0.0,
                sd: 0.0,
            };
        }

        let min = lengths.iter().min().copied().unwrap_or(0);
        let max = lengths.iter().max().copied().unwrap_or(0);
        let mean = lengths.iter().sum::<u64>() as f64 / count as f64;
        let sd = match count {
            1 => 0.0,
            _ => {
                let variance = lengths
                    .iter()
                    .map(|length| (*length as f64 - mean).powi(2))
                    .sum::<f64>()
                    / (count - 1) as f64;
                variance.sqrt()
            }
        };

        LengthStats {
            combination: combination.to_string(),
            count,
            min,
            max,
            mean,
            median: median(lengths),
            sd,
        }
    }
}

/// Median of a group of lengths; the mean of the two middle values when the
/// group size is even.
fn median(lengths: &[u64]) -> f64 {
    let sorted = lengths.iter().sorted().collect_vec();
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => *sorted[n / 2] as f64,
        _ => (*sorted[n / 2 - 1] + *sorted[n / 2]) as f64 / 2.0,
    }
}

/// Length statistics grouped by combination, ordered by descending count.
pub fn length_stats(regions: &[BgcRegion]) -> Vec<LengthStats> {
    let mut by_combination: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    regions.iter().for_each(|region| {
        by_combination.entry(&region.combination).or_default().push(region.length);
    });

    by_combination
        .into_iter()
        .map(|(combination, lengths)| LengthStats::from_lengths(combination, &lengths))
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.combination.cmp(&b.combination)))
        .collect_vec()
}

/// Render the length statistics as a writable table.
pub fn length_stats_table(stats: &[LengthStats]) -> Result<Table, Report> {
    let mut table = Table::new();
    table.headers =
        ["combination", "count", "min", "max", "mean", "median", "sd"].map(String::from).to_vec();
    for s in stats {
        table.add_row([
            s.combination.clone(),
            s.count.to_string(),
            s.min.to_string(),
            s.max.to_string(),
            format!("{:.2}", s.mean),
            format!("{:.2}", s.median),
            format!("{:.2}", s.sd),
        ])?;
    }
    Ok(table)
}

// ----------------------------------------------------------------------------
// Genus Counts
// ----------------------------------------------------------------------------

/// Count of one (genus, combination) pair, with its lumped group label.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenusCombinationCount {
    pub genus: String,
    pub combination: String,
    /// Lumped group, decided on the combination's total count across genera.
    pub group: String,
    pub count: usize,
}

/// Count regions per (genus, combination) and attach the lumped group label.
pub fn genus_combination_counts(
    regions: &[BgcRegion],
    threshold: usize,
) -> Vec<GenusCombinationCount> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    regions.iter().for_each(|region| {
        *totals.entry(&region.combination).or_default() += 1;
        *counts.entry((&region.genus, &region.combination)).or_default() += 1;
    });

    counts
        .into_iter()
        .map(|((genus, combination), count)| GenusCombinationCount {
            genus: genus.to_string(),
            combination: combination.to_string(),
            group: lump(combination, totals[combination], threshold),
            count,
        })
        .collect_vec()
}

/// Total genomes per genus: distinct genomes with at least one region plus
/// the recorded zero-hit genomes.
///
/// Both sets are required; omitting either silently understates genome
/// totals and inflates densities.
pub fn genus_genome_totals(
    regions: &[BgcRegion],
    zero_hits: &BTreeMap<String, usize>,
) -> BTreeMap<String, usize> {
    let detected: BTreeSet<(&str, &str)> =
        regions.iter().map(|region| (region.genus.as_str(), region.accession.as_str())).collect();

    let mut totals: BTreeMap<String, usize> = BTreeMap::new();
    detected.iter().for_each(|(genus, _accession)| {
        *totals.entry(genus.to_string()).or_default() += 1;
    });
    zero_hits.iter().for_each(|(genus, count)| {
        *totals.entry(genus.clone()).or_default() += count;
    });

    totals
}

// ----------------------------------------------------------------------------
// Genus Density
// ----------------------------------------------------------------------------

/// BGC density of one (genus, lumped group) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct GenusDensity {
    pub genus: String,
    pub group: String,
    pub count: usize,
    pub genomes: usize,
    /// Regions per genome: `count / genomes`.
    pub density: f64,
}

/// Per-genus density of each lumped group, normalized by the genus genome
/// total.
///
/// A genus without any recorded genome is excluded: the ratio is undefined,
/// never coerced to zero.
pub fn genus_density(
    counts: &[GenusCombinationCount],
    totals: &BTreeMap<String, usize>,
) -> Vec<GenusDensity> {
    let mut grouped: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    counts.iter().for_each(|c| {
        *grouped.entry((&c.genus, &c.group)).or_default() += c.count;
    });

    grouped
        .into_iter()
        .filter_map(|((genus, group), count)| {
            let genomes = totals.get(genus).copied().unwrap_or(0);
            (genomes > 0).then(|| GenusDensity {
                genus: genus.to_string(),
                group: group.to_string(),
                count,
                genomes,
                density: count as f64 / genomes as f64,
            })
        })
        .collect_vec()
}

/// Render the densities as a writable table.
pub fn genus_density_table(densities: &[GenusDensity]) -> Result<Table, Report> {
    let mut table = Table::new();
    table.headers = ["genus", "group", "count", "genomes", "density"].map(String::from).to_vec();
    for d in densities {
        table.add_row([
            d.genus.clone(),
            d.group.clone(),
            d.count.to_string(),
            d.genomes.to_string(),
            format!("{:.4}", d.density),
        ])?;
    }
    Ok(table)
}

// ----------------------------------------------------------------------------
// Gene Cluster Families
// ----------------------------------------------------------------------------

/// Distinct gene cluster families per genus, from the clustering table.
///
/// Independent of the region table: the genus comes from the taxonomy join
/// of the assignment's accession.
pub fn gcf_counts(
    gcf_clusters: &[GcfAssignment],
    taxonomy: &BTreeMap<String, TaxonRecord>,
) -> BTreeMap<String, usize> {
    let pairs: BTreeSet<(&str, &str)> = gcf_clusters
        .iter()
        .map(|assignment| (genus_of(taxonomy, &assignment.accession), assignment.gcf.as_str()))
        .collect();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    pairs.iter().for_each(|(genus, _gcf)| {
        *counts.entry(genus.to_string()).or_default() += 1;
    });

    counts
}

// ----------------------------------------------------------------------------
// Plot inputs
// ----------------------------------------------------------------------------

/// Lengths pooled per single category; a hybrid region contributes to each
/// of its categories.
pub fn lengths_by_category(regions: &[BgcRegion]) -> BTreeMap<Category, Vec<u64>> {
    let mut by_category: BTreeMap<Category, Vec<u64>> = BTreeMap::new();
    regions.iter().for_each(|region| {
        region.categories.iter().for_each(|category| {
            by_category.entry(*category).or_default().push(region.length);
        });
    });
    by_category
}

/// Total region count per genus.
pub fn genus_bgc_counts(regions: &[BgcRegion]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    regions.iter().for_each(|region| {
        *counts.entry(region.genus.clone()).or_default() += 1;
    });
    counts
}

/// Per-genome (scaffold count, region count) points, split by the contig
/// edge flag: `(edge_false, edge_true)`.
pub fn genome_scaffold_points(regions: &[BgcRegion]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut per_genome: BTreeMap<(&str, bool), (u64, usize)> = BTreeMap::new();
    regions.iter().for_each(|region| {
        let entry =
            per_genome.entry((&region.accession, region.contig_edge)).or_insert((region.scaffolds, 0));
        entry.1 += 1;
    });

    let mut edge_false = Vec::new();
    let mut edge_true = Vec::new();
    per_genome.into_iter().for_each(|((_accession, edge), (scaffolds, count))| {
        let point = (scaffolds as f64, count as f64);
        match edge {
            true => edge_true.push(point),
            false => edge_false.push(point),
        }
    });

    (edge_false, edge_true)
}
