//! Pipeline orchestration: load, classify, filter, aggregate, write tables.


use crate::dataset::regions::BgcRegion;
use crate::dataset::Dataset;
use crate::{aggregate, classify, filter};
use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr};
use indoc::formatdoc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------------
// Args
// ----------------------------------------------------------------------------

/// Arguments for running the analysis pipeline.
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct Args {
    /// Input directory containing the analysis tables.
    #[clap(short = 'i', long, required = true)]
    pub input_dir: PathBuf,

    /// Output directory for the derived tables.
    #[clap(short = 'o', long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Minimum combination count that escapes lumping.
    #[clap(long, default_value_t = classify::LUMP_THRESHOLD)]
    pub lump_threshold: usize,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::from("output"),
            lump_threshold: classify::LUMP_THRESHOLD,
        }
    }
}

// ----------------------------------------------------------------------------
// Outputs
// ----------------------------------------------------------------------------

/// Derived tables of one pipeline run.
#[derive(Clone, Debug, Default)]
pub struct Outputs {
    /// Length statistics per combination, descending by count.
    pub length_stats: Vec<aggregate::LengthStats>,
    /// Densities per (genus, lumped group).
    pub densities: Vec<aggregate::GenusDensity>,
    /// Files written.
    pub paths: Vec<PathBuf>,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Run the analysis pipeline and write the derived summary tables.
pub fn run(args: &Args) -> Result<Outputs, Report> {
    let (dataset, regions) = analysis_regions(&args.input_dir)?;

    // aggregation
    let stats = aggregate::length_stats(&regions);
    let counts = aggregate::genus_combination_counts(&regions, args.lump_threshold);
    let totals = aggregate::genus_genome_totals(&regions, &dataset.zero_hit_genus_counts());
    let densities = aggregate::genus_density(&counts, &totals);

    let table_dir = args.output_dir.join("tables");
    std::fs::create_dir_all(&table_dir)
        .wrap_err_with(|| format!("Unable to create directory: {table_dir:?}"))?;

    // combination length statistics
    let stats_table = aggregate::length_stats_table(&stats)?;
    let stats_path = table_dir.join("combination_length_stats.tsv");
    stats_table.write(&stats_path)?;
    debug!("Combination summary:\n{}", stats_table.to_markdown()?);

    // genus densities
    let density_table = aggregate::genus_density_table(&densities)?;
    let density_path = table_dir.join("genus_density.tsv");
    density_table.write(&density_path)?;

    info!(
        "{}",
        formatdoc!(
            "Pipeline finished.
            regions kept: {}
            combinations: {}
            genera with density: {}
            tables: {stats_path:?}, {density_path:?}",
            regions.len(),
            stats.len(),
            densities.iter().map(|d| &d.genus).collect::<std::collections::BTreeSet<_>>().len(),
        )
    );

    Ok(Outputs { length_stats: stats, densities, paths: vec![stats_path, density_path] })
}

/// Shared front half of the pipeline for the figure catalog: load, classify,
/// filter.
pub fn analysis_regions(input_dir: &Path) -> Result<(Dataset, Vec<BgcRegion>), Report> {
    let dataset = Dataset::load(input_dir)?;
    let regions = classify::classify_regions(&dataset.regions, &dataset.class_map)?;
    let regions = filter::high_quality(&regions, &dataset.assemblies);
    Ok((dataset, regions))
}
