//! `cyanobgc` computes and plots **b**iosynthetic **g**ene **c**luster (BGC)
//! statistics across genomes of the bacterial phylum Cyanobacteriota.
//!
//! The analysis is a single batch pipeline over flat tables produced by
//! upstream tools (antiSMASH region calls, NCBI assembly metadata and
//! taxonomy, BiG-SLiCE gene cluster families):
//!
//! 1. [load](Dataset::load) the input tables into typed record collections,
//!    joining taxonomy and quality metadata onto assembly accessions.
//! 2. [classify](classify::classify_regions) each region's raw antiSMASH
//!    classes into a canonical category combination key.
//! 3. [filter](filter::high_quality) regions down to highly contiguous
//!    (Complete/Chromosome) assemblies, to avoid double-counting clusters
//!    split across contig ends.
//! 4. [aggregate] length statistics, genus counts and per-genus densities.
//! 5. [plot] the figure catalog and composite overview figure.
//!
//! The `run` command executes stages 1-4 and writes the derived summary
//! tables; the `plot` command executes the full pipeline and renders every
//! chart in both PNG and SVG.

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod dataset;
pub mod filter;
pub mod plot;
pub mod run;
pub mod utils;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::dataset::Dataset;
#[doc(inline)]
pub use crate::utils::table::Table;
#[doc(inline)]
pub use crate::utils::verbosity::Verbosity;
