//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::{plot, run, Verbosity};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the
/// main function. This is achieved with the `parse` function, which parses
/// the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = cyanobgc::Cli::parse();
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "cyanobgc", author, version)]
#[clap(about = "cyanobgc computes and plots biosynthetic gene cluster statistics across Cyanobacteriota genomes.")]
pub struct Cli {
    /// Pass CLI arguments to a particular [Command].
    #[clap(subcommand)]
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants)
/// the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to the pipeline [run](crate::run::run()) method.
    #[clap(about = "Run the analysis pipeline and write the derived summary tables.")]
    Run(run::Args),

    /// Pass CLI arguments to the figure [plot](crate::plot::plot()) method.
    #[clap(about = "Run the analysis pipeline and render the figure catalog.")]
    Plot(plot::Args),
}
