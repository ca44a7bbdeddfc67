use clap::Parser;
use color_eyre::eyre::{Report, Result};
use cyanobgc::{cli, cli::Cli};

fn main() -> Result<(), Report> {
    // ------------------------------------------------------------------------
    // CLI Setup

    // Parse CLI parameters
    let args = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // Set logging/verbosity level via RUST_LOG
    std::env::set_var("RUST_LOG", args.verbosity.to_string());

    // initialize env_logger crate for logging/verbosity level
    env_logger::init();

    // check which CLI command we're running (run, plot)
    match args.command {
        // Run the analysis pipeline, write derived tables
        cli::Command::Run(args) => _ = cyanobgc::run::run(&args)?,
        // Run the analysis pipeline, render the figure catalog
        cli::Command::Plot(args) => _ = cyanobgc::plot::plot(&args)?,
    }

    Ok(())
}
