use barcodeforge::{cli::Command, Cli};
use clap::Parser;
use color_eyre::eyre::{Report, Result};
use log::debug;

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

    debug!("Arguments: {}", serde_json::to_string_pretty(&args)?);

    // check which CLI command we're running (reroot, barcode, check)
    match args.command {
        // Reroot lineage paths onto the reference
        Command::Reroot(args) => barcodeforge::reroot::run(&args)?,
        // Create barcodes from lineage paths
        Command::Barcode(args) => barcodeforge::barcode::run(&args)?,
        // Validate existing barcodes
        Command::Check(args) => barcodeforge::barcode::check_no_flip_pairs(&args.barcodes)?,
    }

    Ok(())
}
