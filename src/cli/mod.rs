//! [Command-line interface](Cli) (CLI) of the main binary.

#[cfg(test)]
mod tests;

use crate::barcode::{BarcodeArgs, CheckArgs};
use crate::reroot::RerootArgs;
use clap::{Parser, Subcommand, ValueEnum};
use indoc::indoc;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

const AFTER_HELP: &str = indoc! {"
    Typical usage, starting from the placement outputs:

      barcodeforge reroot \\
        --sample-mutations samplePaths.txt \\
        --reference reference.fasta \\
        --sequences aligned.fasta \\
        --lineage-paths lineagePaths.txt

      barcodeforge barcode --lineage-paths rerooted_lineage_paths.txt --output barcode.csv
"};

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function.
/// ```no_run
/// use clap::Parser;
/// let args = barcodeforge::Cli::parse();
/// ```
/// Here is a manual example of setting the command-line input:
/// ```rust
/// use clap::Parser;
/// let input = ["barcodeforge", "barcode", "--lineage-paths", "lineagePaths.txt", "--prefix", "RSVa"];
/// let args = barcodeforge::Cli::parse_from(input);
/// serde_json::to_string_pretty(&args)?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
/// With the following pretty JSON representation:
/// ```json
/// {
///   "command": {
///     "Barcode": {
///       "lineage_paths": "lineagePaths.txt",
///       "output": "barcode.csv",
///       "prefix": "RSVa"
///     }
///   },
///   "verbosity": "Info"
/// }
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "barcodeforge", author, version)]
#[clap(about = "barcodeforge creates lineage-defining mutation barcodes from phylogenetic placement paths.")]
#[clap(after_help = AFTER_HELP)]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
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

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Infer the tree root, and reroot lineage paths onto the reference.
    /// ## Examples
    /// ```rust
    /// use barcodeforge::{Cli, cli::Command};
    /// use clap::Parser;
    /// let input = ["barcodeforge", "reroot", "-s", "samplePaths.txt", "-r", "ref.fasta", "-a", "aln.fasta", "-l", "lineagePaths.txt"];
    /// let args = Cli::parse_from(input);
    /// assert!(matches!(args.command, Command::Reroot(_)));
    /// ```
    #[clap(about = "Infer the tree root and reroot lineage paths onto the reference.")]
    Reroot(RerootArgs),
    #[clap(about = "Create mutation barcodes from lineage paths.")]
    Barcode(BarcodeArgs),
    #[clap(about = "Check that barcodes contain no mutation alongside its reversion.")]
    Check(CheckArgs),
}

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Debug,
    Error,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Convert to lowercase for RUST_LOG env var compatibility
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
