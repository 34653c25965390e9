//! Reroot lineage paths onto the reference genome.
//!
//! Lineage paths describe mutations relative to the root of the placement tree.
//! When the tree root differs from the reference, those differences are
//! inserted into every lineage path, so that downstream barcodes are relative
//! to the reference instead.


use crate::path::{LineagePaths, SampleMutations};
use crate::root::{self, AdditionalMutations};
use crate::sequence;
use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Insert the additional mutations into every lineage path, as a new step after the first one.
///
/// Paths are left unchanged if there are no additional mutations.
///
/// ## Examples
///
/// ```rust
/// use barcodeforge::path::{LineagePath, LineagePaths};
/// use barcodeforge::reroot::reroot_paths;
/// use barcodeforge::root::AdditionalMutations;
///
/// let mut paths = LineagePaths::new();
/// paths.paths.push(LineagePath::new("A", ">T123C>G456A"));
///
/// let mut additional = AdditionalMutations::new();
/// additional.insert(1, 'T', 'A');
///
/// reroot_paths(&mut paths, &additional);
/// assert_eq!(paths.paths[0].to_string(), "T123C > T1A > G456A");
/// ```
pub fn reroot_paths(paths: &mut LineagePaths, additional: &AdditionalMutations) {
    if additional.is_empty() {
        return;
    }
    let step = additional.tokens();
    for lineage in paths.paths.iter_mut() {
        let i = lineage.steps.len().min(1);
        lineage.steps.insert(i, step.clone());
    }
}

/// Infer additional mutations and write them along with the rerooted lineage paths.
///
/// Root inference completes before any output is written, so a failure leaves no partial outputs.
pub fn run(args: &RerootArgs) -> Result<(), Report> {
    info!("Reading sample mutations: {:?}", args.sample_mutations);
    let samples = SampleMutations::read(&args.sample_mutations)?;

    info!("Reading reference: {:?}", args.reference);
    let reference = sequence::read_first(&args.reference)?;

    info!("Reading sequences: {:?}", args.sequences);
    let sequences = sequence::read_all(&args.sequences)?;
    debug!("Read {} sequence records.", sequences.len());

    info!("Reading lineage paths: {:?}", args.lineage_paths);
    let mut paths = LineagePaths::read(&args.lineage_paths)?;

    let additional = root::additional_mutations(&samples, &reference, &sequences)
        .wrap_err("Failed to identify mutations between the reference and the tree root.")?;

    if additional.is_empty() {
        warn!("No additional mutations found, the tree root matches the reference.");
    } else {
        info!(
            "Found {} additional mutations:\n{}",
            additional.len(),
            additional.to_table().to_markdown()
        );
    }

    info!("Writing additional mutations: {:?}", args.output_additional);
    additional.write(&args.output_additional)?;

    reroot_paths(&mut paths, &additional);
    info!("Writing rerooted lineage paths: {:?}", args.output_lineage_paths);
    paths.write(&args.output_lineage_paths)?;

    Ok(())
}

// ----------------------------------------------------------------------------
// RerootArgs
// ----------------------------------------------------------------------------

/// Reroot lineage paths from the placement tree root onto the reference genome.
#[derive(Clone, Debug, Deserialize, Parser, PartialEq, Serialize)]
pub struct RerootArgs {
    /// Sample mutation table (tab-separated, no headers).
    ///
    /// Columns are the sample id and its mutation path (ex. node_1:A123T>node_2:G456A).
    #[clap(short = 's', long, required = true)]
    pub sample_mutations: PathBuf,

    /// Reference genome fasta, only the first record is used.
    #[clap(short = 'r', long, required = true)]
    pub reference: PathBuf,

    /// Aligned sample sequences fasta.
    #[clap(short = 'a', long, required = true)]
    pub sequences: PathBuf,

    /// Lineage path table (tab-separated) with the headers clade, from_tree_root.
    #[clap(short = 'l', long, required = true)]
    pub lineage_paths: PathBuf,

    /// Output table of mutations between the reference and the tree root.
    #[clap(long, default_value = "additional_mutations.tsv")]
    pub output_additional: PathBuf,

    /// Output table of rerooted lineage paths.
    #[clap(long, default_value = "rerooted_lineage_paths.txt")]
    pub output_lineage_paths: PathBuf,
}

impl Default for RerootArgs {
    fn default() -> Self {
        RerootArgs {
            sample_mutations: PathBuf::new(),
            reference: PathBuf::new(),
            sequences: PathBuf::new(),
            lineage_paths: PathBuf::new(),
            output_additional: PathBuf::from("additional_mutations.tsv"),
            output_lineage_paths: PathBuf::from("rerooted_lineage_paths.txt"),
        }
    }
}

impl RerootArgs {
    /// Reads [`RerootArgs`] from a JSON file.
    pub fn read<P>(path: &P) -> Result<RerootArgs, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let input = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read reroot arguments: {path:?}."))?;
        let args = serde_json::from_str(&input)
            .wrap_err_with(|| format!("Failed to deserialize reroot arguments: {input}"))?;
        Ok(args)
    }

    /// Write [`RerootArgs`] to a JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        crate::utils::create_parent_dir(path)?;
        let output = serde_json::to_string_pretty(self)
            .wrap_err(format!("Failed to serialize reroot arguments: {self:?}"))?;
        std::fs::write(path, output)
            .wrap_err(format!("Failed to write reroot arguments: {path:?}"))?;
        Ok(())
    }
}
