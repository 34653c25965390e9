//! Build lineage barcodes from rerooted lineage paths.
//!
//! A barcode is a sparse matrix of lineages (rows) by mutations (columns),
//! where each cell counts how often the mutation occurs on the lineage's path.
//! After construction, mutations that are undone later in a path (reversions)
//! and mutations that stack at the same site (chains) are collapsed, so that
//! each lineage is left with its net changes relative to the reference.

pub mod chain;

pub use chain::Chain;

use crate::error::Error;
use crate::mutation;
use crate::path::LineagePaths;
use crate::Table;
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Lineage name that is never part of the final barcodes.
pub const UNCLASSIFIED: &str = "unclassified";

// ----------------------------------------------------------------------------
// Barcodes
// ----------------------------------------------------------------------------

/// The mutation counts of one lineage. Mutations that are absent have a count of 0.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BarcodeRow {
    pub lineage: String,
    pub counts: BTreeMap<String, usize>,
}

impl BarcodeRow {
    pub fn new(lineage: &str) -> Self {
        BarcodeRow { lineage: lineage.to_string(), counts: BTreeMap::new() }
    }

    /// Returns the count of a mutation, 0 if absent.
    pub fn get(&self, mutation: &str) -> usize {
        self.counts.get(mutation).copied().unwrap_or_default()
    }

    /// Add to the count of a mutation.
    pub fn add(&mut self, mutation: &str, n: usize) {
        if n > 0 {
            *self.counts.entry(mutation.to_string()).or_default() += n;
        }
    }

    /// Subtract from the count of a mutation, removing it once it reaches 0.
    pub fn subtract(&mut self, mutation: &str, n: usize) {
        let remaining = self.get(mutation).saturating_sub(n);
        if remaining == 0 {
            self.counts.remove(mutation);
        } else {
            self.counts.insert(mutation.to_string(), remaining);
        }
    }
}

/// A sparse matrix of mutation counts per lineage.
///
/// Row order follows the input lineages, column order is tracked explicitly in `mutations`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Barcodes {
    pub mutations: Vec<String>,
    pub rows: Vec<BarcodeRow>,
}

impl Barcodes {
    pub fn new() -> Self {
        Barcodes { mutations: Vec::new(), rows: Vec::new() }
    }

    /// Count every mutation on every lineage path.
    ///
    /// Compound columns (ex. `A1T,C2G`) are split into their constituent mutations, and the
    /// empty column produced by blank path entries is removed. Columns are sorted lexicographically.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use barcodeforge::barcode::Barcodes;
    /// use barcodeforge::path::{LineagePath, LineagePaths};
    ///
    /// let mut paths = LineagePaths::new();
    /// paths.paths.push(LineagePath::new("A", ">T123C>G456A"));
    /// paths.paths.push(LineagePath::new("B", ">C789T"));
    ///
    /// let barcodes = Barcodes::from_paths(&paths);
    /// assert_eq!(barcodes.mutations, ["C789T", "G456A", "T123C"]);
    /// assert_eq!(barcodes.get("A", "T123C"), 1);
    /// assert_eq!(barcodes.get("B", "T123C"), 0);
    /// ```
    pub fn from_paths(paths: &LineagePaths) -> Self {
        let mut barcodes = Barcodes::new();

        for path in &paths.paths {
            let mut row = BarcodeRow::new(&path.clade);
            path.tokens().for_each(|token| row.add(token, 1));
            barcodes.rows.push(row);
        }

        barcodes.mutations = barcodes
            .rows
            .iter()
            .flat_map(|row| row.counts.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        barcodes.split_compound_columns();
        barcodes.drop_column("");
        barcodes.mutations.sort();

        barcodes
    }

    /// Split columns that hold several `,`-separated mutations, summing into the constituent columns.
    pub fn split_compound_columns(&mut self) {
        let compound: BTreeSet<String> =
            self.mutations.iter().filter(|m| m.contains(',')).cloned().collect();
        let mut columns: BTreeSet<String> = self.mutations.iter().cloned().collect();

        for column in &compound {
            for row in self.rows.iter_mut() {
                let n = row.get(column);
                column.split(',').for_each(|m| row.add(m, n));
            }
            for m in column.split(',') {
                if columns.insert(m.to_string()) {
                    self.mutations.push(m.to_string());
                }
            }
        }

        self.drop_columns(&compound);
    }

    /// Returns the first row of a lineage.
    pub fn row(&self, lineage: &str) -> Option<&BarcodeRow> {
        self.rows.iter().find(|row| row.lineage == lineage)
    }

    /// Returns the lineage names, in row order.
    pub fn lineages(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.lineage.as_str()).collect()
    }

    /// Returns the count of a mutation in a lineage, 0 if either is absent.
    pub fn get(&self, lineage: &str, mutation: &str) -> usize {
        self.row(lineage).map(|row| row.get(mutation)).unwrap_or_default()
    }

    /// Total count of a mutation across all lineages.
    pub fn column_sum(&self, mutation: &str) -> usize {
        self.rows.iter().map(|row| row.get(mutation)).sum()
    }

    /// Returns the column names, for membership lookups.
    pub fn columns(&self) -> BTreeSet<&str> {
        self.mutations.iter().map(String::as_str).collect()
    }

    /// Returns the mutations with a nonzero count in at least one lineage.
    pub fn supported(&self) -> BTreeSet<&str> {
        self.rows.iter().flat_map(|row| row.counts.keys().map(String::as_str)).collect()
    }

    /// Remove a column and its counts.
    pub fn drop_column(&mut self, mutation: &str) {
        self.drop_columns(&BTreeSet::from([mutation.to_string()]));
    }

    /// Remove several columns and their counts.
    pub fn drop_columns(&mut self, mutations: &BTreeSet<String>) {
        if mutations.is_empty() {
            return;
        }
        self.mutations.retain(|m| !mutations.contains(m));
        self.rows.iter_mut().for_each(|row| row.counts.retain(|m, _| !mutations.contains(m)));
    }

    /// Remove columns whose counts sum to 0.
    pub fn drop_empty_columns(&mut self) {
        let supported = self.supported();
        let empty: BTreeSet<String> = self
            .mutations
            .iter()
            .filter(|m| !supported.contains(m.as_str()))
            .cloned()
            .collect();
        if !empty.is_empty() {
            debug!("Dropping empty columns: {}", empty.iter().join(","));
        }
        self.drop_columns(&empty);
    }

    /// Cancel out mutations against their reversions.
    ///
    /// For every column whose flip partner is also a column, the smaller of the two
    /// counts is subtracted from both in each lineage. A column that is its own
    /// flip partner (ex. `A1A`) is zeroed. Empty columns are removed afterwards.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use barcodeforge::barcode::Barcodes;
    /// use barcodeforge::path::{LineagePath, LineagePaths};
    ///
    /// let mut paths = LineagePaths::new();
    /// paths.paths.push(LineagePath::new("A", ">A1G>C2T>G1A"));
    /// paths.paths.push(LineagePath::new("B", ">A1G"));
    ///
    /// let mut barcodes = Barcodes::from_paths(&paths);
    /// barcodes.reversion_checking();
    /// assert_eq!(barcodes.mutations, ["A1G", "C2T"]);
    /// assert_eq!(barcodes.get("A", "A1G"), 0);
    /// assert_eq!(barcodes.get("B", "A1G"), 1);
    /// ```
    pub fn reversion_checking(&mut self) {
        let columns = self.columns();
        let pairs = self
            .mutations
            .iter()
            .map(|m| (m.clone(), mutation::flip(m)))
            .filter(|(_, flipped)| columns.contains(flipped.as_str()))
            .collect_vec();

        for (m, flipped) in &pairs {
            for row in self.rows.iter_mut() {
                if m == flipped {
                    row.counts.remove(m);
                    continue;
                }
                let n = row.get(m).min(row.get(flipped));
                row.subtract(m, n);
                row.subtract(flipped, n);
            }
        }

        self.drop_empty_columns();
    }

    /// Returns the unordered pairs of columns that are flips of each other, where both have support.
    pub fn flip_pairs(&self) -> Vec<(String, String)> {
        let columns = self.columns();
        let supported = self.supported();
        self.mutations
            .iter()
            .filter(|m| supported.contains(m.as_str()))
            .filter_map(|m| {
                let flipped = mutation::flip(m);
                let f = flipped.as_str();
                let keep = m <= &flipped && columns.contains(f) && supported.contains(f);
                keep.then(|| (m.clone(), flipped))
            })
            .collect()
    }

    /// Prepare barcodes for output.
    ///
    /// 1. Drop the [`UNCLASSIFIED`] lineage.
    /// 2. Prefix lineage names as `{prefix}-{lineage}`, if a non-empty prefix is given.
    /// 3. Replace `_` with `-` in lineage names.
    /// 4. Sort columns by genomic position, keeping the existing order of ties.
    pub fn finalize(&mut self, prefix: Option<&str>) -> Result<(), Report> {
        self.rows.retain(|row| row.lineage != UNCLASSIFIED);

        let prefix = prefix.map(str::trim).filter(|p| !p.is_empty());
        for row in self.rows.iter_mut() {
            if let Some(prefix) = prefix {
                row.lineage = format!("{prefix}-{}", row.lineage);
            }
            row.lineage = row.lineage.replace('_', "-");
        }

        let positions = self
            .mutations
            .iter()
            .map(|m| Ok((mutation::position(m)?, m.clone())))
            .collect::<Result<Vec<_>, Report>>()
            .suggestion("Lineage paths should only contain mutations (ex. A123T).")?;
        self.mutations = positions
            .into_iter()
            .sorted_by_key(|(position, _)| *position)
            .map(|(_, m)| m)
            .collect();

        Ok(())
    }

    /// Convert to a [`Table`], with an empty first header for the lineage column.
    pub fn to_table(&self) -> Table<String> {
        let mut table = Table::new();
        table.headers =
            std::iter::once(String::new()).chain(self.mutations.iter().cloned()).collect();
        table.rows = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.lineage.clone())
                    .chain(self.mutations.iter().map(|m| row.get(m).to_string()))
                    .collect()
            })
            .collect();
        table
    }

    /// Write barcodes to a comma-separated file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        self.to_table()
            .write(path, Some(','))
            .wrap_err_with(|| format!("Failed to write barcodes: {path:?}"))
    }

    /// Read barcodes from a comma-separated file, as produced by [`Barcodes::write`].
    pub fn read<P>(path: &P) -> Result<Self, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let table = Table::read(path, Some(','), true)
            .wrap_err_with(|| format!("Failed to read barcodes: {path:?}"))?;

        let mut barcodes = Barcodes::new();
        barcodes.mutations = table.headers.iter().skip(1).cloned().collect();

        for row in &table.rows {
            let mut fields = row.iter();
            let lineage = fields.next().ok_or_else(|| eyre!("Empty barcode row: {path:?}"))?;
            let mut barcode = BarcodeRow::new(lineage);
            for (m, value) in barcodes.mutations.iter().zip(fields) {
                let n = usize::from_str(value.trim()).wrap_err_with(|| {
                    format!("Failed to parse count {value:?} of {lineage} {m}: {path:?}")
                })?;
                barcode.add(m, n);
            }
            barcodes.rows.push(barcode);
        }

        Ok(barcodes)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Validate that a barcode file has no mutation alongside its reversion.
///
/// Fails with [`Error::FlipPairs`] listing the offending columns.
pub fn check_no_flip_pairs<P>(path: &P) -> Result<(), Report>
where
    P: AsRef<Path> + Debug,
{
    let barcodes = Barcodes::read(path)?;
    let pairs = barcodes.flip_pairs();
    if !pairs.is_empty() {
        return Err(Error::FlipPairs(pairs))
            .wrap_err_with(|| format!("Barcodes failed validation: {path:?}"));
    }
    info!("PASS: no flip pairs found in barcodes: {path:?}");
    Ok(())
}

/// Create barcodes from lineage paths, write them, and validate the written file.
pub fn run(args: &BarcodeArgs) -> Result<(), Report> {
    info!("Reading lineage paths: {:?}", args.lineage_paths);
    let mut paths = LineagePaths::read(&args.lineage_paths)?;
    paths.dedup();
    debug!("Unique lineages: {}", paths.paths.len());

    info!("Converting to barcodes.");
    let mut barcodes = Barcodes::from_paths(&paths);
    debug!("Barcodes: {} lineages, {} mutations", barcodes.rows.len(), barcodes.mutations.len());

    info!("Performing reversion checking.");
    barcodes.reversion_checking();

    info!("Checking mutation chains.");
    barcodes.check_mutation_chain()?;

    if let Some(prefix) = &args.prefix {
        info!("Adding prefix {prefix:?} to lineage names.");
    }
    barcodes.finalize(args.prefix.as_deref())?;

    info!("Writing barcodes: {:?}", args.output);
    barcodes.write(&args.output)?;

    check_no_flip_pairs(&args.output)
}

// ----------------------------------------------------------------------------
// Arguments
// ----------------------------------------------------------------------------

/// Create mutation barcodes from lineage paths.
#[derive(Clone, Debug, Deserialize, Parser, PartialEq, Serialize)]
pub struct BarcodeArgs {
    /// Lineage path table (tab-separated) with the headers clade, from_tree_root.
    #[clap(short = 'l', long, required = true)]
    pub lineage_paths: PathBuf,

    /// Output barcodes (comma-separated).
    #[clap(short = 'o', long, default_value = "barcode.csv")]
    pub output: PathBuf,

    /// Prefix to add to lineage names (ex. RSVa => RSVa-A.D.1).
    #[clap(short = 'p', long)]
    pub prefix: Option<String>,
}

impl Default for BarcodeArgs {
    fn default() -> Self {
        BarcodeArgs {
            lineage_paths: PathBuf::new(),
            output: PathBuf::from("barcode.csv"),
            prefix: None,
        }
    }
}

impl BarcodeArgs {
    /// Reads [`BarcodeArgs`] from a JSON file.
    pub fn read<P>(path: &P) -> Result<BarcodeArgs, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let input = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read barcode arguments: {path:?}."))?;
        let args = serde_json::from_str(&input)
            .wrap_err_with(|| format!("Failed to deserialize barcode arguments: {input}"))?;
        Ok(args)
    }

    /// Write [`BarcodeArgs`] to a JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        crate::utils::create_parent_dir(path)?;
        let output = serde_json::to_string_pretty(self)
            .wrap_err(format!("Failed to serialize barcode arguments: {self:?}"))?;
        std::fs::write(path, output)
            .wrap_err(format!("Failed to write barcode arguments: {path:?}"))?;
        Ok(())
    }
}

/// Validate that a barcode file is free of flip pairs.
#[derive(Clone, Debug, Default, Deserialize, Parser, PartialEq, Serialize)]
pub struct CheckArgs {
    /// Barcodes (comma-separated) to validate.
    #[clap(short = 'b', long, required = true)]
    pub barcodes: PathBuf,
}
