//! Parsing of root-to-tip mutation paths.
//!
//! Two textual path formats are handled here:
//!
//! - Lineage paths (`clade`, `from_tree_root`): `>`-delimited steps, where each
//!   step may be a `,`-joined group of mutations, ex. `>T123C>G456A,C789T`.
//! - Sample mutations: `node:mut,mut>node:mut`, where each step is prefixed by
//!   the label of the tree node it occurred on.

#[cfg(test)]
mod tests;

use crate::mutation::Substitution;
use crate::Table;
use color_eyre::eyre::{Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// Header of the clade column in a lineage path table.
pub const CLADE: &str = "clade";
/// Header of the path column in a lineage path table.
pub const FROM_TREE_ROOT: &str = "from_tree_root";

/// Split a raw lineage path into steps of mutation tokens.
///
/// Whitespace is ignored, and leading or trailing `>` are stripped before splitting.
/// Step order is root to tip, and is preserved.
///
/// ## Examples
///
/// ```rust
/// use barcodeforge::path::parse_path;
///
/// assert_eq!(parse_path(">T123C>G456A"), [vec!["T123C"], vec!["G456A"]]);
/// assert_eq!(parse_path("node_1 > A1T,C2G"), [vec!["node_1"], vec!["A1T", "C2G"]]);
/// assert_eq!(parse_path(""), [vec![""]]);
/// ```
pub fn parse_path(raw: &str) -> Vec<Vec<String>> {
    let compact = raw.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    compact
        .trim_matches('>')
        .split('>')
        .map(|step| step.split(',').map(String::from).collect())
        .collect()
}

/// Serialize path steps, the inverse of [`parse_path`] (modulo whitespace).
pub fn format_path(steps: &[Vec<String>]) -> String {
    steps.iter().map(|step| step.join(",")).join(" > ")
}

// ----------------------------------------------------------------------------
// Lineage Paths
// ----------------------------------------------------------------------------

/// The mutation path from the tree root to a lineage (clade).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LineagePath {
    pub clade: String,
    pub steps: Vec<Vec<String>>,
}

impl LineagePath {
    /// Create a lineage path by parsing the raw `from_tree_root` text.
    pub fn new(clade: &str, raw: &str) -> Self {
        LineagePath { clade: clade.to_string(), steps: parse_path(raw) }
    }

    /// Iterate over every mutation token in the path, root to tip.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().flatten().map(|t| t.as_str())
    }
}

impl Display for LineagePath {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", format_path(&self.steps))
    }
}

/// An ordered collection of [`LineagePath`], as read from a lineage path table.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LineagePaths {
    pub paths: Vec<LineagePath>,
}

impl LineagePaths {
    pub fn new() -> Self {
        LineagePaths { paths: Vec::new() }
    }

    /// Read a tab-separated lineage path table with the headers `clade` and `from_tree_root`.
    ///
    /// A missing or empty `from_tree_root` field is parsed as the empty string.
    pub fn read<P>(path: &P) -> Result<Self, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let table = Table::read(path, Some('\t'), true)
            .wrap_err_with(|| format!("Failed to read lineage paths: {path:?}"))?;

        // validate headers before touching rows
        table
            .get_header_index(CLADE)
            .and_then(|_| table.get_header_index(FROM_TREE_ROOT))
            .suggestion(format!("Expected the headers: {CLADE}, {FROM_TREE_ROOT}"))?;

        let mut paths = LineagePaths::new();
        for row in 0..table.rows.len() {
            let clade = table.get(CLADE, row)?.map(|c| c.as_str()).unwrap_or_default();
            let raw = table.get(FROM_TREE_ROOT, row)?.map(|p| p.as_str()).unwrap_or_default();
            paths.paths.push(LineagePath::new(clade, raw));
        }
        debug!("Read {} lineage paths: {path:?}", paths.paths.len());

        Ok(paths)
    }

    /// Write a tab-separated lineage path table, paths are re-serialized with [`format_path`].
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let mut table = Table::new();
        table.headers = vec![CLADE.to_string(), FROM_TREE_ROOT.to_string()];
        for lineage in &self.paths {
            table.add_row(vec![lineage.clade.clone(), lineage.to_string()])?;
        }
        table
            .write(path, Some('\t'))
            .wrap_err_with(|| format!("Failed to write lineage paths: {path:?}"))
    }

    /// Remove duplicate clades, keeping the last occurrence of each.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use barcodeforge::path::{LineagePath, LineagePaths};
    ///
    /// let mut paths = LineagePaths::new();
    /// paths.paths.push(LineagePath::new("A", ">A1T"));
    /// paths.paths.push(LineagePath::new("B", ">C2G"));
    /// paths.paths.push(LineagePath::new("A", ">G3C"));
    /// paths.dedup();
    ///
    /// let observed: Vec<_> = paths.paths.iter().map(|p| p.to_string()).collect();
    /// assert_eq!(observed, ["C2G", "G3C"]);
    /// ```
    pub fn dedup(&mut self) {
        let last = self
            .paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clade.clone(), i))
            .collect::<BTreeMap<_, _>>();
        let mut i = 0;
        self.paths.retain(|p| {
            let keep = last.get(&p.clade) == Some(&i);
            i += 1;
            keep
        });
    }
}

// ----------------------------------------------------------------------------
// Sample Mutations
// ----------------------------------------------------------------------------

/// Parse a sample mutation string into steps of substitutions, ordered tip to root.
///
/// Each step is a node label, a `:`, and a `,`-separated list of mutations
/// (ex. `node_1:A123T,C456G>node_2:G789A`). Any text before the `:` is
/// treated as the node label and ignored.
///
/// ## Examples
///
/// ```rust
/// use barcodeforge::path::parse_sample_mutations;
///
/// let steps = parse_sample_mutations("node_1:A123T,C456G>node_2:G789A")?;
/// let steps: Vec<Vec<String>> =
///     steps.iter().map(|s| s.iter().map(|m| m.to_string()).collect()).collect();
/// assert_eq!(steps, [vec!["G789A"], vec!["A123T", "C456G"]]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn parse_sample_mutations(raw: &str) -> Result<Vec<Vec<Substitution>>, Report> {
    let is_mutation_char = |c: &char| c.is_ascii_alphanumeric() || *c == ',';

    let mut steps = Vec::new();
    let mut start = 0;

    while let Some(offset) = raw[start..].find(':') {
        let colon = start + offset;
        let label = &raw[start..colon];
        let value = raw[colon + 1..].chars().take_while(is_mutation_char).collect::<String>();

        // a step needs both a label and at least one mutation character,
        // otherwise scanning resumes after the colon
        if label.is_empty() || value.is_empty() {
            start = colon + 1;
            continue;
        }

        let step = value
            .split(',')
            .filter(|m| !m.is_empty())
            .map(Substitution::from_str)
            .collect::<Result<Vec<_>, _>>()
            .wrap_err_with(|| format!("Failed to parse mutations of {:?}", label.trim()))?;
        steps.push(step);
        start = colon + 1 + value.len();
    }

    steps.reverse();
    Ok(steps)
}

/// One row of a sample mutation table.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SampleMutations {
    pub sample: String,
    /// Raw mutation string, [`None`] if the field was missing or empty.
    pub mutations: Option<String>,
}

impl SampleMutations {
    /// Parse this sample's mutations, ordered tip to root.
    pub fn steps(&self) -> Result<Vec<Vec<Substitution>>, Report> {
        match &self.mutations {
            Some(mutations) => parse_sample_mutations(mutations)
                .wrap_err_with(|| format!("Failed to parse mutations of sample {}", self.sample)),
            None => Ok(Vec::new()),
        }
    }

    /// Read a tab-separated sample mutation table, which has no headers.
    ///
    /// The columns are `sample` and `mutations`.
    pub fn read<P>(path: &P) -> Result<Vec<SampleMutations>, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let table = Table::read(path, Some('\t'), false)
            .wrap_err_with(|| format!("Failed to read sample mutations: {path:?}"))?;

        let samples = table
            .rows
            .into_iter()
            .map(|row| {
                let mut fields = row.into_iter();
                let sample = fields.next().unwrap_or_default();
                let mutations = fields.next().filter(|m| !m.trim().is_empty());
                SampleMutations { sample, mutations }
            })
            .collect_vec();
        debug!("Read {} sample mutation records: {path:?}", samples.len());

        Ok(samples)
    }
}
