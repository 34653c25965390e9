//! Determine the root sequence of the placement tree, and how it differs from the reference.
//!
//! If the reference genome was placed on the tree as a sample, its own mutation path
//! describes the difference directly. Otherwise, each sample's path is walked back to
//! the root to reconstruct a candidate root sequence, and the consensus of all
//! candidates is compared to the reference.

#[cfg(test)]
mod tests;

use crate::error::Error;
use crate::mutation::Substitution;
use crate::path::SampleMutations;
use crate::sequence::{Alphabet, Record};
use crate::Table;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

// ----------------------------------------------------------------------------
// Root Mutations
// ----------------------------------------------------------------------------

/// The bases at a coordinate on either end of a root-to-tip path.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct RootMutation {
    /// Base observed at the tip.
    pub base: char,
    /// Base at the root.
    pub root: char,
}

/// Map of 1-based coordinates to the changes that turn a tip sequence into the root sequence.
pub type RootMutations = BTreeMap<usize, RootMutation>;

/// Walk a mutation path from tip to root, recording the tip and root base of every mutated coordinate.
///
/// The first mutation seen at a coordinate (closest to the tip) sets the tip base,
/// and every later one overwrites the root base, so the root base ends up as the
/// reference base of the mutation closest to the root.
///
/// ## Arguments
///
/// - `steps` - Path steps, ordered tip to root.
///
/// ## Examples
///
/// ```rust
/// use barcodeforge::{path, root};
///
/// // root --A1G--> node --G1T,C2T--> tip
/// let steps = path::parse_sample_mutations("node_1:A1G>node_2:G1T,C2T")?;
/// let root_muts = root::reverse_to_root(&steps);
///
/// assert_eq!(root_muts[&1], root::RootMutation { base: 'T', root: 'A' });
/// assert_eq!(root_muts[&2], root::RootMutation { base: 'T', root: 'C' });
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn reverse_to_root(steps: &[Vec<Substitution>]) -> RootMutations {
    let mut root_muts = RootMutations::new();
    for sub in steps.iter().flatten() {
        match root_muts.get_mut(&sub.coord) {
            Some(existing) => existing.root = sub.reference,
            None => {
                root_muts.insert(sub.coord, RootMutation { base: sub.alt, root: sub.reference });
            }
        }
    }
    root_muts
}

/// Apply root mutations to a tip sequence, returning the candidate root sequence.
pub fn construct_root_sequence(
    root_muts: &RootMutations,
    record: &Record,
) -> Result<Vec<char>, Report> {
    let mut sequence = record.sequence.clone();
    for (coord, mutation) in root_muts {
        // coordinates are 1-based
        if *coord == 0 || *coord > sequence.len() {
            return Err(eyre!(
                "Mutation coordinate {coord} is outside of sequence {} (length {}).",
                record.id,
                sequence.len()
            )
            .suggestion(format!("Are you sure {} is aligned to the reference?", record.id)));
        }
        sequence[coord - 1] = mutation.root;
    }
    Ok(sequence)
}

/// Derive the consensus of candidate root sequences.
///
/// At every position, bases outside of `A`, `C`, `G`, `T`, `N` are only kept
/// if all candidates agree. The most frequent remaining base is chosen, with
/// ties going to the base seen first. A position where no base survives is `N`.
///
/// ## Examples
///
/// ```rust
/// use barcodeforge::root::derive_root_sequence;
///
/// let candidates = ["AGTC", "AGCC", "AATC"].map(|s| s.chars().collect::<Vec<_>>());
/// let consensus: String = derive_root_sequence(&candidates)?.into_iter().collect();
/// assert_eq!(consensus, "AGTC");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn derive_root_sequence(candidates: &[Vec<char>]) -> Result<Vec<char>, Report> {
    let first = candidates.first().ok_or(Error::NoRootSequence)?;
    let length = first.len();

    if let Some(other) = candidates.iter().find(|c| c.len() != length) {
        return Err(eyre!(
            "Candidate root sequences are different lengths ({length} vs {})!",
            other.len()
        )
        .suggestion("Are you sure the input sequences are aligned?"));
    }

    let consensus = (0..length)
        .map(|i| {
            let bases = candidates.iter().map(|c| c[i]).collect_vec();
            let unanimous = bases.iter().all_equal();
            let bases = bases
                .into_iter()
                .filter(|b| unanimous || Alphabet::Dna.contains(*b) || Alphabet::Missing.contains(*b))
                .collect_vec();

            // most frequent base, ties go to the first one encountered
            let counts = bases.iter().counts();
            bases
                .iter()
                .fold(None, |best: Option<(char, usize)>, b| {
                    let n = counts[b];
                    match best {
                        Some((_, m)) if m >= n => best,
                        _ => Some((*b, n)),
                    }
                })
                .map(|(b, _)| b)
                .unwrap_or('N')
        })
        .collect();

    Ok(consensus)
}

// ----------------------------------------------------------------------------
// Additional Mutations
// ----------------------------------------------------------------------------

/// A difference between the reference genome and the tree root at one coordinate.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct AdditionalMutation {
    pub coord: usize,
    pub reference: char,
    pub root: char,
}

impl Display for AdditionalMutation {
    /// The substitution that turns the reference base into the root base.
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}{}{}", self.reference, self.coord, self.root)
    }
}

/// The differences between the reference genome and the tree root, ordered by coordinate.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AdditionalMutations {
    pub mutations: BTreeMap<usize, AdditionalMutation>,
}

impl AdditionalMutations {
    pub fn new() -> Self {
        AdditionalMutations { mutations: BTreeMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn insert(&mut self, coord: usize, reference: char, root: char) {
        self.mutations.insert(coord, AdditionalMutation { coord, reference, root });
    }

    /// Returns the mutations as tokens (ex. `T1A`), ordered by coordinate.
    pub fn tokens(&self) -> Vec<String> {
        self.mutations.values().map(|m| m.to_string()).collect()
    }

    /// Convert root mutations of the reference sample, relabelling the tip base as `ref`.
    pub fn from_root_mutations(root_muts: &RootMutations) -> Self {
        let mut additional = AdditionalMutations::new();
        root_muts.iter().for_each(|(coord, m)| additional.insert(*coord, m.base, m.root));
        additional
    }

    /// Compare the reference sequence to the root sequence.
    ///
    /// Positions are compared case-insensitively, up to the shorter of the two sequences.
    /// Positions where either sequence is missing (`N`) are skipped.
    pub fn from_comparison(reference: &[char], root: &[char]) -> Self {
        let mut additional = AdditionalMutations::new();
        reference
            .iter()
            .zip(root.iter())
            .map(|(r, t)| (r.to_ascii_uppercase(), t.to_ascii_uppercase()))
            .enumerate()
            .filter(|(_, (r, t))| {
                r != t && !Alphabet::Missing.contains(*r) && !Alphabet::Missing.contains(*t)
            })
            .for_each(|(i, (r, t))| additional.insert(i + 1, r, t));
        additional
    }

    /// Drop deletions, insertions, and mutations where the reference and root agree.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use barcodeforge::root::AdditionalMutations;
    ///
    /// let mut additional = AdditionalMutations::new();
    /// additional.insert(1, 'A', 'T');
    /// additional.insert(2, 'C', '-');
    /// additional.insert(3, '-', 'G');
    /// additional.insert(4, 'C', 'C');
    ///
    /// let additional = additional.sanitize();
    /// assert_eq!(additional.tokens(), ["A1T"]);
    /// ```
    pub fn sanitize(self) -> Self {
        let mutations = self
            .mutations
            .into_iter()
            .filter(|(_, m)| {
                !Alphabet::Deletion.contains(m.reference) && !Alphabet::Deletion.contains(m.root)
            })
            .filter(|(_, m)| m.reference != m.root)
            .collect();
        AdditionalMutations { mutations }
    }

    /// Convert to a [`Table`] with the headers `position`, `ref`, `root`.
    pub fn to_table(&self) -> Table<String> {
        let mut table = Table::new();
        table.headers = ["position", "ref", "root"].map(String::from).to_vec();
        table.rows = self
            .mutations
            .values()
            .map(|m| vec![m.coord.to_string(), m.reference.to_string(), m.root.to_string()])
            .collect();
        table
    }

    /// Write a tab-separated additional mutations table.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        self.to_table()
            .write(path, Some('\t'))
            .wrap_err_with(|| format!("Failed to write additional mutations: {path:?}"))
    }

    /// Read a tab-separated additional mutations table.
    pub fn read<P>(path: &P) -> Result<Self, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let table = Table::read(path, Some('\t'), true)?;
        let mut additional = AdditionalMutations::new();

        for row in 0..table.rows.len() {
            let field = |header: &str| -> Result<String, Report> {
                table
                    .get(header, row)?
                    .cloned()
                    .ok_or_else(|| eyre!("Row {row} is missing the '{header}' column: {path:?}"))
            };
            let coord = field("position")?;
            let coord = usize::from_str(coord.trim())
                .wrap_err_with(|| format!("Failed to parse position {coord:?}: {path:?}"))?;
            let base = |header: &str| -> Result<char, Report> {
                let value = field(header)?;
                value
                    .trim()
                    .chars()
                    .exactly_one()
                    .map_err(|_| eyre!("Expected a single base for '{header}', found {value:?}"))
            };
            additional.insert(coord, base("ref")?, base("root")?);
        }

        Ok(additional)
    }
}

// ----------------------------------------------------------------------------
// Inference
// ----------------------------------------------------------------------------

/// Identify the mutations between the reference genome and the tree root.
///
/// ## Arguments
///
/// - `samples` - Sample mutation table.
/// - `reference` - Reference genome record.
/// - `sequences` - Sample sequence records, keyed by id.
///
/// The result is sanitized, see [`AdditionalMutations::sanitize`].
pub fn additional_mutations(
    samples: &[SampleMutations],
    reference: &Record,
    sequences: &BTreeMap<String, Record>,
) -> Result<AdditionalMutations, Report> {
    let additional = match samples.iter().find(|s| s.sample == reference.id) {
        // reference was placed on the tree, its path leads back to the root
        Some(sample) => {
            info!("Reference {} is present in sample mutations.", reference.id);
            let root_muts = reverse_to_root(&sample.steps()?);
            let additional = AdditionalMutations::from_root_mutations(&root_muts);
            debug!(
                "Additional mutations derived from reference {}: {}",
                reference.id,
                additional.tokens().join(",")
            );
            additional
        }
        // otherwise infer the root from all samples
        None => {
            warn!(
                "Reference {} not present in sample mutations. Inferring root sequence.",
                reference.id
            );
            let root = infer_root_sequence(samples, sequences)?;
            AdditionalMutations::from_comparison(&reference.sequence, &root)
        }
    };

    Ok(additional.sanitize())
}

/// Infer the root sequence as the consensus of every sample's reconstructed root.
///
/// Samples without mutations are ignored, samples without a sequence record are skipped
/// with a warning. Fails with [`Error::NoRootSequence`] if there are no candidates.
pub fn infer_root_sequence(
    samples: &[SampleMutations],
    sequences: &BTreeMap<String, Record>,
) -> Result<Vec<char>, Report> {
    let mut candidates = Vec::new();

    for sample in samples.iter().filter(|s| s.mutations.is_some()) {
        let Some(record) = sequences.get(&sample.sample) else {
            warn!("Sample {} not found in sequences. Skipping.", sample.sample);
            continue;
        };
        let root_muts = reverse_to_root(&sample.steps()?);
        candidates.push(construct_root_sequence(&root_muts, record)?);
    }

    if candidates.is_empty() {
        return Err(Error::NoRootSequence)
            .suggestion("Check that the sample ids match the sequence ids.");
    }
    debug!("Deriving consensus root from {} candidate sequences.", candidates.len());

    derive_root_sequence(&candidates)
}
