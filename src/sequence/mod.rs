//! Reading aligned sequence records from fasta files.

#[cfg(test)]
mod tests;

use crate::utils;
use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use noodles::{core::Position, fasta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::BufRead;
use std::path::Path;
use strum::Display;

// ----------------------------------------------------------------------------
// Alphabet
// ----------------------------------------------------------------------------

/// Collection of characters that represent sequence bases.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Deserialize, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Alphabet {
    #[default]
    #[serde(rename = "dna")]
    Dna,
    #[serde(rename = "deletion")]
    Deletion,
    #[serde(rename = "missing")]
    Missing,
}

impl Alphabet {
    /// Returns the (uppercase) bases belonging to the alphabet.
    pub fn get_bases(&self) -> &[char] {
        match self {
            Alphabet::Dna => &['A', 'C', 'G', 'T'],
            Alphabet::Deletion => &['-'],
            Alphabet::Missing => &['N'],
        }
    }

    /// True if the base, ignoring case, belongs to the alphabet.
    pub fn contains(&self, base: char) -> bool {
        self.get_bases().contains(&base.to_ascii_uppercase())
    }
}

// ----------------------------------------------------------------------------
// Record
// ----------------------------------------------------------------------------

/// Reduced representation of an aligned sequence record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Record {
    pub id: String,
    pub sequence: Vec<char>,
    pub genome_length: usize,
}

impl Record {
    /// Create a new empty sequence [`Record`].
    pub fn new() -> Self {
        Record { id: String::new(), sequence: Vec::new(), genome_length: 0 }
    }

    /// Create a sequence [`Record`] from a [`noodles`] [`fasta::Record`].
    pub fn from_noodles(record: fasta::Record) -> Result<Self, Report> {
        let mut sample = Record::new();
        sample.id = String::from_utf8_lossy(record.name().as_ref()).to_string();

        // convert sequence to vec of char bases, noodle positions are 1-based!
        if !record.sequence().is_empty() {
            let start = Position::try_from(1)?;
            sample.sequence = record
                .sequence()
                .get(start..)
                .wrap_err(format!("Failed to parse sequence record {}", &sample.id))?
                .iter()
                .map(|b| *b as char)
                .collect::<Vec<_>>();
        }
        sample.genome_length = sample.sequence.len();

        Ok(sample)
    }

    /// Returns the sequence as a [`String`].
    pub fn to_sequence_string(&self) -> String {
        self.sequence.iter().collect()
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns a [`Reader`](fasta::Reader) over the sequence records in a fasta file.
///
/// Files ending in `.zst` are decompressed while reading.
pub fn get_reader<P>(path: &P) -> Result<fasta::Reader<Box<dyn BufRead>>, Report>
where
    P: AsRef<Path> + Debug,
{
    let reader = utils::open(path).wrap_err_with(|| format!("Failed to read: {path:?}"))?;
    Ok(fasta::Reader::new(reader))
}

/// Read the first record of a fasta file, typically the reference genome.
///
/// ## Examples
///
/// ```rust
/// use std::io::Write;
///
/// let mut file = tempfile::Builder::new().suffix(".fasta").tempfile()?;
/// writeln!(file, ">ref_genome\nAAAAAAAAAA")?;
/// let reference = barcodeforge::sequence::read_first(&file.path())?;
/// assert_eq!(reference.id, "ref_genome");
/// assert_eq!(reference.genome_length, 10);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn read_first<P>(path: &P) -> Result<Record, Report>
where
    P: AsRef<Path> + Debug,
{
    let mut reader = get_reader(path)?;

    // parse just the first record
    // 1. raise error if record iterator doesn't work
    // 2. raise error if first record is not proper fasta format.
    let record = reader
        .records()
        .next()
        .ok_or_else(|| eyre!("Unable to read fasta records: {path:?}"))
        .suggestion("Is the file empty?")?
        .wrap_err_with(|| eyre!("Unable to read first fasta record: {path:?}"))?;

    Record::from_noodles(record)
}

/// Read all records of a fasta file, keyed by record id.
///
/// If an id occurs more than once, the last record wins.
pub fn read_all<P>(path: &P) -> Result<BTreeMap<String, Record>, Report>
where
    P: AsRef<Path> + Debug,
{
    let mut reader = get_reader(path)?;
    let mut records = BTreeMap::new();

    for (i, record) in reader.records().enumerate() {
        let record =
            record.wrap_err_with(|| eyre!("Unable to read fasta record {i}: {path:?}"))?;
        let record = Record::from_noodles(record)?;
        records.insert(record.id.clone(), record);
    }

    Ok(records)
}
