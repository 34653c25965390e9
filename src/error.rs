//! Error kinds that callers may need to tell apart from ordinary I/O or parse failures.
//!
//! They are returned wrapped in a [`color_eyre::eyre::Report`], and can be recovered
//! with [`Report::downcast_ref`](color_eyre::eyre::Report::downcast_ref).

use itertools::Itertools;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// No sample had both a mutation entry and a sequence record.
    #[error("No valid root sequences could be generated. Check input FASTA and sample mutations.")]
    NoRootSequence,

    /// A finished barcode still holds a mutation and its reversion.
    #[error("FAIL: flip pairs found: {}", format_pairs(.0))]
    FlipPairs(Vec<(String, String)>),
}

fn format_pairs(pairs: &[(String, String)]) -> String {
    pairs.iter().map(|(a, b)| format!("({a}, {b})")).join(", ")
}
