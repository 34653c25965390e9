use crate::sequence::{self, Alphabet};
use color_eyre::eyre::{Report, Result};
use std::io::Write;

#[test]
fn read_all_records() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sequences.fasta");
    std::fs::write(&path, ">sampleA\nATAAAAAGAA\n>sampleB desc\nAAAAAA\nGAAA\n")?;

    let records = sequence::read_all(&path)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records["sampleA"].to_sequence_string(), "ATAAAAAGAA");
    // multi-line sequences are joined, descriptions are not part of the id
    assert_eq!(records["sampleB"].to_sequence_string(), "AAAAAAGAAA");
    assert_eq!(records["sampleB"].genome_length, 10);
    Ok(())
}

#[test]
fn read_first_zst() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("reference.fasta.zst");
    let mut encoder = zstd::stream::write::Encoder::new(std::fs::File::create(&path)?, 0)?;
    encoder.write_all(b">ref_genome\nACGT\n>other\nTTTT\n")?;
    encoder.finish()?;

    let reference = sequence::read_first(&path)?;
    assert_eq!(reference.id, "ref_genome");
    assert_eq!(reference.sequence, ['A', 'C', 'G', 'T']);
    Ok(())
}

#[test]
fn read_first_empty() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.fasta");
    std::fs::write(&path, "")?;
    assert!(sequence::read_first(&path).is_err());
    Ok(())
}

#[test]
fn alphabet_contains() {
    assert!(Alphabet::Dna.contains('a'));
    assert!(!Alphabet::Dna.contains('R'));
    assert!(Alphabet::Missing.contains('n'));
    assert!(Alphabet::Deletion.contains('-'));
    assert_eq!(Alphabet::Missing.to_string(), "missing");
}
