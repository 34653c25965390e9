use crate::utils;
use color_eyre::eyre::{Report, Result};
use std::io::{Read, Write};

#[test]
fn open_plain() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("plain.fasta");
    std::fs::write(&path, ">s1\nACGT\n")?;

    let mut text = String::new();
    utils::open(&path)?.read_to_string(&mut text)?;
    assert_eq!(text, ">s1\nACGT\n");
    Ok(())
}

#[test]
fn open_zst() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("compressed.fasta.zst");
    let mut encoder = zstd::stream::write::Encoder::new(std::fs::File::create(&path)?, 0)?;
    encoder.write_all(b">s1\nACGT\n")?;
    encoder.finish()?;

    let mut text = String::new();
    utils::open(&path)?.read_to_string(&mut text)?;
    assert_eq!(text, ">s1\nACGT\n");
    Ok(())
}

#[test]
fn create_parent_dir_nested() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("a").join("b").join("file.tsv");
    utils::create_parent_dir(&path)?;
    assert!(dir.path().join("a").join("b").exists());
    // bare file names have no parent to create
    utils::create_parent_dir(&"file.tsv")?;
    Ok(())
}
